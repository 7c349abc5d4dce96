//! Integration tests for configuration loading.

use m2tsforge::config::{load_config, load_config_or_default, Config};
use m2tsforge_av::OutputFormat;
use serial_test::serial;
use std::path::Path;
use tempfile::tempdir;

/// Run `f` with the process working directory set to `dir`.
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir).unwrap();
    let result = f();
    std::env::set_current_dir(previous).unwrap();
    result
}

#[test]
fn load_explicit_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        r#"
[tools]
mediainfo_path = "/usr/local/bin/mediainfo"

[convert]
format = "avchd"
delete_source = true
work_dir = "/var/tmp/m2tsforge"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.convert.format, OutputFormat::Avchd);
    assert!(config.convert.delete_source);
    assert_eq!(
        config.convert.work_dir.as_deref(),
        Some(Path::new("/var/tmp/m2tsforge"))
    );
    assert_eq!(config.convert.extensions, ["mkv"]);
    assert_eq!(
        config.tools.tool_paths().mediainfo.as_deref(),
        Some(Path::new("/usr/local/bin/mediainfo"))
    );
}

#[test]
fn missing_explicit_config_is_an_error() {
    let err = load_config_or_default(Some(Path::new("/nonexistent/m2tsforge.toml"))).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[convert\nformat = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
#[serial]
fn config_in_working_directory_is_picked_up() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("m2tsforge.toml"),
        "[convert]\nformat = \"ts\"\nsplit = true\n",
    )
    .unwrap();

    let config = in_dir(dir.path(), || load_config_or_default(None)).unwrap();
    assert_eq!(config.convert.format, OutputFormat::Ts);
    assert!(config.convert.split);
}

#[test]
#[serial]
fn defaults_without_config_file() {
    let dir = tempdir().unwrap();

    let config = in_dir(dir.path(), || load_config_or_default(None)).unwrap();
    // A user or system config may exist on the host; only check when it doesn't.
    let home_config = shellexpand::tilde("~/.config/m2tsforge/config.toml");
    if !Path::new(home_config.as_ref()).exists()
        && !Path::new("/etc/m2tsforge/config.toml").exists()
    {
        let defaults = Config::default();
        assert_eq!(config.convert.format, defaults.convert.format);
        assert_eq!(config.convert.extensions, defaults.convert.extensions);
        assert!(config.tools.configured().is_empty());
    }
}
