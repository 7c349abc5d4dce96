mod cli;

use m2tsforge::{
    batch::{self, BatchSettings},
    config, logging,
};
use m2tsforge_av::{
    check_tools as check_external_tools, CliToolchain, ConvertOptions, DtsDetection,
    OutputFormat, Pipeline, TrackRecord, Workspace,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only a conversion run writes a log file, next to its input
    let log_dir = match &cli.command {
        Commands::Convert {
            input, log: true, ..
        } => Some(logging::log_dir_for(input)).filter(|dir| dir.is_dir()),
        _ => None,
    };
    if let Some(path) = logging::init(cli.verbose, log_dir.as_deref())? {
        tracing::info!("Logging to {:?}", path);
    }

    match cli.command {
        Commands::Convert {
            input,
            dest,
            format,
            split,
            delete_source,
            log: _,
            dry_run,
        } => {
            let request = ConvertRequest {
                input,
                dest,
                format,
                split,
                delete_source,
                dry_run,
            };
            if !convert(request, cli.config.as_deref())? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Probe { file, json } => probe_file(&file, json, cli.config.as_deref()),
        Commands::Meta {
            file,
            format,
            split,
        } => print_metafile(&file, format, split, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("m2tsforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Command-line conversion settings before they are merged with the config.
struct ConvertRequest {
    input: PathBuf,
    dest: Option<PathBuf>,
    format: Option<OutputFormat>,
    split: bool,
    delete_source: bool,
    dry_run: bool,
}

/// Convert the requested input. Returns `false` when any file failed.
fn convert(request: ConvertRequest, config_path: Option<&Path>) -> Result<bool> {
    let config = config::load_config_or_default(config_path)?;

    let format = request.format.unwrap_or(config.convert.format);
    let files = batch::collect_inputs(&request.input, &config.convert.extensions)?;
    batch::check_format_for_inputs(&files, format)?;

    if let Some(dest) = &request.dest {
        if !request.dry_run {
            batch::ensure_destination(dest)?;
        }
    }

    let work_dir = match config.convert.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let settings = BatchSettings {
        format,
        split: request.split || config.convert.split,
        destination: request.dest,
        delete_source: request.delete_source || config.convert.delete_source,
        dry_run: request.dry_run,
        work_dir,
    };

    tracing::info!(
        "Converting {} file(s) to {}{}",
        files.len(),
        settings.format,
        if settings.split { " (split)" } else { "" }
    );

    let toolchain = CliToolchain::new(config.tools.tool_paths());
    let summary = batch::run_batch(&toolchain, &files, &settings);

    for outcome in &summary.succeeded {
        if settings.dry_run {
            println!("[DRY RUN] {}", outcome.source.display());
            print!("{}", outcome.metafile);
            println!();
        } else if let Some(ref output) = outcome.output {
            println!("✓ {} -> {}", outcome.source.display(), output.display());
        }
    }
    for failure in &summary.failed {
        println!("✗ {}", failure);
    }

    println!(
        "\n{} converted, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );

    Ok(summary.is_success())
}

fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let toolchain = CliToolchain::new(config.tools.tool_paths());
    let tracks = m2tsforge_av::probe(&toolchain, file)?;

    if json {
        let json_str = serde_json::to_string_pretty(&tracks)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("\nTracks: {}", tracks.len());
    for track in &tracks {
        print_track(track);
    }

    let selection = m2tsforge_av::select_tracks(&tracks);
    println!("\nSelected: {} track(s)", selection.len());
    match selection.detect_dts() {
        DtsDetection::Dts => println!("Audio: DTS (will be transcoded to AC-3)"),
        DtsDetection::NotDts => println!("Audio: no transcode needed"),
        DtsDetection::NotApplicable => {}
    }

    Ok(())
}

fn print_track(track: &TrackRecord) {
    print!("  [{}] {} {}", track.track_id, track.kind, track.codec());
    if let (Some(width), Some(height)) = (track.width, track.height) {
        print!(" {}x{}", width, height);
    }
    if let Some(ref fps) = track.frame_rate {
        print!(" {} fps", fps);
    }
    if let Some(ref level) = track.level_profile {
        print!(" ({})", level);
    }
    if let Some(kbps) = track.bit_rate_kbps {
        print!(" {} kbps", kbps);
    }
    if let Some(ref lang) = track.language {
        print!(" [{}]", lang);
    }
    println!();
}

fn print_metafile(
    file: &Path,
    format: Option<OutputFormat>,
    split: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let toolchain = CliToolchain::new(config.tools.tool_paths());

    let mut options = ConvertOptions::new(".");
    options.format = format.unwrap_or(config.convert.format);
    options.split = split || config.convert.split;
    options.dry_run = true;

    let workspace = Workspace::in_current_dir(file)?;
    let outcome = Pipeline::new(&toolchain, options).process(&workspace)?;
    print!("{}", outcome.metafile);

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = check_external_tools(&config.tools.tool_paths());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them or set their paths under [tools].");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Format: {}", config.convert.format);
    println!("  Split: {}", config.convert.split);
    println!("  Delete source: {}", config.convert.delete_source);
    println!("  Extensions: {}", config.convert.extensions.join(", "));
    match config.convert.work_dir {
        Some(ref dir) => println!("  Work dir: {}", dir.display()),
        None => println!("  Work dir: current directory"),
    }
    println!("  Tool paths configured: {}", config.tools.configured().len());

    Ok(())
}
