//! Media processing actions.
//!
//! This module provides the steps that run after track selection:
//! - DTS to AC-3 transcoding
//! - tsMuxeR metafile generation
//! - Remuxing to a transport stream

mod metafile;
mod remux;
mod transcode;

pub use metafile::{render_metafile, write_metafile, MetafileOptions};
pub use remux::{remux, OutputFormat, OutputProfile};
pub use transcode::{extraction_targets, stream_extension, transcode_dts};
