//! m2tsforge - Convert MKV files to PS3-compatible M2TS/TS
//!
//! This library crate exposes the batch driver and configuration for
//! integration testing. The conversion itself lives in `m2tsforge-av`.

pub mod batch;
pub mod config;
pub mod logging;
