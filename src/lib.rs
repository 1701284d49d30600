//! # inscribe
//!
//! Binary support: tracing bootstrap, configuration resolution, adapter
//! wiring and the command line.

pub mod bootstrap;
pub mod cli;
