//! Process-level infrastructure: settings and log output.

#![allow(missing_docs)]

pub mod config;
pub mod telemetry;
