//! lldpgraph core — turns per-device LLDP neighbor dumps into topology graph elements.
//!
//! This crate contains the build logic: input scanning, neighbor-schema
//! normalization, node/edge deduplication and the JSON element files.

pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod phases;
pub mod pipeline;
