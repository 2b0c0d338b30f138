//! CLI utilities for asn1-ber.
//!
//! This module provides command-line argument parsing and output
//! formatting for the `ber-dump` tool.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
