//! Command-line arguments shared by the CLI tools.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::ber::{DEFAULT_MAX_DEPTH, DecodeOptions};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree.
    #[default]
    Human,
    /// JSON document.
    Json,
    /// Each top-level value re-encoded as hex, one per line.
    Raw,
}

/// Where the encoded data comes from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// File to read; standard input when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Treat the input as hex text (whitespace ignored).
    #[arg(long)]
    pub hex: bool,
}

impl InputArgs {
    /// Read the input and, with `--hex`, convert it to bytes.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        let raw = match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read(path)?,
            _ => {
                let mut buf = Vec::new();
                io::stdin().lock().read_to_end(&mut buf)?;
                buf
            }
        };

        if self.hex {
            parse_hex(&raw)
        } else {
            Ok(raw)
        }
    }
}

/// Decoder limits.
#[derive(Debug, Args)]
pub struct LimitArgs {
    /// Maximum nesting of constructed values.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum definite length of a single value, in octets.
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl LimitArgs {
    pub fn options(&self) -> DecodeOptions {
        let options = DecodeOptions::new().max_depth(self.max_depth);
        match self.max_length {
            Some(max) => options.max_length(max),
            None => options,
        }
    }
}

/// Output and diagnostics.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format.
    #[arg(short = 'o', long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl OutputArgs {
    /// Install a stderr tracing subscriber.
    pub fn init_tracing(&self) {
        let default = match self.verbose {
            0 => "warn",
            1 => "asn1_ber=debug",
            _ => "asn1_ber=trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }
}

/// Parse hex text, ignoring ASCII whitespace.
pub fn parse_hex(text: &[u8]) -> io::Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "hex input has an odd number of digits",
        ));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_digit(pair[0])?;
            let lo = hex_digit(pair[1])?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

fn hex_digit(c: u8) -> io::Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid hex digit {:?}", c as char),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex(b"31 00").unwrap(), vec![0x31, 0x00]);
        assert_eq!(parse_hex(b"0a0B\n\tff").unwrap(), vec![0x0A, 0x0B, 0xFF]);
        assert_eq!(parse_hex(b"").unwrap(), Vec::<u8>::new());
        assert!(parse_hex(b"310").is_err());
        assert!(parse_hex(b"zz").is_err());
    }

    #[test]
    fn test_limit_options() {
        let limits = LimitArgs {
            max_depth: 4,
            max_length: Some(10),
        };
        let options = limits.options();
        assert_eq!(options.depth_limit(), 4);
        assert_eq!(options.length_limit(), 10);
    }
}
