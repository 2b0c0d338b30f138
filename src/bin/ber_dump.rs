//! ber-dump: Decode BER/DER data and print its structure.
//!
//! Part of the asn1-ber CLI utilities.

use asn1_ber::Decoder;
use asn1_ber::cli::args::{InputArgs, LimitArgs, OutputArgs};
use asn1_ber::cli::output::{OutputContext, write_error};
use clap::Parser;
use std::process::ExitCode;

/// Decode every top-level BER value in the input and print it.
#[derive(Debug, Parser)]
#[command(name = "ber-dump", version, about)]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    limits: LimitArgs,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    args.output.init_tracing();

    let data = match args.input.read() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(octets = data.len(), "read input");

    let mut decoder = Decoder::new(data).with_options(args.limits.options());
    let mut values = Vec::new();
    loop {
        match decoder.is_empty() {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                write_error(&e);
                return ExitCode::FAILURE;
            }
        }
        match decoder.read_value() {
            Ok(value) => values.push(value),
            Err(e) => {
                write_error(&e);
                return ExitCode::FAILURE;
            }
        }
    }

    let output_ctx = OutputContext::new(args.output.format);
    if let Err(e) = output_ctx.write_values(&values) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
