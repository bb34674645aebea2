// SPDX-License-Identifier: MIT

use clap::Parser;
use std::{thread, time::Duration};

/// Sleeps, then exits with the given status.
#[derive(Debug, Parser)]
struct Args {
    /// Exit status
    #[arg(long, default_value_t = 0)]
    code: i32,

    /// Time to wait before exiting
    #[arg(long = "delay-ms", default_value_t = 0)]
    delay_ms: u64,
}

fn main() {
    let args = Args::parse();
    thread::sleep(Duration::from_millis(args.delay_ms));
    std::process::exit(args.code);
}
