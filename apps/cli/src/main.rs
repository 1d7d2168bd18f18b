//! `vitrina` entry point.
//!
//! # Usage
//!
//! ```bash
//! # Browse a store and buy
//! vitrina --store sol products list --search remera
//! vitrina --store sol cart add p1 M --quantity 2
//! vitrina --store sol checkout submit --name "Ana" --phone "+54 11 5555 0000" --email ana@example.com
//!
//! # Store admin
//! vitrina login --email owner@sol.com
//! vitrina sales register --item p1:M:2 --payment cash
//! vitrina --json sales stats --from 2024-06-01 --to 2024-06-30
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;
use vitrina_cli::cli::Cli;
use vitrina_cli::render::Output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    vitrina_cli::init_tracing(cli.verbose);

    let output = Output::new(cli.json);
    if let Err(err) = vitrina_cli::run(cli).await {
        tracing::debug!(code = err.code.as_str(), "Command failed");
        output.error(&err);
        std::process::exit(1);
    }
}
