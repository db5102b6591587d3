//! # Vitrina CLI Entry Point
//!
//! ```bash
//! vitrina cart add --product-id A --price 10000 --quantity 3
//! vitrina price --offers-file offers.json
//! vitrina checkout --json
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    vitrina_cli::run().await
}
