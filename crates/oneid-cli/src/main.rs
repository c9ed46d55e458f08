//! # `oneid`
//!
//! Prints ids from the `oneid` library. The server and process ids come from
//! the `SERVER_ID` and `PROCESS_ID` environment variables (a `.env` file in
//! the working directory is honored).
//!
//! ## Usage
//!
//! ```bash
//! SERVER_ID=12 PROCESS_ID=0 oneid --width i64 --count 10 --decompose
//! ```

mod config;
mod run;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_tracing()?;

    let stdout = std::io::stdout();
    run::run(&config, &mut stdout.lock())
}
