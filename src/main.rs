//! polldot
//!
//! Regularly polls for the existence and contents of a file offered by a
//! webserver. When the file starts with a dot `.`, a mail is sent and the
//! program exits. Never more than one mail is sent.
//!
//! # Architecture Overview
//!
//! ```text
//!   OS signals ──▶ signal listener ──(reload / quit)──▶ poll loop
//!                                                        │   ▲
//!                                      every interval    │   │ SIGHUP: reload
//!                                                        ▼   │
//!                                                 GET url   ~/.polldot.json
//!                                                        │
//!                                             first byte '.'
//!                                                        ▼
//!                                               SMTP mail (5s) ──▶ exit
//! ```
//!
//! Configuration lives in `~/.polldot.json`, the log in `~/polldot.log`.
//! SIGHUP reloads the configuration; SIGINT, SIGTERM and SIGUSR1 exit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use polldot::config::IntervalPolicy;
use polldot::lifecycle::startup::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "polldot", version)]
#[command(about = "Poll a URL for a '.' and send a single mail when it appears", long_about = None)]
struct Cli {
    /// Configuration file [default: ~/.polldot.json]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file [default: ~/polldot.log]
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Log level for the log file (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// What to do with poll intervals below 10 seconds: clamp or reject
    #[arg(long, default_value_t = IntervalPolicy::Clamp)]
    interval_policy: IntervalPolicy,

    /// Give up on a fetch after this many seconds (no limit by default)
    #[arg(long)]
    fetch_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = StartupOptions {
        config_path: cli.config,
        log_path: cli.log_file,
        log_level: cli.log_level,
        interval_policy: cli.interval_policy,
        fetch_timeout: cli.fetch_timeout_secs.map(Duration::from_secs),
    };

    match startup::run(options).await {
        Ok(outcome) => {
            eprintln!("{outcome}");
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            // Later errors already reached stderr through the log subscriber.
            if e.before_logging() {
                eprintln!("polldot: {e}");
            }
            ExitCode::from(2)
        }
    }
}
