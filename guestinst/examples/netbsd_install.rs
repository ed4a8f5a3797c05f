//! Unattended NetBSD base install over a serial console.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example netbsd_install -- [options] -- <console command...>
//! cargo run --example netbsd_install -- -- virsh console netbsd-base
//! ```
//!
//! Options:
//!
//! - `--filter-output` : don't echo console output to the log
//! - `--settle-ms <ms>` : settle delay before typing at a shell prompt
//! - `--param <value>` : opaque value passed through to the driver
//! - `--interactive` : hand the console over right away, then exit 0
//! - `--interact-after <n>` : run the first n steps, then hand over and exit 0
//!
//! Without an interactive option the example exits with the guest's status.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use guestinst::InstallerBuilder;
use guestinst::driver::interact_and_exit;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse() {
        Some(args) => args,
        None => {
            eprintln!("Usage: netbsd_install [options] -- <console command...>");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(e) => {
            log::error!("install failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<i32, guestinst::Error> {
    let mut builder = InstallerBuilder::new(&args.command[0])
        .args(&args.command[1..])
        .filter_output(args.filter_output);

    if let Some(ms) = args.settle_ms {
        builder = builder.settle_delay(Duration::from_millis(ms));
    }
    if let Some(param) = &args.param {
        builder = builder.param(param);
    }

    let mut driver = builder.spawn()?;

    // Interactive hand-off is its own mode: it never reports the guest status.
    if let Some(steps) = args.interact_after {
        driver.run_steps(steps).await?;
        interact_and_exit(driver.into_console()).await;
    }

    let status = driver.run_install_sequence().await?;
    println!("Guest finished: {}", status);
    Ok(status.exit_code())
}

struct Args {
    command: Vec<String>,
    filter_output: bool,
    settle_ms: Option<u64>,
    param: Option<String>,
    interact_after: Option<usize>,
}

impl Args {
    fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();
        let mut filter_output = false;
        let mut settle_ms = None;
        let mut param = None;
        let mut interact_after = None;
        let mut command = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--filter-output" => filter_output = true,
                "--settle-ms" => {
                    i += 1;
                    if i < args.len() {
                        settle_ms = args[i].parse().ok();
                    }
                }
                "--param" => {
                    i += 1;
                    if i < args.len() {
                        param = Some(args[i].clone());
                    }
                }
                "--interactive" => interact_after = Some(0),
                "--interact-after" => {
                    i += 1;
                    if i < args.len() {
                        interact_after = args[i].parse().ok();
                    }
                }
                "--" => {
                    command = args[i + 1..].to_vec();
                    break;
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    return None;
                }
            }
            i += 1;
        }

        if command.is_empty() {
            return None;
        }

        Some(Self {
            command,
            filter_output,
            settle_ms,
            param,
            interact_after,
        })
    }
}
