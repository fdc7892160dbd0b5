use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use statusfeed::config::Config;
use statusfeed::lock::{LockError, LockFile};
use statusfeed::logging;
use statusfeed::relay::Relay;

#[derive(clap::Parser, Debug)]
#[clap(about = "Relays dashboard metric values from a monitoring API to a status-page metrics API")]
struct Args {
    /// Configuration file with API endpoints and the metrics to relay
    #[clap(short, long, default_value = "statusfeed.json")]
    config: PathBuf,

    /// Build and log destination requests without sending them
    #[clap(short, long)]
    dry_run: bool,

    /// Log file path; pass an empty string to disable file logging
    #[clap(short, long, default_value = "statusfeed.log")]
    logfile: String,

    /// Pid lock file guarding against a second concurrent instance
    #[clap(short, long, default_value = "/tmp/statusfeed.pid")]
    pidfile: PathBuf,

    /// Echo log output to the console
    #[clap(short, long)]
    screen: bool,

    /// Log debug information
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // The lock is taken before anything else so a second instance exits
    // without side effects. The guard's Drop removes the file on every
    // return path below.
    let _lock = match LockFile::acquire(&args.pidfile) {
        Ok(lock) => lock,
        Err(LockError::AlreadyHeld(path)) => {
            eprintln!(
                "FATAL: lock file {} already exists, another instance is running",
                path.display()
            );
            return ExitCode::from(1);
        }
        Err(err) => {
            eprintln!("FATAL: {err}");
            return ExitCode::from(1);
        }
    };

    let logfile = (!args.logfile.is_empty()).then(|| PathBuf::from(&args.logfile));
    if let Err(err) = logging::init(logfile.as_deref(), args.screen, args.verbose) {
        eprintln!("FATAL: {err:#}");
        return ExitCode::from(2);
    }

    info!("------------------------------");
    info!("statusfeed starting");
    info!("------------------------------");

    let code = match run(&args).await {
        Ok(code) => code,
        Err(err) => {
            error!("unhandled error: {err:#}");
            ExitCode::from(2)
        }
    };

    info!("*** statusfeed stopping ***");
    code
}

async fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let config = Config::load(&args.config)?;

    if config.metrics.is_empty() {
        info!("no metrics have been defined, nothing to do, exiting");
        return Ok(ExitCode::SUCCESS);
    }

    if args.dry_run {
        info!("dry-run mode: destination requests will be logged, not sent");
    }

    let relay = Relay::new(&config, args.dry_run)?;

    tokio::select! {
        _ = relay.run() => {}
        _ = shutdown_signal() => info!("shutdown signal received"),
    }

    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        Err(_) => {
            let _ = ctrl_c.await;
        }
    }
}
