use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Duplicates log output to the log file and the console.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

/// Set up the process-wide logger: timestamped, severity-tagged, writing to
/// the given log file and/or the console. With neither destination, output
/// is discarded.
pub fn init(logfile: Option<&Path>, screen: bool, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder.filter_level(level).format_timestamp_secs();

    match (logfile, screen) {
        (Some(path), screen) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            if screen {
                builder.target(Target::Pipe(Box::new(Tee { file })));
            } else {
                builder.target(Target::Pipe(Box::new(file)));
            }
        }
        (None, true) => {
            builder.target(Target::Stderr);
        }
        (None, false) => {
            builder.target(Target::Pipe(Box::new(io::sink())));
        }
    }

    builder.try_init().context("logger already initialized")?;
    Ok(())
}
