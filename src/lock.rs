use log::warn;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file {0} already exists, another instance is running")]
    AlreadyHeld(PathBuf),
    #[error("failed to create lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pidfile guard keeping the relay single-instance.
///
/// Acquisition is create-exclusive, so two racing processes cannot both pass
/// an existence check and then both write. A pre-existing file is never
/// touched; only the file this guard created is removed, on drop.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(LockError::AlreadyHeld(path.to_path_buf()));
            }
            Err(err) => {
                return Err(LockError::Io {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        if let Err(err) = write!(file, "{}", std::process::id()) {
            let _ = fs::remove_file(path);
            return Err(LockError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(
                "[lock] failed to remove lock file {}: {}",
                self.path.display(),
                err
            );
        }
    }
}
