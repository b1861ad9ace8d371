//! Named pipe implementation of the ephemeral channel
//!
//! Each channel lives in its own freshly created `0700` directory, so the
//! pipe name cannot collide and the sibling `.pub` file the utility writes
//! lands somewhere only the current user can reach.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::ProvisionError;
use crate::ports::{Channel, ChannelProvisioner};

const FIFO_NAME: &str = "key";
const DIR_PREFIX: &str = "keyprint-";

/// Creates FIFO channels under a base directory (the system temp dir by default)
#[derive(Debug, Clone, Default)]
pub struct FifoProvisioner {
    base: Option<PathBuf>,
}

impl FifoProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn reserve_dir(&self) -> Result<TempDir, ProvisionError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o700));
        }
        let dir = match &self.base {
            Some(base) => builder.tempdir_in(base),
            None => builder.tempdir(),
        };
        dir.map_err(|source| ProvisionError::Reserve { source })
    }
}

impl ChannelProvisioner for FifoProvisioner {
    type Channel = FifoChannel;

    fn create(&self) -> Result<FifoChannel, ProvisionError> {
        let dir = self.reserve_dir()?;
        let path = dir.path().join(FIFO_NAME);

        make_fifo(&path)?;
        verify_owner_only(&path)?;

        debug!("Created ephemeral channel at {:?}", path);
        Ok(FifoChannel {
            dir: Some(dir),
            path,
        })
    }
}

/// A named pipe inside a private temporary directory
///
/// Dropping the channel removes it. `destroy` does the same but reports
/// failures.
#[derive(Debug)]
pub struct FifoChannel {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Channel for FifoChannel {
    fn path(&self) -> &Path {
        &self.path
    }

    fn destroy(mut self) -> Result<(), ProvisionError> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        let dir_path = dir.path().to_path_buf();
        dir.close().map_err(|source| ProvisionError::Destroy {
            path: dir_path,
            source,
        })?;
        debug!("Destroyed ephemeral channel at {:?}", self.path);
        Ok(())
    }
}

impl Drop for FifoChannel {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            warn!("Ephemeral channel at {:?} dropped without destroy", self.path);
            if let Err(e) = dir.close() {
                warn!("Failed to remove ephemeral channel: {}", e);
            }
        }
    }
}

#[cfg(unix)]
fn make_fifo(path: &Path) -> Result<(), ProvisionError> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        ProvisionError::InvalidPath {
            path: path.to_path_buf(),
        }
    })?;

    // SAFETY: c_path is a valid NUL-terminated string for the whole call
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if rc != 0 {
        return Err(ProvisionError::CreateFifo {
            path: path.to_path_buf(),
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_fifo(_path: &Path) -> Result<(), ProvisionError> {
    Err(ProvisionError::Unsupported)
}

/// Both the pipe and its directory must be closed to group and other
#[cfg(unix)]
fn verify_owner_only(path: &Path) -> Result<(), ProvisionError> {
    if let Some(dir) = path.parent() {
        verify_mode(dir)?;
    }
    verify_mode(path)
}

#[cfg(unix)]
fn verify_mode(path: &Path) -> Result<(), ProvisionError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path).map_err(|source| {
        ProvisionError::CreateFifo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let mode = metadata.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(ProvisionError::InsecureMode {
            path: path.to_path_buf(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn verify_owner_only(_path: &Path) -> Result<(), ProvisionError> {
    Err(ProvisionError::Unsupported)
}
