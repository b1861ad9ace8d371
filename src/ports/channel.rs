//! Channel traits - capability to hand a secret over without a persistent file

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ProvisionError;

/// A named, single-use endpoint the private key is delivered through
pub trait Channel {
    /// Path the key generation utility is told to write to
    fn path(&self) -> &Path;

    /// Sibling path the utility writes the public key to (`<path>.pub`)
    fn public_key_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path().as_os_str());
        name.push(".pub");
        PathBuf::from(name)
    }

    /// Remove the channel and anything staged next to it
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Destroy` if the filesystem entries could not
    /// be removed.
    fn destroy(self) -> Result<(), ProvisionError>
    where
        Self: Sized;
}

/// Capability to create ephemeral channels
pub trait ChannelProvisioner {
    type Channel: Channel;

    /// Create a fresh channel restricted to the current user
    ///
    /// The channel exists and is access-restricted before this returns, so
    /// its name can be handed to another process right away.
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// - A unique name cannot be reserved
    /// - The pipe cannot be created
    /// - The pipe ends up accessible to other users
    fn create(&self) -> Result<Self::Channel, ProvisionError>;
}
