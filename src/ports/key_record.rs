use crate::error::ArchiveError;
use crate::model::PublicKey;

/// Append-only log of generated public keys
pub trait KeyRecord {
    /// Append one entry
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError` if the record cannot be opened, locked or
    /// written.
    fn archive(&self, public_key: &PublicKey) -> Result<(), ArchiveError>;
}
