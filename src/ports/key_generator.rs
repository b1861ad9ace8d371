//! KeyGenerator trait - capability to produce a keypair through a channel

use super::Channel;
use crate::error::GenerationError;
use crate::model::{KeyPair, KeyType};

/// Capability to generate a keypair
///
/// Implementations deliver the private key through `channel` and must never
/// write it to a path of their own choosing.
pub trait KeyGenerator {
    /// Generate a keypair of the requested type
    ///
    /// # Arguments
    ///
    /// * `key_type` - Algorithm identifier, passed through verbatim
    /// * `channel` - Endpoint the private key is delivered through
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// - The generator cannot be started or exits unsuccessfully
    /// - Either half of the keypair is missing or empty
    /// - Generation does not finish in time
    fn generate(
        &self,
        key_type: &KeyType,
        channel: &impl Channel,
    ) -> Result<KeyPair, GenerationError>;
}
