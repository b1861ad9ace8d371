//! Generate keypair use case
//!
//! This use case provisions an ephemeral channel, runs the key generator
//! against it and tears the channel down again.

use tracing::{debug, error};

use crate::error::KeyprintResult;
use crate::model::{KeyPair, KeyType};
use crate::ports::{Channel, ChannelProvisioner, KeyGenerator};

/// Generate a keypair through a freshly provisioned channel
///
/// This function orchestrates the complete generation workflow:
/// 1. Create an owner-only ephemeral channel
/// 2. Generate the keypair through it
/// 3. Destroy the channel, whether or not generation succeeded
///
/// # Arguments
///
/// * `provisioner` - Channel provisioner implementation
/// * `generator` - Key generator implementation
/// * `key_type` - Algorithm identifier, passed through verbatim
///
/// # Errors
///
/// Returns errors if:
/// - The channel cannot be created or destroyed
/// - Key generation fails
///
/// When generation and destruction both fail, the generation error is
/// returned and the destruction error is logged.
pub fn generate_keypair<P, G>(
    provisioner: &P,
    generator: &G,
    key_type: &KeyType,
) -> KeyprintResult<KeyPair>
where
    P: ChannelProvisioner,
    G: KeyGenerator,
{
    let channel = provisioner.create()?;
    debug!("Generating {} keypair via {:?}", key_type, channel.path());

    let generated = generator.generate(key_type, &channel);
    let destroyed = channel.destroy();

    match (generated, destroyed) {
        (Ok(pair), Ok(())) => Ok(pair),
        (Ok(_pair), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e.into()),
        (Err(e), Err(cleanup)) => {
            error!("Failed to destroy channel after failed generation: {}", cleanup);
            Err(e.into())
        }
    }
}
