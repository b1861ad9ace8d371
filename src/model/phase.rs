use std::fmt;

/// Progress of one key generation run
///
/// Phases only move forward. Errors carry the phase they were raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenerationPhase {
    NotStarted,
    Spawned,
    ConfirmationSent,
    PrivateKeyReceived,
    PublicKeyReceived,
    Cleaned,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationPhase::NotStarted => "not started",
            GenerationPhase::Spawned => "spawned",
            GenerationPhase::ConfirmationSent => "confirmation sent",
            GenerationPhase::PrivateKeyReceived => "private key received",
            GenerationPhase::PublicKeyReceived => "public key received",
            GenerationPhase::Cleaned => "cleaned",
        };
        f.write_str(name)
    }
}
