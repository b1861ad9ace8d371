//! Error types for keyprint
//!
//! This module defines the error hierarchy for every phase of a run.
//! Errors are organized per phase and use thiserror for implementation.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{CorrectionLevel, GenerationPhase};

/// Result type alias for keyprint operations
///
/// This is a convenience alias for `Result<T, KeyprintError>`.
pub type KeyprintResult<T> = Result<T, KeyprintError>;

/// Top-level error type for all keyprint operations
#[derive(Error, Debug)]
pub enum KeyprintError {
    /// Ephemeral channel errors
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    /// External key generation errors
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Barcode payload errors
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// Preamble resource errors
    #[error("loading resources failed: {0}")]
    Resource(#[from] ResourceError),

    /// Document output errors
    #[error("writing document failed: {0}")]
    Output(#[from] OutputError),

    /// Public key record errors
    #[error("archiving failed: {0}")]
    Archive(#[from] ArchiveError),
}

impl KeyprintError {
    /// Name of the pipeline phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            KeyprintError::Provision(_) => "provisioning",
            KeyprintError::Generation(_) => "generation",
            KeyprintError::Encoding(_) => "encoding",
            KeyprintError::Resource(_) => "resources",
            KeyprintError::Output(_) => "output",
            KeyprintError::Archive(_) => "archiving",
        }
    }

    /// Process exit status for this error
    ///
    /// 2 is left to clap for usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            KeyprintError::Provision(_) => 3,
            KeyprintError::Generation(_) => 4,
            KeyprintError::Resource(_) => 5,
            KeyprintError::Encoding(_) => 6,
            KeyprintError::Output(_) => 7,
            KeyprintError::Archive(_) => 8,
        }
    }
}

/// Ephemeral channel errors
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The unique private directory could not be reserved
    #[error("failed to reserve a temporary name: {source}")]
    Reserve { source: std::io::Error },

    /// The path cannot be handed to the OS
    #[error("channel path contains a NUL byte: {path:?}")]
    InvalidPath { path: PathBuf },

    /// mkfifo failed
    #[error("failed to create named pipe at {path:?}: {source}")]
    CreateFifo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The pipe ended up readable by group or other
    #[error("named pipe at {path:?} has mode {mode:o}, expected owner-only access")]
    InsecureMode { path: PathBuf, mode: u32 },

    /// Removing the channel failed
    #[error("failed to remove channel at {path:?}: {source}")]
    Destroy {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Named pipes are not available on this platform
    #[error("named pipes are not supported on this platform")]
    Unsupported,
}

/// External key generation errors
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The utility could not be started
    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Writing the overwrite confirmation failed
    #[error("failed to confirm overwrite ({phase}): {source}")]
    Confirmation {
        phase: GenerationPhase,
        source: std::io::Error,
    },

    /// The utility exited unsuccessfully
    #[error("key generator exited with {status} ({phase})")]
    ExitStatus {
        phase: GenerationPhase,
        status: std::process::ExitStatus,
    },

    /// The utility did not finish in time
    #[error("key generator did not finish within {seconds}s ({phase})")]
    Timeout { phase: GenerationPhase, seconds: u64 },

    /// Reading the private key from the channel failed
    #[error("failed to read private key from channel ({phase}): {reason}")]
    ChannelRead {
        phase: GenerationPhase,
        reason: String,
    },

    /// The channel delivered nothing
    #[error("no private key received from channel")]
    EmptyPrivateKey,

    /// The sibling public key file was not written
    #[error("public key file {path:?} is missing")]
    PublicKeyMissing { path: PathBuf },

    /// Reading the sibling public key file failed
    #[error("failed to read public key file {path:?}: {source}")]
    PublicKeyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The public key file was empty
    #[error("public key file {path:?} is empty")]
    EmptyPublicKey { path: PathBuf },

    /// Key material was not text
    #[error("{which} key is not valid UTF-8")]
    InvalidUtf8 { which: &'static str },

    /// The sibling public key file could not be removed
    #[error("failed to remove public key file {path:?}: {source}")]
    ArtifactCleanup {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Barcode payload errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The payload does not fit in the largest QR symbol at this level
    #[error("{which} key is {len} bytes, more than the {capacity} bytes a QR code holds at eclevel {level}")]
    PayloadTooLarge {
        which: &'static str,
        len: usize,
        capacity: usize,
        level: CorrectionLevel,
    },
}

/// Preamble resource errors
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("failed to list preamble directory {path:?}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read preamble fragment {path:?}: {source}")]
    ReadFragment {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Fragments are relayed as text and must be UTF-8 (BWIPP is plain ASCII)
    #[error("preamble fragment {path:?} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// Document output errors
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("{0}")]
    Write(#[from] std::io::Error),
}

/// Public key record errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The record file could not be opened for appending
    #[error("failed to open record {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The advisory lock could not be taken
    #[error("failed to lock record {path:?}: {source}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the entry failed
    #[error("failed to append to record {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
