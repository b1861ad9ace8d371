//! Print an SSH keypair as a one-page PostScript document
//!
//! The private key is read from `ssh-keygen` through a named pipe in a
//! private temporary directory, rendered as a QR code with a text transcript
//! next to the public key's QR code, and the public key is appended to a
//! local record.

mod adapters;
pub mod api;
pub mod config;
pub mod error;
mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::Config;
pub use error::{KeyprintError, KeyprintResult};

// Re-export public API
pub use api::{generate_keypair_with_config, print_keypair, print_keypair_with_config};
pub use use_cases::PrintReport;
