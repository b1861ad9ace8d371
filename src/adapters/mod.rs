//! Adapters - concrete implementations of ports (traits)

mod fifo_channel;
mod preamble_dir;
mod record_file;
mod ssh_keygen;

#[cfg(test)]
pub mod fake_keygen;
#[cfg(test)]
pub mod fake_record;
#[cfg(all(test, unix))]
pub mod test_support;

// Re-export for convenience
pub use fifo_channel::FifoProvisioner;
pub use preamble_dir::{PreambleDir, DEFAULT_PREAMBLE_DIR};
pub use record_file::{RecordFile, DEFAULT_RECORD_PATH};
pub use ssh_keygen::{SshKeygen, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
