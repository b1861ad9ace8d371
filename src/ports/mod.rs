//! Ports (traits) for the keyprint pipeline
//!
//! These traits define the capabilities a run needs. The use cases depend
//! on these abstractions, not on FIFOs, subprocesses or files directly.

mod channel;
mod key_generator;
mod key_record;
mod preamble_source;


pub use channel::{Channel, ChannelProvisioner};
pub use key_generator::KeyGenerator;
pub use key_record::KeyRecord;
pub use preamble_source::{PreambleFragment, PreambleSource};
