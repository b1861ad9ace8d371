//! Use cases (orchestration)
//!
//! This module contains use cases that orchestrate operations across multiple ports.
//! Use cases coordinate between adapters and logic to fulfill the run.

mod generate_keypair;
mod print_keypair;

pub use generate_keypair::generate_keypair;
pub use print_keypair::{print_keypair, Pipeline, PrintReport};
