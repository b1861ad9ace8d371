use std::io::Write;

use crate::adapters::{FifoProvisioner, PreambleDir, RecordFile, SshKeygen};
use crate::config::Config;
use crate::error::KeyprintResult;
use crate::use_cases::{
    generate_keypair as generate_keypair_use_case, print_keypair as print_keypair_use_case,
    Pipeline, PrintReport,
};

pub use crate::model::*;

fn provisioner(config: &Config) -> FifoProvisioner {
    match &config.channel_dir {
        Some(dir) => FifoProvisioner::in_dir(dir),
        None => FifoProvisioner::new(),
    }
}

fn generator(config: &Config) -> SshKeygen {
    SshKeygen::new(config.keygen_program.clone(), config.timeout)
}

/// Run the whole pipeline with the default configuration, writing to `out`
pub fn print_keypair(key_type: &KeyType, out: &mut impl Write) -> KeyprintResult<PrintReport> {
    print_keypair_with_config(&Config::default(), key_type, out)
}

pub fn print_keypair_with_config(
    config: &Config,
    key_type: &KeyType,
    out: &mut impl Write,
) -> KeyprintResult<PrintReport> {
    let pipeline = Pipeline {
        provisioner: &provisioner(config),
        generator: &generator(config),
        preamble: &PreambleDir::new(&config.preamble_dir),
        record: &RecordFile::new(&config.record_path),
        layout: &config.layout,
    };
    print_keypair_use_case(&pipeline, key_type, out)
}

/// Generate a keypair without printing or archiving it
pub fn generate_keypair_with_config(config: &Config, key_type: &KeyType) -> KeyprintResult<KeyPair> {
    generate_keypair_use_case(&provisioner(config), &generator(config), key_type)
}
