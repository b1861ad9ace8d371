use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::{error, info};

use keyprint::{api::KeyType, Config};

#[derive(Parser, Debug)]
#[command(name = "keyprint")]
#[command(about = "Generate an SSH keypair and print it as PostScript QR codes", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Key type passed to the generator (ed25519, ecdsa, rsa, ...)
    pub key_type: KeyType,

    /// Key generation utility to run
    #[arg(long, env = "KEYPRINT_KEYGEN", default_value = "ssh-keygen")]
    pub keygen: OsString,

    /// Directory holding the barcode library's PostScript files
    #[arg(long, env = "KEYPRINT_PREAMBLE_DIR", default_value = "postscriptbarcode")]
    pub preamble_dir: PathBuf,

    /// File the public key is appended to
    #[arg(long, env = "KEYPRINT_RECORD", default_value = "public_keys.out")]
    pub record: PathBuf,

    /// Seconds to wait for the generator before giving up
    #[arg(long, env = "KEYPRINT_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            keygen_program: self.keygen.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            preamble_dir: self.preamble_dir.clone(),
            record_path: self.record.clone(),
            ..Config::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the document
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install logger")?;

    let config = cli.config();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = keyprint::print_keypair_with_config(&config, &cli.key_type, &mut out)
        .and_then(|report| report.into_result());

    match result {
        Ok(public_key) => {
            info!("Archived public key to {:?}: {}", config.record_path, public_key);
        }
        Err(e) => {
            error!("{}", e);
            drop(out);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
