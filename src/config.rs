//! Run configuration

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::{DEFAULT_PREAMBLE_DIR, DEFAULT_PROGRAM, DEFAULT_RECORD_PATH, DEFAULT_TIMEOUT};
use crate::model::Layout;

/// Everything a run can be pointed at
///
/// The defaults reproduce the stock behavior: `ssh-keygen` from `PATH`, the
/// barcode library in `./postscriptbarcode`, and public keys appended to
/// `./public_keys.out`.
#[derive(Debug, Clone)]
pub struct Config {
    pub keygen_program: OsString,
    pub timeout: Duration,
    pub preamble_dir: PathBuf,
    pub record_path: PathBuf,
    /// Where channel directories are created; the system temp dir if `None`
    pub channel_dir: Option<PathBuf>,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keygen_program: DEFAULT_PROGRAM.into(),
            timeout: DEFAULT_TIMEOUT,
            preamble_dir: DEFAULT_PREAMBLE_DIR.into(),
            record_path: DEFAULT_RECORD_PATH.into(),
            channel_dir: None,
            layout: Layout::default(),
        }
    }
}
