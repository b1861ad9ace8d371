//! Append-only file of generated public keys
//!
//! One key per line. An exclusive advisory lock is held while appending so
//! concurrent runs cannot interleave their entries.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ArchiveError;
use crate::model::PublicKey;
use crate::ports::KeyRecord;

pub const DEFAULT_RECORD_PATH: &str = "public_keys.out";

#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, ArchiveError> {
        let mut opts = OpenOptions::new();
        opts.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o644);
        }
        opts.open(&self.path).map_err(|source| ArchiveError::Open {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for RecordFile {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_PATH)
    }
}

impl KeyRecord for RecordFile {
    fn archive(&self, public_key: &PublicKey) -> Result<(), ArchiveError> {
        let mut file = self.open()?;
        lock_exclusive(&file).map_err(|source| ArchiveError::Lock {
            path: self.path.clone(),
            source,
        })?;

        let mut entry = String::with_capacity(public_key.len() + 1);
        entry.push_str(public_key.as_str());
        entry.push('\n');

        file.write_all(entry.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| ArchiveError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!("Appended public key to {:?}", self.path);
        // Closing the file releases the lock
        Ok(())
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor stays open for the duration of the call
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::record_contract::{self, RecordEntries};
    use tempfile::TempDir;

    struct TempRecord {
        _dir: TempDir,
        record: RecordFile,
    }

    impl TempRecord {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let record = RecordFile::new(dir.path().join("public_keys.out"));
            Self { _dir: dir, record }
        }
    }

    impl KeyRecord for TempRecord {
        fn archive(&self, public_key: &PublicKey) -> Result<(), ArchiveError> {
            self.record.archive(public_key)
        }
    }

    impl RecordEntries for TempRecord {
        fn entries(&self) -> Vec<String> {
            match std::fs::read_to_string(self.record.path()) {
                Ok(text) => text.lines().map(str::to_string).collect(),
                Err(_) => Vec::new(),
            }
        }
    }

    contract_tests_for!(
        record_file_contract,
        make = TempRecord::new,
        tests = {
            test_archive_single_entry => record_contract::test_archive_single_entry,
            test_archive_preserves_order => record_contract::test_archive_preserves_order,
            test_archive_starts_empty => record_contract::test_archive_starts_empty,
        }
    );

    #[test]
    fn test_appends_to_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_keys.out");
        std::fs::write(&path, "ssh-rsa AAAAold\n").unwrap();

        RecordFile::new(&path)
            .archive(&PublicKey::new("ssh-ed25519 AAAAnew"))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "ssh-rsa AAAAold\nssh-ed25519 AAAAnew\n"
        );
    }

    #[test]
    fn test_unwritable_path() {
        let record = RecordFile::new("/nonexistent/dir/public_keys.out");
        let result = record.archive(&PublicKey::new("ssh-ed25519 AAAA"));
        assert!(matches!(result, Err(ArchiveError::Open { .. })));
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public_keys.out");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let record = RecordFile::new(&path);
                std::thread::spawn(move || {
                    let key = PublicKey::new(&format!("ssh-ed25519 {} k{i}", "A".repeat(4096)));
                    record.archive(&key).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.starts_with("ssh-ed25519 A")));
    }
}
