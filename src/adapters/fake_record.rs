use std::cell::RefCell;

use crate::error::{ArchiveError, ResourceError};
use crate::model::PublicKey;
use crate::ports::contract_tests::record_contract::RecordEntries;
use crate::ports::{KeyRecord, PreambleFragment, PreambleSource};

#[derive(Debug, Default)]
pub struct MemoryRecord {
    pub entries: RefCell<Vec<String>>,
    pub fail: bool,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl KeyRecord for MemoryRecord {
    fn archive(&self, public_key: &PublicKey) -> Result<(), ArchiveError> {
        if self.fail {
            return Err(ArchiveError::Open {
                path: "memory".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.entries.borrow_mut().push(public_key.as_str().to_string());
        Ok(())
    }
}

impl RecordEntries for MemoryRecord {
    fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

/// Fixed fragments, handed out in the given (unsorted) order
#[derive(Debug, Default)]
pub struct StaticPreamble(pub Vec<PreambleFragment>);

impl StaticPreamble {
    pub fn new(fragments: &[(&str, &str)]) -> Self {
        Self(
            fragments
                .iter()
                .map(|(name, text)| PreambleFragment {
                    name: name.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        )
    }
}

impl PreambleSource for StaticPreamble {
    fn fragments(&self) -> Result<Vec<PreambleFragment>, ResourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::record_contract;

    contract_tests_for!(
        memory_record_contract,
        make = MemoryRecord::new,
        tests = {
            test_archive_single_entry => record_contract::test_archive_single_entry,
            test_archive_preserves_order => record_contract::test_archive_preserves_order,
            test_archive_starts_empty => record_contract::test_archive_starts_empty,
        }
    );

    #[test]
    fn test_failing_record() {
        let record = MemoryRecord::failing();
        assert!(record.archive(&PublicKey::new("ssh-ed25519 AAAA")).is_err());
        assert!(record.entries().is_empty());
    }
}
