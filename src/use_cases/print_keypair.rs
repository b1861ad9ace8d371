//! Print keypair use case
//!
//! Generates a keypair, writes its print document and archives the public
//! key. Writing the document and archiving are independent: both are always
//! attempted once a document exists, and both outcomes are reported.

use std::io::Write;

use tracing::{info, warn};
use zeroize::Zeroize;

use crate::error::{ArchiveError, KeyprintResult, OutputError};
use crate::logic::{assemble, select_encoding};
use crate::model::{KeyType, Layout, PublicKey};
use crate::ports::{ChannelProvisioner, KeyGenerator, KeyRecord, PreambleSource};
use crate::use_cases::generate_keypair;

/// Outcome of the two side effects of a run
#[derive(Debug)]
pub struct PrintReport {
    pub public_key: PublicKey,
    pub output: Result<(), OutputError>,
    pub archive: Result<(), ArchiveError>,
}

impl PrintReport {
    pub fn is_success(&self) -> bool {
        self.output.is_ok() && self.archive.is_ok()
    }

    /// Collapse into a single result, output failure first
    pub fn into_result(self) -> KeyprintResult<PublicKey> {
        self.output?;
        self.archive?;
        Ok(self.public_key)
    }
}

/// Ports one run is wired to
pub struct Pipeline<'a, P, G, S, R> {
    pub provisioner: &'a P,
    pub generator: &'a G,
    pub preamble: &'a S,
    pub record: &'a R,
    pub layout: &'a Layout,
}

/// Generate a keypair, write its document to `out` and archive the public key
///
/// # Errors
///
/// Returns errors before anything is written if:
/// - The preamble cannot be loaded
/// - The channel cannot be provisioned or key generation fails
/// - A key does not fit in a QR code
///
/// Failures of the output write and of archiving are returned inside the
/// `PrintReport` instead.
pub fn print_keypair<P, G, S, R, W>(
    pipeline: &Pipeline<'_, P, G, S, R>,
    key_type: &KeyType,
    out: &mut W,
) -> KeyprintResult<PrintReport>
where
    P: ChannelProvisioner,
    G: KeyGenerator,
    S: PreambleSource,
    R: KeyRecord,
    W: Write,
{
    let fragments = pipeline.preamble.fragments()?;
    let keys = generate_keypair(pipeline.provisioner, pipeline.generator, key_type)?;

    let spec = select_encoding(keys.private().as_bytes());
    spec.check_capacity("private", keys.private().as_bytes())?;
    spec.check_capacity("public", keys.public().as_bytes())?;
    info!("Encoding at eclevel {}", spec.correction_level);

    let mut rendered = assemble(&keys, &spec, fragments, pipeline.layout).render();
    let output = out
        .write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(OutputError::from);
    rendered.zeroize();
    if let Err(e) = &output {
        warn!("Document output failed, archiving anyway: {}", e);
    }

    let archive = pipeline.record.archive(keys.public());
    if let Err(e) = &archive {
        warn!("Archiving public key failed: {}", e);
    }

    Ok(PrintReport {
        public_key: keys.public().clone(),
        output,
        archive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake_keygen::{
        FailingKeyGenerator, FakeKeyGenerator, FAKE_PRIVATE_KEY, FAKE_PUBLIC_KEY,
    };
    use crate::adapters::fake_record::{MemoryRecord, StaticPreamble};
    use crate::adapters::FifoProvisioner;
    use crate::error::{EncodingError, GenerationError};
    use crate::KeyprintError;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run<G: KeyGenerator, W: Write>(
        generator: &G,
        record: &MemoryRecord,
        out: &mut W,
    ) -> KeyprintResult<PrintReport> {
        let layout = Layout::default();
        let preamble = StaticPreamble::new(&[("b.ps", "% b"), ("a.ps", "% a")]);
        let pipeline = Pipeline {
            provisioner: &FifoProvisioner::new(),
            generator,
            preamble: &preamble,
            record,
            layout: &layout,
        };
        print_keypair(&pipeline, &KeyType::Ed25519, out)
    }

    #[test]
    fn test_print_keypair_success() {
        let record = MemoryRecord::new();
        let mut out = Vec::new();

        let report = run(&FakeKeyGenerator::new(), &record, &mut out).unwrap();

        assert!(report.is_success());
        let doc = String::from_utf8(out).unwrap();
        assert!(doc.starts_with("% a\n% b\n\n%!PS\n"));
        assert!(doc.ends_with("showpage\n%%EOF\n"));
        assert!(doc.contains("BEGIN OPENSSH PRIVATE KEY"));
        assert_eq!(record.entries.borrow().as_slice(), [FAKE_PUBLIC_KEY]);
        assert_eq!(report.into_result().unwrap().as_str(), FAKE_PUBLIC_KEY);
    }

    #[test]
    fn test_generation_failure_writes_and_archives_nothing() {
        let record = MemoryRecord::new();
        let mut out = Vec::new();

        let result = run(&FailingKeyGenerator, &record, &mut out);

        assert!(matches!(
            result,
            Err(KeyprintError::Generation(GenerationError::EmptyPrivateKey))
        ));
        assert!(out.is_empty());
        assert!(record.entries.borrow().is_empty());
    }

    #[test]
    fn test_output_failure_still_archives() {
        let record = MemoryRecord::new();

        let report = run(&FakeKeyGenerator::new(), &record, &mut BrokenPipe).unwrap();

        assert!(report.output.is_err());
        assert!(report.archive.is_ok());
        assert_eq!(record.entries.borrow().len(), 1);
        assert!(matches!(report.into_result(), Err(KeyprintError::Output(_))));
    }

    #[test]
    fn test_archive_failure_keeps_document() {
        let record = MemoryRecord::failing();
        let mut out = Vec::new();

        let report = run(&FakeKeyGenerator::new(), &record, &mut out).unwrap();

        assert!(report.output.is_ok());
        assert!(report.archive.is_err());
        assert!(!out.is_empty());
        assert!(matches!(report.into_result(), Err(KeyprintError::Archive(_))));
    }

    #[test]
    fn test_oversized_private_key_is_rejected() {
        let record = MemoryRecord::new();
        let mut out = Vec::new();
        let generator = FakeKeyGenerator::with_private_key("k".repeat(3400));

        let result = run(&generator, &record, &mut out);

        assert!(matches!(
            result,
            Err(KeyprintError::Encoding(EncodingError::PayloadTooLarge { which: "private", .. }))
        ));
        assert!(out.is_empty());
        assert!(record.entries.borrow().is_empty());
    }

    #[test]
    fn test_eclevel_follows_private_key_length() {
        let record = MemoryRecord::new();

        let mut out = Vec::new();
        run(&FakeKeyGenerator::with_private_key("k".repeat(1200)), &record, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("eclevel=L"));

        let mut out = Vec::new();
        run(&FakeKeyGenerator::with_private_key(FAKE_PRIVATE_KEY), &record, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("eclevel=M"));
    }
}
