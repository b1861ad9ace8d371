//! `ssh-keygen` implementation of the key generator
//!
//! The utility is pointed at the channel's FIFO as its output file. Because
//! the FIFO already exists it asks whether to overwrite, so a `y` line is
//! written to its stdin before anything else happens. The private key is then
//! read from the FIFO on a separate thread while the child is polled, which
//! keeps every wait bounded by the configured timeout.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::error::GenerationError;
use crate::model::{GenerationPhase, KeyPair, KeyType, PrivateKey, PublicKey};
use crate::ports::{Channel, KeyGenerator};

pub const DEFAULT_PROGRAM: &str = "ssh-keygen";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);
// How long to wait for the reader thread once it has been unblocked
const READER_GRACE: Duration = Duration::from_secs(2);
const CONFIRMATION: &[u8] = b"y\n";

type ReadResult = io::Result<Vec<u8>>;

#[derive(Debug, Clone)]
pub struct SshKeygen {
    program: OsString,
    timeout: Duration,
}

impl Default for SshKeygen {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl SshKeygen {
    pub fn new(program: impl Into<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn command(&self, key_type: &KeyType, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-q")
            .arg("-t")
            .arg(key_type.as_str())
            .arg("-N")
            .arg("")
            .arg("-f")
            .arg(target)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl KeyGenerator for SshKeygen {
    fn generate(
        &self,
        key_type: &KeyType,
        channel: &impl Channel,
    ) -> Result<KeyPair, GenerationError> {
        let mut run = Run::new(self.timeout);
        let fifo = channel.path();

        let child = self.command(key_type, fifo).spawn().map_err(|source| {
            GenerationError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            }
        })?;
        let mut child = ChildGuard::new(child);
        run.advance(GenerationPhase::Spawned);

        confirm_overwrite(child.get_mut(), run.phase)?;
        run.advance(GenerationPhase::ConfirmationSent);

        let reader = ChannelReader::start(fifo);
        let mut bytes = run.receive_private_key(&mut child, reader)?;
        let status = match run.wait_for_exit(&mut child) {
            Ok(status) => status,
            Err(e) => {
                bytes.zeroize();
                return Err(e);
            }
        };
        if !status.success() {
            bytes.zeroize();
            return Err(GenerationError::ExitStatus {
                phase: run.phase,
                status,
            });
        }

        let private_key = into_private_key(bytes)?;
        run.advance(GenerationPhase::PrivateKeyReceived);

        let public_key = take_public_key(&channel.public_key_path())?;
        run.advance(GenerationPhase::PublicKeyReceived);
        run.advance(GenerationPhase::Cleaned);

        info!(
            "Generated {} keypair ({} byte private key)",
            key_type,
            private_key.len()
        );
        Ok(KeyPair::new(private_key, public_key))
    }
}

/// Phase tracking and the shared deadline of one run
struct Run {
    phase: GenerationPhase,
    timeout: Duration,
    deadline: Instant,
}

impl Run {
    fn new(timeout: Duration) -> Self {
        Self {
            phase: GenerationPhase::NotStarted,
            timeout,
            deadline: Instant::now() + timeout,
        }
    }

    fn advance(&mut self, phase: GenerationPhase) {
        debug!("Key generation: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn timed_out(&self) -> GenerationError {
        GenerationError::Timeout {
            phase: self.phase,
            seconds: self.timeout.as_secs(),
        }
    }

    fn read_failed(&self, err: io::Error) -> GenerationError {
        GenerationError::ChannelRead {
            phase: self.phase,
            reason: err.to_string(),
        }
    }

    /// Wait for the reader thread while watching the child
    ///
    /// A child that exits without ever opening the FIFO would leave the
    /// reader blocked in `open`, so the reader is unblocked whenever the
    /// child is gone or the deadline passes.
    fn receive_private_key(
        &self,
        child: &mut ChildGuard,
        reader: ChannelReader,
    ) -> Result<Vec<u8>, GenerationError> {
        loop {
            match reader.rx.recv_timeout(POLL_INTERVAL) {
                Ok(result) => {
                    reader.join();
                    return result.map_err(|e| self.read_failed(e));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    reader.join();
                    return Err(self.read_failed(io::Error::other("reader thread exited")));
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            let exited = match child.get_mut().try_wait() {
                Ok(status) => status.is_some(),
                Err(e) => {
                    child.terminate();
                    discard(reader.finish());
                    return Err(self.read_failed(e));
                }
            };
            if exited {
                debug!("Key generator exited before the channel was drained");
                return reader.finish().map_err(|e| self.read_failed(e));
            }

            if Instant::now() >= self.deadline {
                warn!("Key generator timed out after {:?}", self.timeout);
                child.terminate();
                discard(reader.finish());
                return Err(self.timed_out());
            }
        }
    }

    fn wait_for_exit(&self, child: &mut ChildGuard) -> Result<ExitStatus, GenerationError> {
        loop {
            if let Some(status) = child.get_mut().try_wait().map_err(|e| self.read_failed(e))? {
                child.reaped = true;
                return Ok(status);
            }
            if Instant::now() >= self.deadline {
                child.terminate();
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn confirm_overwrite(child: &mut Child, phase: GenerationPhase) -> Result<(), GenerationError> {
    let Some(mut stdin) = child.stdin.take() else {
        return Err(GenerationError::Confirmation {
            phase,
            source: io::Error::other("stdin not captured"),
        });
    };

    let written = stdin.write_all(CONFIRMATION).and_then(|()| stdin.flush());
    match written {
        Ok(()) => Ok(()),
        // The child stopped reading; its exit status tells the rest
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Key generator closed stdin before confirmation");
            Ok(())
        }
        Err(source) => Err(GenerationError::Confirmation { phase, source }),
    }
    // stdin dropped here so the child sees EOF after the confirmation
}

/// Wipe whatever a reader collected before giving up on it
fn discard(read: ReadResult) {
    if let Ok(mut bytes) = read {
        bytes.zeroize();
    }
}

fn into_private_key(bytes: Vec<u8>) -> Result<PrivateKey, GenerationError> {
    let text = String::from_utf8(bytes).map_err(|e| {
        e.into_bytes().zeroize();
        GenerationError::InvalidUtf8 { which: "private" }
    })?;
    if text.is_empty() {
        return Err(GenerationError::EmptyPrivateKey);
    }
    Ok(PrivateKey::new(text))
}

/// Read, delete, then validate the sibling public key file
fn take_public_key(path: &Path) -> Result<PublicKey, GenerationError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(GenerationError::PublicKeyMissing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(GenerationError::PublicKeyRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    std::fs::remove_file(path).map_err(|source| GenerationError::ArtifactCleanup {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Removed public key artifact {:?}", path);

    let text =
        String::from_utf8(bytes).map_err(|_| GenerationError::InvalidUtf8 { which: "public" })?;
    let public_key = PublicKey::new(&text);
    if public_key.is_empty() {
        return Err(GenerationError::EmptyPublicKey {
            path: path.to_path_buf(),
        });
    }
    Ok(public_key)
}

/// Background read of the FIFO to EOF
struct ChannelReader {
    path: PathBuf,
    rx: Receiver<ReadResult>,
    handle: JoinHandle<()>,
}

impl ChannelReader {
    fn start(path: &Path) -> Self {
        let (tx, rx) = mpsc::channel();
        let fifo = path.to_path_buf();
        let handle = thread::spawn(move || {
            let result = read_to_end(&fifo);
            // The receiver may have given up already
            let _ = tx.send(result);
        });
        Self {
            path: path.to_path_buf(),
            rx,
            handle,
        }
    }

    /// Unblock the reader and collect what it got
    ///
    /// The write end only opens while the reader sits in `open`, so it is
    /// retried until the reader reports back.
    fn finish(self) -> ReadResult {
        let give_up = Instant::now() + READER_GRACE;
        loop {
            unblock_reader(&self.path);
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(result) => {
                    self.join();
                    return result;
                }
                Err(RecvTimeoutError::Timeout) if Instant::now() < give_up => {}
                Err(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "channel reader did not finish",
                    ))
                }
            }
        }
    }

    fn join(self) {
        if self.handle.join().is_err() {
            warn!("Channel reader thread panicked");
        }
    }
}

fn read_to_end(path: &Path) -> ReadResult {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Open and immediately close the write end so a reader blocked in `open`
/// (or waiting for a writer that died) sees EOF
#[cfg(unix)]
fn unblock_reader(path: &Path) {
    use std::os::unix::fs::OpenOptionsExt;

    let _ = std::fs::OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path);
}

#[cfg(not(unix))]
fn unblock_reader(_path: &Path) {}

/// Kills and reaps the child unless it already exited
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn get_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    fn terminate(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            debug!("Failed to kill key generator: {}", e);
        }
        if let Err(e) = self.child.wait() {
            warn!("Failed to reap key generator: {}", e);
        }
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}
