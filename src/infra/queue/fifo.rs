//! Named-pipe listener feeding the inbound queue.
//!
//! A dedicated reader thread opens the FIFO, which blocks until a requester
//! opens it for writing, then forwards every line as one frame. When the
//! last writer closes, the thread reopens the FIFO and waits for the next
//! writer instead of polling.
//!
//! Each read is capped at [`MAX_FRAME_LEN`] plus one byte. A longer line is
//! discarded up to its newline and forwarded as a rejected frame, as is a
//! line that is not UTF-8; neither is ever repaired into a valid frame.
//!
//! Shutdown is best-effort: the reader is woken if it is waiting for a
//! writer, but a reader blocked on a writer that keeps the pipe open stays
//! blocked until that writer closes or the process exits.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use tracing::{debug, error, info, warn};

use crate::core::error::ControllerError;
use crate::infra::queue::memory::InboundFrame;
use crate::protocol::{ProtocolError, MAX_FRAME_LEN};

const READ_LIMIT: u64 = MAX_FRAME_LEN as u64 + 1;

/// Owner of the inbound named pipe.
pub struct FifoListener {
    path: PathBuf,
    created: bool,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl FifoListener {
    /// Create the FIFO at `path`, or reuse an existing FIFO there.
    ///
    /// # Errors
    ///
    /// `ChannelSetup` if the FIFO cannot be created or `path` exists but is
    /// not a FIFO.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self, ControllerError> {
        let path = path.as_ref().to_path_buf();
        let setup_error = |source: io::Error| ControllerError::ChannelSetup {
            path: path.clone(),
            source,
        };

        let created = match mkfifo(&path, Mode::from_bits_truncate(0o666)) {
            Ok(()) => true,
            Err(Errno::EEXIST) => {
                let meta = fs::metadata(&path).map_err(setup_error)?;
                if !meta.file_type().is_fifo() {
                    return Err(setup_error(io::Error::new(
                        ErrorKind::AlreadyExists,
                        "path exists and is not a FIFO",
                    )));
                }
                false
            }
            Err(errno) => return Err(setup_error(io::Error::from(errno))),
        };

        info!(path = %path.display(), created, "inbound channel ready");
        Ok(Self {
            path,
            created,
            stop: Arc::new(AtomicBool::new(false)),
            reader: None,
        })
    }

    /// Path of the FIFO.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start the reader thread, sending every line to `frames`.
    ///
    /// # Errors
    ///
    /// `ThreadSpawn` if the reader thread cannot be started.
    pub fn start(&mut self, frames: Sender<InboundFrame>) -> Result<(), ControllerError> {
        let path = self.path.clone();
        let stop = Arc::clone(&self.stop);
        let handle = thread::Builder::new()
            .name("fifo-reader".into())
            .spawn(move || read_frames(&path, &stop, &frames))
            .map_err(|source| ControllerError::ThreadSpawn {
                name: "fifo-reader",
                source,
            })?;
        self.reader = Some(handle);
        Ok(())
    }

    /// Stop reading and remove the FIFO if this listener created it.
    pub fn shutdown(self) {
        drop(self);
    }

    fn wake_reader(&self) {
        // a non-blocking write-open completes a reader blocked in open();
        // ENXIO just means nobody is waiting
        let _ = OpenOptions::new()
            .write(true)
            .custom_flags(OFlag::O_NONBLOCK.bits())
            .open(&self.path);
    }
}

impl Drop for FifoListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if self.reader.take().is_some() {
            self.wake_reader();
        }
        if self.created {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove inbound channel");
            }
        }
        debug!(path = %self.path.display(), "inbound channel closed");
    }
}

fn read_frames(path: &Path, stop: &AtomicBool, frames: &Sender<InboundFrame>) {
    let mut buf = Vec::new();
    while !stop.load(Ordering::Acquire) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot open inbound channel");
                return;
            }
        };
        if stop.load(Ordering::Acquire) {
            return;
        }

        let mut reader = BufReader::new(file);
        loop {
            match next_frame(&mut reader, &mut buf) {
                Ok(None) => break,
                Ok(Some(InboundFrame::Line(line))) if line.is_empty() => {}
                Ok(Some(frame)) => {
                    if frames.send(frame).is_err() {
                        debug!("inbound queue closed; reader exiting");
                        return;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!(error = %e, "read from inbound channel failed");
                    break;
                }
            }
        }
        debug!("all writers closed; waiting for the next one");
    }
}

/// Read one line of at most [`READ_LIMIT`] bytes. `None` at end of stream.
fn next_frame<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<InboundFrame>> {
    buf.clear();
    let read = reader.by_ref().take(READ_LIMIT).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') && read as u64 == READ_LIMIT {
        let skipped = reader.skip_until(b'\n')?;
        return Ok(Some(InboundFrame::Rejected(ProtocolError::Oversized {
            len: read + skipped,
            max: MAX_FRAME_LEN,
        })));
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(match std::str::from_utf8(buf) {
        Ok(line) => InboundFrame::Line(line.to_owned()),
        Err(e) => InboundFrame::Rejected(ProtocolError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        }),
    }))
}
