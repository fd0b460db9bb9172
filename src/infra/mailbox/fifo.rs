//! Named-pipe mailbox: writes each response into the requester's FIFO.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::fcntl::OFlag;

use crate::infra::mailbox::{DeliveryError, Mailbox};
use crate::protocol::Response;

const OPEN_RETRY_BASE: Duration = Duration::from_millis(1);
const OPEN_RETRY_MAX: Duration = Duration::from_millis(50);

/// Pause before open attempt `attempt + 1`: 1 ms doubling up to 50 ms.
fn open_backoff(attempt: u32) -> Duration {
    OPEN_RETRY_BASE
        .saturating_mul(2u32.saturating_pow(attempt.min(6)))
        .min(OPEN_RETRY_MAX)
}

/// Mailbox writing to requester-owned named pipes.
///
/// The channel id is the FIFO path. The mailbox never creates or truncates
/// anything: a missing path or a regular file is refused. Opening is
/// non-blocking; while the requester has not opened its end the open is
/// retried with exponential backoff (1 ms doubling, capped at 50 ms and at
/// the time left). After `open_timeout` the delivery is abandoned.
#[derive(Debug, Clone)]
pub struct FifoMailbox {
    open_timeout: Duration,
}

impl FifoMailbox {
    /// Create a mailbox that waits at most `open_timeout` for a reader.
    pub const fn new(open_timeout: Duration) -> Self {
        Self { open_timeout }
    }

    fn open_writer(&self, channel: &str) -> Result<File, DeliveryError> {
        let meta = fs::metadata(channel).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DeliveryError::NoListener(channel.to_owned()),
            _ => DeliveryError::Io {
                channel: channel.to_owned(),
                source: e,
            },
        })?;
        if !meta.file_type().is_fifo() {
            return Err(DeliveryError::NotAChannel(channel.to_owned()));
        }

        let deadline = Instant::now() + self.open_timeout;
        let mut attempt = 0;
        loop {
            match OpenOptions::new()
                .write(true)
                .custom_flags(OFlag::O_NONBLOCK.bits())
                .open(channel)
            {
                Ok(file) => return Ok(file),
                // ENXIO: the FIFO has no reader yet
                Err(e) if e.raw_os_error() == Some(Errno::ENXIO as i32) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return Err(DeliveryError::NoListener(channel.to_owned()));
                    }
                    thread::sleep(open_backoff(attempt).min(left));
                    attempt += 1;
                }
                Err(e) => {
                    return Err(DeliveryError::Io {
                        channel: channel.to_owned(),
                        source: e,
                    })
                }
            }
        }
    }
}

impl Mailbox for FifoMailbox {
    fn deliver(&mut self, channel_id: &str, response: &Response) -> Result<(), DeliveryError> {
        let mut file = self.open_writer(channel_id)?;
        file.write_all(response.to_line().as_bytes())
            .map_err(|source| DeliveryError::Io {
                channel: channel_id.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_backoff_doubles_then_caps() {
        let delays: Vec<_> = (0..8).map(open_backoff).collect();
        assert_eq!(delays[0], Duration::from_millis(1));
        assert_eq!(delays[1], Duration::from_millis(2));
        assert_eq!(delays[5], Duration::from_millis(32));
        assert_eq!(delays[6], OPEN_RETRY_MAX);
        assert_eq!(open_backoff(u32::MAX), OPEN_RETRY_MAX);
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }
}
