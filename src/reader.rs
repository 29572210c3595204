//! Timed reader primitives and the outbound command transport.
//!
//! All readers poll the source whenever a byte is buffered and give up once
//! the given deadline has passed, so every operation returns within its
//! wall-clock budget regardless of how the module behaves. There is no
//! byte-level synchronization beyond CRLF and the inline reply markers, the
//! deadline is the only defense against a stalled or babbling module.

use crate::commands::LINE_END;
use crate::error::Error;
use crate::wifi::Adapter;
use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};
use fugit::TimerInstantU32;
use fugit_timer::Timer;
use heapless::{String, Vec};

/// Point in time after which a pending read fails with [Error::Timeout]
pub(crate) type Deadline<const TIMER_HZ: u32> = TimerInstantU32<TIMER_HZ>;

impl<R: Read + ReadReady, W: Write, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<R, W, T, TIMER_HZ> {
    /// Deadline of one primitive read, measured from now.
    pub(crate) fn short_deadline(&mut self) -> Deadline<TIMER_HZ> {
        let timeout = self.command_timeout;
        self.timer.now() + timeout
    }

    /// Deadline for scans, restarts and joins, measured from now.
    pub(crate) fn long_deadline(&mut self) -> Deadline<TIMER_HZ> {
        let timeout = self.long_timeout;
        self.timer.now() + timeout
    }

    pub(crate) fn deadline_ms(&mut self, timeout_ms: u32) -> Deadline<TIMER_HZ> {
        self.timer.now() + fugit::TimerDurationU32::<TIMER_HZ>::millis(timeout_ms)
    }

    /// True if at least one byte can be read without blocking.
    pub(crate) fn available(&mut self) -> Result<bool, Error> {
        self.source.read_ready().map_err(|error| Error::Io(error.kind()))
    }

    /// Reads a single byte. End-of-stream counts as an I/O fault, a
    /// mid-response hangup is indistinguishable from one for the caller.
    pub(crate) fn read_byte(&mut self) -> Result<u8, Error> {
        let mut byte = [0u8; 1];
        match self.source.read(&mut byte) {
            Ok(0) => Err(Error::Io(ErrorKind::BrokenPipe)),
            Ok(_) => Ok(byte[0]),
            Err(error) => Err(Error::Io(error.kind())),
        }
    }

    /// Discards bytes until `terminator` is read.
    #[allow(dead_code)]
    pub(crate) fn read_until(&mut self, terminator: u8, deadline: Deadline<TIMER_HZ>) -> Result<(), Error> {
        while self.timer.now() < deadline {
            if !self.available()? {
                continue;
            }

            if self.read_byte()? == terminator {
                return Ok(());
            }
        }

        Err(Error::Timeout)
    }

    /// Reads bytes until `terminator` is encountered (retained in the
    /// buffer) or `N` bytes have been buffered, whichever comes first.
    pub(crate) fn read_into<const N: usize>(
        &mut self,
        terminator: u8,
        deadline: Deadline<TIMER_HZ>,
    ) -> Result<Vec<u8, N>, Error> {
        let mut buffer = Vec::new();

        while self.timer.now() < deadline {
            if !self.available()? {
                continue;
            }

            let byte = self.read_byte()?;
            // The length check below returns before the buffer can overfill
            let _ = buffer.push(byte);

            if byte == terminator || buffer.len() >= N {
                return Ok(buffer);
            }
        }

        Err(Error::Timeout)
    }

    /// Reads one line of at most `N` bytes and strips the trailing CRLF.
    ///
    /// The last two bytes are stripped unconditionally; callers only invoke
    /// this when the module is known to emit CRLF-terminated lines.
    pub(crate) fn read_line<const N: usize>(&mut self, deadline: Deadline<TIMER_HZ>) -> Result<String<N>, Error> {
        let raw: Vec<u8, N> = self.read_into(b'\n', deadline)?;
        let truncated = raw.len().saturating_sub(2);
        let line = core::str::from_utf8(&raw[..truncated]).map_err(|_| Error::Protocol("Response line is not ASCII."))?;
        String::try_from(line).map_err(|_| Error::Overflow)
    }

    /// Streaming substring search for `pattern` in the inbound bytes.
    ///
    /// The match cursor resets to zero on a mismatch without retesting the
    /// mismatched byte against the pattern start. This can miss overlapping
    /// matches and is kept for bit-exact compatibility with the module's
    /// established token streams.
    pub(crate) fn expect_token(&mut self, pattern: &str, deadline: Deadline<TIMER_HZ>) -> Result<(), Error> {
        let pattern = pattern.as_bytes();
        let mut matched = 0;

        while self.timer.now() < deadline {
            if !self.available()? {
                continue;
            }

            if self.read_byte()? == pattern[matched] {
                matched += 1;
                if matched == pattern.len() {
                    return Ok(());
                }
            } else {
                matched = 0;
            }
        }

        Err(Error::Timeout)
    }

    /// Runs two token matchers in parallel until one of them completes.
    /// A completed `pass` returns success, a completed `fail` raises
    /// [Error::ResponseFailed]. If both complete on the same byte, `pass`
    /// wins.
    pub(crate) fn expect_either(
        &mut self,
        pass: &str,
        fail: &str,
        deadline: Deadline<TIMER_HZ>,
    ) -> Result<(), Error> {
        let pass = pass.as_bytes();
        let fail = fail.as_bytes();
        let mut pass_matched = 0;
        let mut fail_matched = 0;

        while self.timer.now() < deadline {
            if !self.available()? {
                continue;
            }

            let byte = self.read_byte()?;

            if byte == pass[pass_matched] {
                pass_matched += 1;
                if pass_matched == pass.len() {
                    return Ok(());
                }
            } else {
                pass_matched = 0;
            }

            if byte == fail[fail_matched] {
                fail_matched += 1;
                if fail_matched == fail.len() {
                    return Err(Error::ResponseFailed("Command rejected by module."));
                }
            } else {
                fail_matched = 0;
            }
        }

        Err(Error::Timeout)
    }

    /// Frames and sends one command: `AT` alone for the empty verb,
    /// `AT+<verb>` otherwise, each terminated by CRLF and flushed.
    pub(crate) fn send_command(&mut self, verb: &str) -> Result<(), Error> {
        if verb.is_empty() {
            self.write_bytes(b"AT")?;
        } else {
            self.write_bytes(b"AT+")?;
            self.write_bytes(verb.as_bytes())?;
        }
        self.write_bytes(LINE_END)?;
        self.flush()
    }

    /// Sends bytes verbatim with no framing, then flushes.
    pub(crate) fn send_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_bytes(bytes)?;
        self.flush()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.sink.write_all(bytes).map_err(|error| Error::Io(error.kind()))
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.sink.flush().map_err(|error| Error::Io(error.kind()))
    }
}
