//! Error type shared by all driver operations.

use embedded_io::ErrorKind;

/// Failure modes of a driver operation.
///
/// A failed operation leaves the stream in an indeterminate position; the
/// module may still be emitting bytes of the abandoned response. Recovery is
/// the caller's decision, typically by probing with
/// [is_ready](crate::wifi::Adapter::is_ready) or resetting the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Fault of the underlying stream, including end-of-stream mid-response
    Io(ErrorKind),

    /// Deadline elapsed before the expected token or terminator was observed
    Timeout,

    /// Module replied with an explicit failure terminator (`ERROR`, `FAIL`)
    ResponseFailed(&'static str),

    /// A response was syntactically malformed
    Protocol(&'static str),

    /// A command or response exceeded its bounded buffer
    Overflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Io(kind) => defmt::write!(f, "Error::Io({})", kind),
            Error::Timeout => defmt::write!(f, "Error::Timeout"),
            Error::ResponseFailed(message) => defmt::write!(f, "Error::ResponseFailed({})", message),
            Error::Protocol(message) => defmt::write!(f, "Error::Protocol({})", message),
            Error::Overflow => defmt::write!(f, "Error::Overflow"),
        }
    }
}
