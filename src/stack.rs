//! # TCP/UDP transport plane
//!
//! Operations opening and closing transports on the module and exchanging
//! payload data. Outbound payloads are announced with `CIPSEND` and
//! streamed verbatim; inbound data arrives as `+IPD,<n>:` frames with an
//! inline ASCII length prefix.
//!
//! ## Example
//!
//! ````
//! # use esp8266_at::example::{ExampleSerial, ExampleTimer};
//! # use esp8266_at::wifi::Adapter;
//! #
//! let state = ExampleSerial::state();
//! let serial = ExampleSerial::init(&state);
//! let mut adapter: Adapter<_, _, _, 1_000_000> =
//!     Adapter::new(serial, serial, ExampleTimer::default()).unwrap();
//!
//! adapter.start_tcp_client("10.0.0.1", 80).unwrap();
//! adapter.send(b"hallo!").unwrap();
//!
//! // One +IPD frame from the remote peer; the driver consumes one byte
//! // beyond the announced length, size the buffer accordingly
//! serial.inject(b"+IPD,5:hello!");
//! let mut buffer = [0u8; 6];
//! adapter.receive(&mut buffer, 1_000).unwrap();
//! assert_eq!(b"hello!", &buffer);
//!
//! adapter.close_ip_client().unwrap();
//! ````
use crate::commands::{
    self, MuxModeCommand, TcpConnectCommand, TcpServerCommand, TransmissionCommand, UdpConnectCommand,
};
use crate::error::Error;
use crate::responses::{UdpPeerMode, INBOUND_DATA_PREFIX, RESPONSE_ERROR, RESPONSE_OK};
use crate::wifi::Adapter;
use embedded_io::{Read, ReadReady, Write};
use fugit_timer::Timer;
use heapless::Vec;

/// Fixed budget in milliseconds for a remote peer to start an inbound frame
pub const CLIENT_CONNECT_TIMEOUT_MS: u32 = 10_000;

/// Cap of the ASCII length field of one `+IPD` frame
pub(crate) const DATA_LENGTH_LIMIT: usize = 10;

impl<R: Read + ReadReady, W: Write, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<R, W, T, TIMER_HZ> {
    /// Toggles the multiplex flag permitting up to five simultaneous
    /// connections (ids 0-4). This driver only flips the flag, it keeps no
    /// per-connection state.
    pub fn set_mux_mode(&mut self, enabled: bool) -> Result<(), Error> {
        let verb = MuxModeCommand::new(enabled).verb()?;
        self.send_command(&verb)?;
        let deadline = self.short_deadline();
        self.expect_token(RESPONSE_OK, deadline)
    }

    /// Starts the TCP server. Port 0 lets the firmware listen on its
    /// default port.
    pub fn start_tcp_server(&mut self, port: u16) -> Result<(), Error> {
        let verb = TcpServerCommand::new(port).verb()?;
        self.send_command(&verb)?;
        let deadline = self.short_deadline();
        self.expect_token(RESPONSE_OK, deadline)
    }

    /// Opens a TCP client transport to the given remote.
    pub fn start_tcp_client(&mut self, host: &str, port: u16) -> Result<(), Error> {
        let verb = TcpConnectCommand::new(host, port).verb()?;
        self.send_command(&verb)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Opens a UDP transport with the given remote and local ports.
    pub fn start_udp_client(
        &mut self,
        host: &str,
        remote_port: u16,
        local_port: u16,
        peer_mode: UdpPeerMode,
    ) -> Result<(), Error> {
        let verb = UdpConnectCommand::new(host, remote_port, local_port, peer_mode).verb()?;
        self.send_command(&verb)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Closes the current client connection.
    pub fn close_ip_client(&mut self) -> Result<(), Error> {
        self.send_command(commands::CLOSE_CONNECTION)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Sends a payload over the open transport: announces the length with
    /// `CIPSEND`, streams the bytes verbatim, then waits for the verdict.
    pub fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        let verb = TransmissionCommand::new(data.len()).verb()?;
        self.send_command(&verb)?;
        self.send_raw(data)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Waits for one inbound `+IPD` frame and copies its payload into
    /// `buffer`. `timeout_ms` bounds the payload phase; the wait for the
    /// frame itself is bounded by [CLIENT_CONNECT_TIMEOUT_MS].
    ///
    /// The firmware trails the announced payload with one extra byte and
    /// the driver consumes it along, so size `buffer` to `length + 1` to
    /// capture a frame completely. Once `buffer` is full, surplus bytes are
    /// drained from the stream but discarded, keeping the module's byte
    /// count aligned.
    pub fn receive(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<(), Error> {
        let deadline = self.deadline_ms(CLIENT_CONNECT_TIMEOUT_MS);
        self.expect_token(INBOUND_DATA_PREFIX, deadline)?;

        let deadline = self.short_deadline();
        let field: Vec<u8, DATA_LENGTH_LIMIT> = self.read_into(b':', deadline)?;
        let digits = match field.as_slice() {
            [digits @ .., b':'] => digits,
            digits => digits,
        };
        let length = core::str::from_utf8(digits)
            .ok()
            .and_then(|text| text.parse::<usize>().ok())
            .ok_or(Error::Protocol("Invalid inbound data length."))?;

        let deadline = self.deadline_ms(timeout_ms);
        let mut consumed = 0;

        // Inclusive on purpose, the trailing extra byte belongs to the frame
        while consumed <= length {
            if self.timer.now() >= deadline {
                return Err(Error::Timeout);
            }

            if !self.available()? {
                continue;
            }

            let byte = self.read_byte()?;
            if consumed < buffer.len() {
                buffer[consumed] = byte;
            }
            consumed += 1;
        }

        Ok(())
    }
}
