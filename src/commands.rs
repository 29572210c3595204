//! Command verbs of the AT dialect and typed builders for the parameterized
//! ones. Builders produce the unframed verb; the `AT[+…]\r\n` framing is
//! applied by the transport when the command is sent.

use crate::error::Error;
use crate::responses::{UdpPeerMode, WifiMode};
use core::fmt::Write;
use heapless::String;

/// Longest verb the driver ever assembles (`CWJAP` with a 32-char SSID and
/// a 63-char password).
pub(crate) const COMMAND_SIZE: usize = 128;

pub(crate) type CommandBuffer = String<COMMAND_SIZE>;

/// Line terminator of the control channel
pub(crate) const LINE_END: &[u8] = b"\r\n";

/// Queries the firmware release
pub(crate) const FIRMWARE_VERSION: &str = "GMR";

/// Lists access points within range
pub(crate) const LIST_ACCESS_POINTS: &str = "CWLAP";

/// Queries the current WIFI mode
pub(crate) const QUERY_WIFI_MODE: &str = "CWMODE?";

/// Restarts the module
pub(crate) const RESTART: &str = "RST";

/// Queries the local IP address
pub(crate) const LOCAL_IP: &str = "CIFSR";

/// Closes the current client connection
pub(crate) const CLOSE_CONNECTION: &str = "CIPCLOSE";

/// Disables command echo. Sent raw, the firmware rejects the `AT+` framing
/// on echo control.
pub(crate) const DISABLE_ECHO: &[u8] = b"ATE0\r\n";

/// Enables command echo. Sent raw like [DISABLE_ECHO].
pub(crate) const ENABLE_ECHO: &[u8] = b"ATE1\r\n";

/// `CWMODE=<mode>`, switches the WIFI mode
pub(crate) struct SetWifiModeCommand {
    mode: WifiMode,
}

impl SetWifiModeCommand {
    pub fn new(mode: WifiMode) -> Self {
        Self { mode }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(verb, "CWMODE={}", self.mode.code()).map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}

/// `CWJAP="<ssid>","<password>"`, joins an access point
pub(crate) struct JoinCommand<'a> {
    ssid: &'a str,
    password: &'a str,
}

impl<'a> JoinCommand<'a> {
    pub fn new(ssid: &'a str, password: &'a str) -> Self {
        Self { ssid, password }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(verb, "CWJAP=\"{}\",\"{}\"", self.ssid, self.password).map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}

/// `CIPMUX=<0|1>`, toggles support for multiple simultaneous connections
pub(crate) struct MuxModeCommand {
    enabled: bool,
}

impl MuxModeCommand {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(verb, "CIPMUX={}", u8::from(self.enabled)).map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}

/// `CIPSERVER=1[,<port>]`, starts the TCP server. Port 0 leaves the port
/// argument off, the firmware then listens on its default.
pub(crate) struct TcpServerCommand {
    port: u16,
}

impl TcpServerCommand {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        if self.port > 0 {
            write!(verb, "CIPSERVER=1,{}", self.port).map_err(|_| Error::Overflow)?;
        } else {
            write!(verb, "CIPSERVER=1").map_err(|_| Error::Overflow)?;
        }
        Ok(verb)
    }
}

/// `CIPSTART="TCP","<host>",<port>`, opens a TCP client transport
pub(crate) struct TcpConnectCommand<'a> {
    host: &'a str,
    port: u16,
}

impl<'a> TcpConnectCommand<'a> {
    pub fn new(host: &'a str, port: u16) -> Self {
        Self { host, port }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(verb, "CIPSTART=\"TCP\",\"{}\",{}", self.host, self.port).map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}

/// `CIPSTART="UDP","<host>",<remote>,<local>,<peer mode>`, opens a UDP
/// transport
pub(crate) struct UdpConnectCommand<'a> {
    host: &'a str,
    remote_port: u16,
    local_port: u16,
    peer_mode: UdpPeerMode,
}

impl<'a> UdpConnectCommand<'a> {
    pub fn new(host: &'a str, remote_port: u16, local_port: u16, peer_mode: UdpPeerMode) -> Self {
        Self {
            host,
            remote_port,
            local_port,
            peer_mode,
        }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(
            verb,
            "CIPSTART=\"UDP\",\"{}\",{},{},{}",
            self.host,
            self.remote_port,
            self.local_port,
            self.peer_mode.code()
        )
        .map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}

/// `CIPSEND=<length>`, announces a payload transmission
pub(crate) struct TransmissionCommand {
    length: usize,
}

impl TransmissionCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn verb(&self) -> Result<CommandBuffer, Error> {
        let mut verb = CommandBuffer::new();
        write!(verb, "CIPSEND={}", self.length).map_err(|_| Error::Overflow)?;
        Ok(verb)
    }
}
