//! Reply vocabulary of the AT-command dialect: terminal tokens, wire-code
//! enums and the access-point record parser.

use crate::error::Error;
use heapless::String;

/// Success terminator of most commands
pub(crate) const RESPONSE_OK: &str = "OK\r\n";

/// Generic failure terminator
pub(crate) const RESPONSE_ERROR: &str = "ERROR\r\n";

/// Failure terminator of `CWJAP`
pub(crate) const RESPONSE_FAIL: &str = "FAIL\r\n";

/// Unsolicited banner once `RST` completed
pub(crate) const RESPONSE_READY: &str = "ready\r\n";

/// Short-circuit success reply of `CWMODE=`
pub(crate) const RESPONSE_NO_CHANGE: &str = "no change";

/// Success terminator as a bare line, as seen by the scan loop
pub(crate) const RESPONSE_OK_TRIMMED: &str = "OK";

/// Failure terminator as a bare line, as seen by the scan loop
pub(crate) const RESPONSE_ERROR_TRIMMED: &str = "ERROR";

/// Reply preamble of `CWMODE?`
pub(crate) const WIFI_MODE_PREFIX: &str = "+CWMODE:";

/// Leader of one access-point record following `CWLAP`
pub(crate) const ACCESS_POINT_PREFIX: &str = "+CWLAP:(";

/// Leader of an inbound data frame from a remote peer
pub(crate) const INBOUND_DATA_PREFIX: &str = "+IPD,";

/// Max. SSID length defined by 802.11
pub const SSID_LENGTH: usize = 32;

/// Length of a colon-separated MAC address as reported by the module
pub const MAC_LENGTH: usize = 17;

/// WIFI mode of the module
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiMode {
    /// Client of an access point
    Station,
    /// The module spans its own network
    AccessPoint,
    /// Station and access point at the same time
    Both,
}

impl WifiMode {
    /// Single-digit code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            WifiMode::Station => "1",
            WifiMode::AccessPoint => "2",
            WifiMode::Both => "3",
        }
    }

    /// Decodes the wire representation
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code {
            "1" => Ok(WifiMode::Station),
            "2" => Ok(WifiMode::AccessPoint),
            "3" => Ok(WifiMode::Both),
            _ => Err(Error::Protocol("Unexpected Wifi mode code.")),
        }
    }
}

/// Peer addressing mode of a UDP transport
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UdpPeerMode {
    /// Destination is fixed to the defined remote
    UseDefinedRemote,
    /// Remote may change once
    ChangeRemoteOnce,
    /// Remote is established per peer
    EstablishPeer,
}

impl UdpPeerMode {
    /// Single-digit code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            UdpPeerMode::UseDefinedRemote => "0",
            UdpPeerMode::ChangeRemoteOnce => "1",
            UdpPeerMode::EstablishPeer => "2",
        }
    }

    /// Decodes the wire representation
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code {
            "0" => Ok(UdpPeerMode::UseDefinedRemote),
            "1" => Ok(UdpPeerMode::ChangeRemoteOnce),
            "2" => Ok(UdpPeerMode::EstablishPeer),
            _ => Err(Error::Protocol("Unexpected UDP peer mode code.")),
        }
    }
}

/// Encryption scheme announced by a scanned access point
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Encryption {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
}

impl Encryption {
    /// Single-digit code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Encryption::Open => "0",
            Encryption::Wep => "1",
            Encryption::WpaPsk => "2",
            Encryption::Wpa2Psk => "3",
            Encryption::WpaWpa2Psk => "4",
        }
    }

    /// Decodes the wire representation
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code {
            "0" => Ok(Encryption::Open),
            "1" => Ok(Encryption::Wep),
            "2" => Ok(Encryption::WpaPsk),
            "3" => Ok(Encryption::Wpa2Psk),
            "4" => Ok(Encryption::WpaWpa2Psk),
            _ => Err(Error::Protocol("Unexpected encryption code.")),
        }
    }
}

/// One access point within range of the module, as reported by `CWLAP`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccessPoint {
    pub encryption: Encryption,
    pub ssid: String<SSID_LENGTH>,
    /// Signal strength in dBm
    pub rssi: i16,
    /// Colon-separated hex, as reported
    pub mac: String<MAC_LENGTH>,
    pub channel: u8,
}

impl AccessPoint {
    /// Parses one `+CWLAP:(enc,"ssid",rssi,"mac",ch)` record.
    pub(crate) fn parse(line: &str) -> Result<Self, Error> {
        let record = line
            .strip_prefix(ACCESS_POINT_PREFIX)
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(Error::Protocol("Invalid access point record."))?;

        let mut fields = record.split(',');
        let encryption = Encryption::from_code(next_field(&mut fields)?)?;
        let ssid = strip_quotes(next_field(&mut fields)?);
        let rssi = next_field(&mut fields)?
            .parse()
            .map_err(|_| Error::Protocol("Invalid access point record."))?;
        let mac = strip_quotes(next_field(&mut fields)?);
        let channel = next_field(&mut fields)?
            .parse()
            .map_err(|_| Error::Protocol("Invalid access point record."))?;

        Ok(Self {
            encryption,
            ssid: String::try_from(ssid).map_err(|_| Error::Overflow)?,
            rssi,
            mac: String::try_from(mac).map_err(|_| Error::Overflow)?,
            channel,
        })
    }
}

fn next_field<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Result<&'a str, Error> {
    fields.next().ok_or(Error::Protocol("Invalid access point record."))
}

/// Strips one pair of delimiting double quotes; anything else is kept
/// verbatim. No unescaping takes place.
fn strip_quotes(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'))
        .unwrap_or(field)
}
