//! # WIFI control plane
//!
//! Central [Adapter] owning the byte stream, plus the operations steering
//! the radio: readiness probe, echo control, firmware version, WIFI mode,
//! restart, access-point scan, joining an access point and reading the
//! local IP.
//!
//! The driver keeps no state of its own besides the stream position and the
//! timeout knobs; every query re-interrogates the module.
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
//! // Module identity
//! assert_eq!("0018000902-AI03", adapter.firmware_version().unwrap().as_str());
//!
//! // Scanning for access points in range
//! let access_points = adapter.get_access_points().unwrap();
//! assert_eq!(2, access_points.len());
//! ````
use crate::commands::{self, JoinCommand, SetWifiModeCommand};
use crate::error::Error;
use crate::responses::{
    AccessPoint, WifiMode, RESPONSE_ERROR, RESPONSE_ERROR_TRIMMED, RESPONSE_FAIL, RESPONSE_NO_CHANGE, RESPONSE_OK,
    RESPONSE_OK_TRIMMED, RESPONSE_READY, WIFI_MODE_PREFIX,
};
use embedded_io::{Read, ReadReady, Write};
use fugit::{ExtU32, TimerDurationU32};
use fugit_timer::Timer;
use heapless::{FnvIndexSet, String, Vec};

/// Default budget of quick query-response commands in milliseconds
pub const DEFAULT_TIMEOUT_MS: u32 = 200;

/// Default budget of scans, restarts and joins in milliseconds
pub const LONG_TIMEOUT_MS: u32 = 4_000;

/// Capacity of the scan result set
pub const MAX_ACCESS_POINTS: usize = 16;

/// Line cap of the `GMR` version reply
pub const VERSION_LINE_LIMIT: usize = 30;

/// Line cap of `CWMODE=` and `CIFSR` replies
pub const MODE_LINE_LIMIT: usize = 20;

/// Line cap of one `CWLAP` record
pub const ACCESS_POINT_LINE_LIMIT: usize = 100;

/// Driver for the ESP8266 AT-command firmware, sole owner of the byte
/// stream towards the module.
///
/// `R` is the inbound byte source, `W` the outbound sink, `T` the timer
/// used for deadline measurement at `TIMER_HZ` ticks per second. The
/// control channel is US-ASCII throughout; `+IPD` payload bytes are passed
/// through opaquely.
///
/// The adapter is single-owner and carries no interior synchronization.
/// Callers needing concurrency must serialize access externally. Dropping
/// the adapter does not close the caller's stream.
pub struct Adapter<R: Read + ReadReady, W: Write, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> {
    pub(crate) source: R,
    pub(crate) sink: W,

    /// Timer used for timeout measurement
    pub(crate) timer: T,

    /// Budget of quick query-response commands
    pub(crate) command_timeout: TimerDurationU32<TIMER_HZ>,

    /// Budget of scans, restarts and joins
    pub(crate) long_timeout: TimerDurationU32<TIMER_HZ>,
}

impl<R: Read + ReadReady, W: Write, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<R, W, T, TIMER_HZ> {
    /// Wraps an already-open stream pair and probes the module. If the
    /// device replies to the probe, command echo is disabled; subsequent
    /// response parsing relies on echo staying off. A silent device is
    /// tolerated (it may simply not be powered yet), but a fault while
    /// disabling echo after a positive probe is surfaced.
    pub fn new(source: R, sink: W, timer: T) -> Result<Self, Error> {
        let mut adapter = Self {
            source,
            sink,
            timer,
            command_timeout: DEFAULT_TIMEOUT_MS.millis(),
            long_timeout: LONG_TIMEOUT_MS.millis(),
        };

        if adapter.is_ready() {
            adapter.disable_echo()?;
        }

        Ok(adapter)
    }

    /// Sends a bare `AT` and reports whether the module predictably replies
    /// `OK`. Every failure mode, including a timeout on a dirty stream,
    /// maps to `false`.
    pub fn is_ready(&mut self) -> bool {
        self.probe().is_ok()
    }

    fn probe(&mut self) -> Result<(), Error> {
        self.send_command("")?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Stops the module from echoing command lines. Echo would interleave
    /// the echoed command text into every reply stream and corrupt parsing.
    pub fn disable_echo(&mut self) -> Result<(), Error> {
        self.send_raw(commands::DISABLE_ECHO)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Re-enables command echo. Issue [disable_echo](Self::disable_echo)
    /// before sending further commands, the reply parsers assume echo off.
    pub fn enable_echo(&mut self) -> Result<(), Error> {
        self.send_raw(commands::ENABLE_ECHO)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)
    }

    /// Firmware release as reported by `GMR`, e.g. `0018000902-AI03`.
    pub fn firmware_version(&mut self) -> Result<String<VERSION_LINE_LIMIT>, Error> {
        self.send_command(commands::FIRMWARE_VERSION)?;
        let deadline = self.short_deadline();
        let version = self.read_line::<VERSION_LINE_LIMIT>(deadline)?;
        let deadline = self.short_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_ERROR, deadline)?;
        Ok(version)
    }

    /// Current WIFI mode of the module.
    pub fn get_wifi_mode(&mut self) -> Result<WifiMode, Error> {
        self.send_command(commands::QUERY_WIFI_MODE)?;
        let deadline = self.short_deadline();
        self.expect_token(WIFI_MODE_PREFIX, deadline)?;
        let deadline = self.short_deadline();
        let code: Vec<u8, 1> = self.read_into(b'\r', deadline)?;
        let deadline = self.short_deadline();
        self.expect_token(RESPONSE_OK, deadline)?;

        let code = core::str::from_utf8(&code).map_err(|_| Error::Protocol("Unexpected Wifi mode code."))?;
        WifiMode::from_code(code)
    }

    /// Switches the WIFI mode. The firmware answers `no change` instead of
    /// an `OK` envelope when the mode is already set; both are success.
    /// A mode change only takes effect after [restart](Self::restart).
    pub fn set_wifi_mode(&mut self, mode: WifiMode) -> Result<(), Error> {
        let verb = SetWifiModeCommand::new(mode).verb()?;
        self.send_command(&verb)?;

        let deadline = self.short_deadline();
        let reply = self.read_line::<MODE_LINE_LIMIT>(deadline)?;
        if reply.as_str() == RESPONSE_NO_CHANGE {
            return Ok(());
        }

        let deadline = self.short_deadline();
        self.expect_token(RESPONSE_OK, deadline)
    }

    /// Restarts the module and waits for its `ready` banner. The module
    /// boots with echo enabled again, so echo is re-disabled immediately;
    /// any echoed bytes emitted in between are skimmed off as noise.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.send_command(commands::RESTART)?;
        let deadline = self.long_deadline();
        self.expect_token(RESPONSE_READY, deadline)?;
        self.disable_echo()
    }

    /// Local IP address as reported by `CIFSR`. The device must be in
    /// access point or station mode; without an assignment this reads
    /// `0.0.0.0`.
    pub fn get_ip(&mut self) -> Result<String<MODE_LINE_LIMIT>, Error> {
        self.send_command(commands::LOCAL_IP)?;
        let deadline = self.short_deadline();
        let ip = self.read_line::<MODE_LINE_LIMIT>(deadline)?;
        let deadline = self.short_deadline();
        self.expect_token(RESPONSE_OK, deadline)?;
        Ok(ip)
    }

    /// Scans for access points within range. Records are deduplicated by
    /// value equality over all five fields. Requires station or dual mode.
    pub fn get_access_points(&mut self) -> Result<FnvIndexSet<AccessPoint, MAX_ACCESS_POINTS>, Error> {
        let mut access_points = FnvIndexSet::new();
        self.send_command(commands::LIST_ACCESS_POINTS)?;

        loop {
            let deadline = self.long_deadline();
            let line = self.read_line::<ACCESS_POINT_LINE_LIMIT>(deadline)?;

            match line.as_str() {
                "" => continue,
                RESPONSE_OK_TRIMMED => return Ok(access_points),
                RESPONSE_ERROR_TRIMMED => {
                    return Err(Error::ResponseFailed("Device not in station or dual mode."))
                }
                record => {
                    access_points
                        .insert(AccessPoint::parse(record)?)
                        .map_err(|_| Error::Overflow)?;
                }
            }
        }
    }

    /// Joins the given access point. The firmware signals a rejected or
    /// failed association with `FAIL` rather than `ERROR`.
    pub fn join_ap(&mut self, ssid: &str, password: &str) -> Result<(), Error> {
        let verb = JoinCommand::new(ssid, password).verb()?;
        self.send_command(&verb)?;
        let deadline = self.long_deadline();
        self.expect_either(RESPONSE_OK, RESPONSE_FAIL, deadline)
    }

    /// Sets the budget of quick query-response commands in ms.
    pub fn set_command_timeout_ms(&mut self, timeout: u32) {
        self.command_timeout = TimerDurationU32::millis(timeout);
    }

    /// Sets the budget of scans, restarts and joins in ms.
    pub fn set_long_timeout_ms(&mut self, timeout: u32) {
        self.long_timeout = TimerDurationU32::millis(timeout);
    }
}
