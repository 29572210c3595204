//! # ESP8266 AT-command driver
//!
//! Driver for the ESP8266 WIFI module running the AI-Thinker revision 018
//! AT-command firmware (`AT version 0018`, `esp_iot_sdk 0902-AI03`),
//! speaking over generic [embedded-io](embedded_io) byte streams.
//!
//! The module is driven over a plain full-duplex byte stream, typically a
//! serial port at 9600 baud. Commands are framed as `AT[+<verb>]\r\n`;
//! replies are recognized by streaming token matchers bounded by wall-clock
//! deadlines, so a silent or chatty module can never deadlock an operation.
//!
//! Currently this crate offers the following features
//! * Readiness probe and echo control, s. [wifi module](crate::wifi)
//! * WIFI mode control, restart, access-point scan, joining an AP
//! * TCP/UDP transports and `+IPD`-framed payload exchange, s. [stack module](crate::stack)
//!
//! ## Setup
//! The driver owns the two halves of an already-open stream
//! ([Read](embedded_io::Read) + [ReadReady](embedded_io::ReadReady) source,
//! [Write](embedded_io::Write) sink) and a [Timer](fugit_timer::Timer) for
//! timeout measurement. Opening the port and configuring bit rate, flow
//! control and line discipline is the caller's responsibility.
//!
//! ## Example
//!
//! ````
//! use esp8266_at::example::{ExampleSerial, ExampleTimer};
//! use esp8266_at::responses::WifiMode;
//! use esp8266_at::wifi::Adapter;
//!
//! let state = ExampleSerial::state();
//! let serial = ExampleSerial::init(&state);
//!
//! // Construction probes the module and disables command echo
//! let mut adapter: Adapter<_, _, _, 1_000_000> =
//!     Adapter::new(serial, serial, ExampleTimer::default()).unwrap();
//!
//! // Joining a WIFI access point
//! adapter.set_wifi_mode(WifiMode::Station).unwrap();
//! adapter.join_ap("test_wifi", "secret").unwrap();
//!
//! assert_eq!("192.168.4.1", adapter.get_ip().unwrap().as_str());
//! ````
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

#[cfg(test)]
extern crate alloc;

pub(crate) mod commands;
pub mod error;
pub mod example;
pub(crate) mod reader;
pub mod responses;
pub mod stack;
pub mod wifi;

#[cfg(test)]
mod tests;
