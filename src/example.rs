//! Mocks for doc examples
use core::cell::RefCell;
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::{Deque, Vec};

/// Replay state shared by both halves of an [ExampleSerial]
pub struct SerialState {
    /// Outbound bytes accumulated until the next flush
    command: Vec<u8, 64>,

    /// Scripted inbound bytes not yet consumed
    replies: Deque<u8, 512>,
}

/// Serial mock statically replying to the commands used in doc examples.
/// One [state](ExampleSerial::state) backs both stream halves:
///
/// ````
/// use esp8266_at::example::ExampleSerial;
///
/// let state = ExampleSerial::state();
/// let serial = ExampleSerial::init(&state);
/// serial.inject(b"+IPD,2:ok!");
/// ````
#[derive(Copy, Clone)]
pub struct ExampleSerial<'a> {
    state: &'a RefCell<SerialState>,
}

impl<'a> ExampleSerial<'a> {
    /// Creates the shared replay state.
    pub fn state() -> RefCell<SerialState> {
        RefCell::new(SerialState {
            command: Vec::new(),
            replies: Deque::new(),
        })
    }

    /// Creates a stream handle on the given state.
    pub fn init(state: &'a RefCell<SerialState>) -> Self {
        Self { state }
    }

    /// Queues raw inbound bytes, e.g. an unsolicited `+IPD` frame.
    pub fn inject(&self, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        for &byte in bytes {
            let _ = state.replies.push_back(byte);
        }
    }
}

impl ErrorType for ExampleSerial<'_> {
    type Error = ErrorKind;
}

impl Read for ExampleSerial<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        match self.state.borrow_mut().replies.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl ReadReady for ExampleSerial<'_> {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.borrow().replies.is_empty())
    }
}

impl Write for ExampleSerial<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.command.extend_from_slice(buf).map_err(|_| ErrorKind::OutOfMemory)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;

        let reply: &[u8] = match state.command.as_slice() {
            b"AT\r\n" => b"OK\r\n",
            b"ATE0\r\n" | b"ATE1\r\n" => b"OK\r\n",
            b"AT+GMR\r\n" => b"0018000902-AI03\r\nOK\r\n",
            b"AT+CWMODE?\r\n" => b"+CWMODE:1\r\nOK\r\n",
            b"AT+RST\r\n" => b"\r\nready\r\n",
            b"AT+CIFSR\r\n" => b"192.168.4.1\r\nOK\r\n",
            b"AT+CWLAP\r\n" => {
                b"\r\n+CWLAP:(3,\"HomeNet\",-57,\"aa:bb:cc:dd:ee:ff\",6)\r\n+CWLAP:(0,\"Guest\",-80,\"11:22:33:44:55:66\",11)\r\n\r\nOK\r\n"
            }
            command if command.starts_with(b"AT+CWMODE=") => b"no change\r\n",
            command if command.starts_with(b"AT+CWJAP=") => b"\r\nOK\r\n",
            _ => b"OK\r\n",
        };

        for &byte in reply {
            let _ = state.replies.push_back(byte);
        }
        state.command.clear();

        Ok(())
    }
}

/// Timer mock advancing a fixed tick count per query
#[derive(Default)]
pub struct ExampleTimer {
    now: u32,
}

impl Timer<1_000_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1_000_000> {
        self.now = self.now.wrapping_add(100);
        TimerInstantU32::from_ticks(self.now)
    }

    fn start(&mut self, _duration: TimerDurationU32<1_000_000>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        unimplemented!()
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        nb::Result::Err(nb::Error::WouldBlock)
    }
}
