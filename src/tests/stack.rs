use crate::error::Error;
use crate::responses::UdpPeerMode;
use crate::tests::mock::{connected_adapter, MockSerial};
use alloc::string::ToString;

#[test]
fn test_set_mux_mode_enabled() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.set_mux_mode(true).unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!(1, commands.len());
    assert_eq!("AT+CIPMUX=1\r\n".to_string(), commands[0]);
}

#[test]
fn test_set_mux_mode_disabled() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.set_mux_mode(false).unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!("AT+CIPMUX=0\r\n".to_string(), commands[0]);
}

/// `CIPMUX` recognizes only the success terminator; a failure reply runs
/// into the deadline.
#[test]
fn test_set_mux_mode_error_times_out() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"ERROR\r\n");

    let result = adapter.set_mux_mode(true).unwrap_err();

    assert_eq!(Error::Timeout, result);
}

#[test]
fn test_start_tcp_server_with_port() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.start_tcp_server(8080).unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!("AT+CIPSERVER=1,8080\r\n".to_string(), commands[0]);
}

#[test]
fn test_start_tcp_server_default_port() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.start_tcp_server(0).unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!("AT+CIPSERVER=1\r\n".to_string(), commands[0]);
}

#[test]
fn test_start_tcp_client_correct_command() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.start_tcp_client("10.0.0.1", 80).unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!(1, commands.len());
    assert_eq!("AT+CIPSTART=\"TCP\",\"10.0.0.1\",80\r\n".to_string(), commands[0]);
}

#[test]
fn test_start_tcp_client_error_reply() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"ERROR\r\n");

    let result = adapter.start_tcp_client("10.0.0.1", 80).unwrap_err();

    assert_eq!(Error::ResponseFailed("Command rejected by module."), result);
}

#[test]
fn test_start_udp_client_correct_command() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter
        .start_udp_client("10.0.0.1", 5000, 6000, UdpPeerMode::EstablishPeer)
        .unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!("AT+CIPSTART=\"UDP\",\"10.0.0.1\",5000,6000,2\r\n".to_string(), commands[0]);
}

#[test]
fn test_close_ip_client() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"OK\r\n");

    adapter.close_ip_client().unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!("AT+CIPCLOSE\r\n".to_string(), commands[0]);
}

#[test]
fn test_send_streams_payload() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"> OK\r\n");

    adapter.send(b"hallo!").unwrap();

    let commands = serial.commands_as_strings();
    assert_eq!(2, commands.len());
    assert_eq!("AT+CIPSEND=6\r\n".to_string(), commands[0]);
    assert_eq!("hallo!".to_string(), commands[1]);
    assert_eq!(0, serial.remaining_script());
}

#[test]
fn test_send_error_reply() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"ERROR\r\n");

    let result = adapter.send(b"hallo!").unwrap_err();

    assert_eq!(Error::ResponseFailed("Command rejected by module."), result);
}

/// One byte beyond the announced length belongs to the frame; noise ahead
/// of the `+IPD,` marker is skimmed off.
#[test]
fn test_receive_reads_length_plus_one() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"garble+IPD,5:helloX");

    let mut buffer = [0u8; 8];
    adapter.receive(&mut buffer, 1_000).unwrap();

    assert_eq!(b"helloX", &buffer[..6]);
    assert_eq!(0, serial.remaining_script());
}

/// Surplus bytes beyond the caller's buffer are drained from the stream but
/// discarded, keeping the module's byte count aligned.
#[test]
fn test_receive_discards_overflow() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"+IPD,5:helloX");

    let mut buffer = [0u8; 3];
    adapter.receive(&mut buffer, 1_000).unwrap();

    assert_eq!(b"hel", &buffer);
    assert_eq!(0, serial.remaining_script());
}

#[test]
fn test_receive_timeout_mid_payload() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"+IPD,5:he");

    let mut buffer = [0u8; 8];
    let result = adapter.receive(&mut buffer, 50).unwrap_err();

    assert_eq!(Error::Timeout, result);
}

#[test]
fn test_receive_invalid_length_field() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"+IPD,abc:hello");

    let mut buffer = [0u8; 8];
    let result = adapter.receive(&mut buffer, 1_000).unwrap_err();

    assert_eq!(Error::Protocol("Invalid inbound data length."), result);
}

#[test]
fn test_receive_no_frame_times_out() {
    let serial = MockSerial::new();
    let mut adapter = connected_adapter(&serial);
    serial.add_response(b"unrelated chatter");

    let mut buffer = [0u8; 8];
    let result = adapter.receive(&mut buffer, 1_000).unwrap_err();

    assert_eq!(Error::Timeout, result);
}
