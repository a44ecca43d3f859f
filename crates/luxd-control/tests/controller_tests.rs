use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

use luxd_control::{
    build_dmx_packet, ArtNetTransport, ControlError, ControllerConfig, Lamp, LightController,
    Stripe, TransportConfig,
};
use luxd_core::{Color, Palette, Program, ProgramResolver};

fn controller_with(config: TransportConfig) -> LightController {
    let resolver = Arc::new(ProgramResolver::new(Palette::parse("green #00ff00\n")));
    let transport = ArtNetTransport::new(config).unwrap();
    LightController::new(resolver, ControllerConfig::default(), transport)
}

fn controller() -> LightController {
    controller_with(TransportConfig::default())
}

fn lamp(universe: u16, address: usize, default: &str) -> Box<Lamp> {
    Box::new(Lamp::new(universe, address, default, Program::Constant(Color::BLACK)).unwrap())
}

#[test]
fn test_lamp_end_to_end_buffer() {
    let controller = controller();
    controller.register(2, lamp(0, 2, "255,0,0")).unwrap();
    controller.turn_on();
    controller.tick();

    let buffer = controller.universe_snapshot(0).unwrap();
    assert_eq!(buffer.len(), 6);
    assert_eq!(&buffer[1..5], &[0, 255, 0, 0]);
    assert_eq!(buffer[5], 0);
}

#[test]
fn test_set_program_on_empty_registry_fails() {
    let controller = controller();
    let err = controller.set_program(999, "0,0,0").unwrap_err();
    assert!(matches!(err, ControlError::UnknownFixture(999)));
}

#[test]
fn test_duplicate_registration_fails() {
    let controller = controller();
    controller.register(1, lamp(0, 2, "green")).unwrap();
    assert!(matches!(
        controller.register(1, lamp(0, 8, "green")),
        Err(ControlError::DuplicateFixture(1))
    ));
}

#[test]
fn test_bad_spec_keeps_previous_program() {
    let controller = controller();
    controller.register(5, lamp(0, 2, "255,0,0")).unwrap();
    controller.turn_on();
    controller.tick();

    assert!(controller.set_program(5, "garbage spec").is_err());
    controller.tick();
    let buffer = controller.universe_snapshot(0).unwrap();
    assert_eq!(buffer[1], 0);
    assert_eq!(buffer[2], 255);
}

#[test]
fn test_turn_off_preserves_state_and_stops_ticks() {
    let controller = controller();
    controller.register(1, lamp(0, 2, "green")).unwrap();
    controller.turn_on();
    controller.tick();
    let before = controller.universe_snapshot(0).unwrap();

    controller.turn_off();
    assert!(!controller.is_enabled());
    controller.set_program(1, "255,255,255").unwrap();
    controller.tick();
    // Disabled: the new program is stored but no recompute happened.
    assert_eq!(controller.universe_snapshot(0).unwrap(), before);

    controller.turn_on();
    controller.tick();
    assert_eq!(controller.universe_snapshot(0).unwrap(), before);
}

#[test]
fn test_turn_on_resets_to_default_program() {
    let controller = controller();
    controller.register(1, lamp(0, 1, "green")).unwrap();
    controller.turn_on();
    controller.set_program(1, "255,0,0").unwrap();
    controller.tick();
    assert_eq!(controller.universe_snapshot(0).unwrap()[1], 255);

    controller.turn_on();
    controller.tick();
    let buffer = controller.universe_snapshot(0).unwrap();
    assert_eq!(&buffer[1..4], &[0, 255, 0]);
}

#[test]
fn test_stripe_spans_multiple_universes() {
    let controller = controller();
    let stripe = Stripe::new(
        30,
        200,
        "#010203",
        Program::Constant(Color::new(1, 2, 3)),
    )
    .unwrap();
    controller.register(9, Box::new(stripe)).unwrap();
    controller.turn_on();
    controller.tick();

    let first = controller.universe_snapshot(30).unwrap();
    let second = controller.universe_snapshot(31).unwrap();
    assert_eq!(first.len(), 170 * 3);
    assert_eq!(second.len(), 30 * 3);
    assert_eq!(&first[0..3], &[1, 2, 3]);
    assert_eq!(&second[87..90], &[1, 2, 3]);
}

#[test]
fn test_tick_sends_to_configured_destination() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();

    let mut config = TransportConfig::default();
    config
        .destinations
        .insert(0, vec![receiver.local_addr().unwrap()]);
    let controller = controller_with(config);
    controller.register(2, lamp(0, 2, "255,0,0")).unwrap();
    controller.turn_on();
    controller.tick();

    let mut buf = [0u8; 128];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    let expected = build_dmx_packet(0, &[0, 0, 255, 0, 0, 0]);
    assert_eq!(&buf[..len], expected.as_slice());
}

#[test]
fn test_listener_forwards_and_drops_malformed() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();

    // Listener on an ephemeral loopback port so tests do not fight over 6454.
    let listen_port = {
        let probe = UdpSocket::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap().port()
    };
    let mut config = TransportConfig::default();
    config.bind_addr = format!("127.0.0.1:{listen_port}").parse().unwrap();
    config
        .destinations
        .insert(4, vec![receiver.local_addr().unwrap()]);
    let controller = controller_with(config);
    let listener = controller.spawn_listener().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    let listen_addr = format!("127.0.0.1:{listen_port}");
    // Too short for a header: must be dropped without killing the loop.
    sender.send_to(&[1, 2, 3], &listen_addr).unwrap();
    let frame = build_dmx_packet(4, &[42; 12]);
    sender.send_to(&frame, &listen_addr).unwrap();

    let mut buf = [0u8; 128];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], frame.as_slice());

    controller.shutdown();
    listener.join().unwrap();
}

#[test]
fn test_ticker_thread_stops_on_shutdown() {
    let controller = controller();
    let ticker = controller.spawn_ticker().unwrap();
    controller.shutdown();
    ticker.join().unwrap();
}
