//! Integration tests for the PS/2 keyboard core
//!
//! These tests exercise the full pipeline: bytes fed into a channel port,
//! decoded by the input pump, published on the bus and consumed by the
//! event API and the line editor.

use ps2_keyboard::bus::{BusError, ChannelMode, Message, MessageBus, Payload, KEYPRESS_TOPIC};
use ps2_keyboard::config::{Config, DriverConfig};
use ps2_keyboard::console::BufferConsole;
use ps2_keyboard::keyboard::{
    get_next_key_event, ChannelPort, KeyCode, KeyEvent, KeyboardDriver, PortFeeder,
    ScancodeTranslator,
};
use ps2_keyboard::line_editor::{read_line, LineEditor};
use ps2_keyboard::report::SessionReport;
use std::thread;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SC_H: u8 = 0x33;
const SC_I: u8 = 0x43;
const SC_1: u8 = 0x16;
const SC_5: u8 = 0x2E;
const SC_ENTER: u8 = 0x5A;
const SC_BACKSPACE: u8 = 0x66;
const SC_LSHIFT: u8 = 0x12;

/// Make code followed by its break sequence
fn tap(make: u8) -> Vec<u8> {
    vec![make, 0xF0, make]
}

fn typed(makes: &[u8]) -> Vec<u8> {
    makes.iter().flat_map(|&m| tap(m)).collect()
}

/// Start a driver on a fresh bus with one subscriber already listening
fn start() -> (KeyboardDriver, PortFeeder, ps2_keyboard::bus::Subscriber) {
    let bus = MessageBus::new();
    let subscriber = bus.subscribe("test");
    subscriber.set_listen_status(KEYPRESS_TOPIC, true);

    let (port, feeder) = ChannelPort::new();
    let driver = KeyboardDriver::initialize(
        port,
        bus,
        &DriverConfig::default(),
        ScancodeTranslator::new(),
    )
    .expect("driver");
    (driver, feeder, subscriber)
}

fn collect(subscriber: &ps2_keyboard::bus::Subscriber) -> Vec<KeyEvent> {
    std::iter::from_fn(|| get_next_key_event(subscriber).ok()).collect()
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[test]
fn initialization_sends_handshake_in_order() {
    let (driver, feeder, _sub) = start();
    assert_eq!(feeder.sent(), vec![0xF0, 0x02, 0xF4]);
    drop(feeder);
    driver.join().expect("join");
}

// ---------------------------------------------------------------------------
// Line editing over the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn readline_hi_without_releases() {
    let (driver, feeder, sub) = start();
    feeder.push_all(&[SC_H, SC_I, SC_ENTER]);

    let mut console = BufferConsole::new();
    let line = read_line(&sub, &mut console).expect("line");
    assert_eq!(line.as_bytes(), b"hi");
    assert_eq!(line.len(), 2);
    assert_eq!(console.text(), "hi\n");

    drop(feeder);
    driver.join().expect("join");
}

#[test]
fn readline_with_releases_and_backspace() {
    let (driver, feeder, sub) = start();
    let mut bytes = typed(&[SC_H, SC_BACKSPACE]);
    bytes.extend(tap(SC_ENTER));
    feeder.push_all(&bytes);

    let line = read_line(&sub, BufferConsole::new()).expect("line");
    assert_eq!(line.as_bytes(), b"");
    assert_eq!(line.len(), 0);

    drop(feeder);
    driver.join().expect("join");
}

#[test]
fn readline_backspace_on_empty_buffer() {
    let (driver, feeder, sub) = start();
    feeder.push_all(&typed(&[SC_BACKSPACE, SC_BACKSPACE, SC_I, SC_ENTER]));

    let mut console = BufferConsole::new();
    let line = read_line(&sub, &mut console).expect("line");
    assert_eq!(line.as_bytes(), b"i");
    assert_eq!(console.backspaces(), 0);

    drop(feeder);
    driver.join().expect("join");
}

#[test]
fn readline_applies_shift() {
    let (driver, feeder, sub) = start();
    // Shift held for 'h' and '1', released for 'i'
    let mut bytes = vec![SC_LSHIFT];
    bytes.extend(tap(SC_H));
    bytes.extend([0xF0, SC_LSHIFT]);
    bytes.extend(tap(SC_I));
    bytes.push(SC_LSHIFT);
    bytes.extend(tap(SC_1));
    bytes.extend([0xF0, SC_LSHIFT]);
    bytes.extend(tap(SC_ENTER));
    feeder.push_all(&bytes);

    let line = read_line(&sub, BufferConsole::new()).expect("line");
    assert_eq!(line.to_string_lossy(), "Hi!");

    drop(feeder);
    driver.join().expect("join");
}

#[test]
fn consecutive_lines_are_independent() {
    let (driver, feeder, sub) = start();
    feeder.push_all(&[SC_H, SC_ENTER, SC_I, SC_ENTER]);

    let first = read_line(&sub, BufferConsole::new()).expect("first");
    let second = read_line(&sub, BufferConsole::new()).expect("second");
    assert_eq!(first.as_bytes(), b"h");
    assert_eq!(second.as_bytes(), b"i");

    drop(feeder);
    driver.join().expect("join");
}

#[test]
fn readline_blocks_until_bytes_arrive() {
    let (driver, feeder, sub) = start();

    let reader = thread::spawn(move || {
        let line = LineEditor::new(BufferConsole::new()).read(&sub);
        line.map(|l| l.into_bytes())
    });

    for &b in &[SC_5, SC_5, SC_ENTER] {
        feeder.push(b);
        thread::yield_now();
    }

    assert_eq!(reader.join().unwrap().expect("line"), b"55".to_vec());
    drop(feeder);
    driver.join().expect("join");
}

// ---------------------------------------------------------------------------
// Event delivery
// ---------------------------------------------------------------------------

#[test]
fn events_arrive_in_byte_order() {
    let (driver, feeder, sub) = start();
    feeder.push_all(&[0xE0, 0x75, SC_H, 0xE0, 0xF0, 0x75, 0xF0, SC_H, 0xFE]);
    drop(feeder);
    let stats = driver.join().expect("join");

    let events = collect(&sub);
    let summary: Vec<(KeyCode, bool)> = events.iter().map(|e| (e.keycode, e.released)).collect();
    assert_eq!(
        summary,
        vec![
            (KeyCode::UP, false),
            (KeyCode(b'h'), false),
            (KeyCode::UP, true),
            (KeyCode(b'h'), true),
            (KeyCode::UNKNOWN, false),
        ]
    );
    assert_eq!(stats.bytes_read, 9);
    assert_eq!(stats.events_published, 5);
}

#[test]
fn uninterested_subscriber_receives_nothing() {
    let bus = MessageBus::new();
    let listening = bus.subscribe("listening");
    listening.set_listen_status(KEYPRESS_TOPIC, true);
    let idle = bus.subscribe("idle");

    let port = ChannelPort::from_bytes(&typed(&[SC_H, SC_I, SC_5]));
    let driver = KeyboardDriver::initialize(
        port,
        bus,
        &DriverConfig::default(),
        ScancodeTranslator::new(),
    )
    .expect("driver");
    let stats = driver.join().expect("join");

    assert_eq!(stats.events_published, 6);
    assert_eq!(stats.events_unheard, 0);
    assert_eq!(collect(&listening).len(), 6);
    assert!(idle.try_message().is_none());
}

#[test]
fn multicast_gives_each_listener_a_copy() {
    let bus = MessageBus::new();
    let a = bus.subscribe("a");
    let b = bus.subscribe("b");
    a.set_listen_status(KEYPRESS_TOPIC, true);
    b.set_listen_status(KEYPRESS_TOPIC, true);

    let port = ChannelPort::from_bytes(&[SC_H, SC_ENTER]);
    let driver = KeyboardDriver::initialize(
        port,
        bus,
        &DriverConfig::default(),
        ScancodeTranslator::new(),
    )
    .expect("driver");
    driver.join().expect("join");

    assert_eq!(read_line(&a, BufferConsole::new()).expect("a").as_bytes(), b"h");
    assert_eq!(read_line(&b, BufferConsole::new()).expect("b").as_bytes(), b"h");
}

#[test]
fn foreign_topic_does_not_satisfy_key_wait() {
    let (driver, feeder, sub) = start();
    let bus = driver.bus().clone();
    bus.register_channel("mouse", ChannelMode::Multicast, "test")
        .unwrap();
    sub.set_listen_status("mouse", true);

    bus.send(Message::new("mouse", Payload::Bytes(vec![0x08, 0x01, 0x00])))
        .unwrap();
    feeder.push(SC_I);

    let event = get_next_key_event(&sub).expect("event");
    assert_eq!(event.keycode, KeyCode(b'i'));

    drop(bus);
    drop(feeder);
    driver.join().expect("join");
    assert_eq!(get_next_key_event(&sub), Err(BusError::Disconnected));
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[test]
fn report_summarizes_a_replay() {
    let start_time = Instant::now();
    let mut config = Config::default();
    config.translator.log_unknown_scancodes = false;

    let bus = MessageBus::new();
    let sub = bus.subscribe("report");
    sub.set_listen_status(KEYPRESS_TOPIC, true);

    let mut bytes = vec![SC_LSHIFT];
    bytes.extend(tap(SC_H));
    bytes.push(0xAB);
    let port = ChannelPort::from_bytes(&bytes);
    let driver = KeyboardDriver::initialize(
        port,
        bus,
        &config.driver,
        config.translator.translator(),
    )
    .expect("driver");
    let stats = driver.join().expect("join");
    let events = collect(&sub);

    let report = SessionReport::new(start_time, &stats, &events);
    assert_eq!(report.summary.bytes_read, 5);
    assert_eq!(report.summary.presses, 3);
    assert_eq!(report.summary.releases, 1);
    assert_eq!(report.summary.unknown_scancodes, 1);
    assert!(report.summary.final_modifiers.shift);
    assert_eq!(report.events[1].event.character, b'H');
}
