//! ps2kbd - replay raw PS/2 keyboard captures through the input core
//!
//! ```text
//! ps2kbd decode   <capture|->            print every decoded event as JSON
//! ps2kbd readline <capture|->            run the line editor over the capture
//! ps2kbd report   <capture|-> <out.json> write a session report
//! ```

use anyhow::{bail, Context, Result};
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;
use std::{env, fs, process};

use ps2_keyboard::{
    bus::{BusError, MessageBus, Subscriber, KEYPRESS_TOPIC},
    capture::parse_capture,
    config::Config,
    console::TerminalConsole,
    keyboard::{get_next_key_event, ChannelPort, KeyEvent, KeyboardDriver, PumpStats},
    line_editor::{LineEditor, LineError},
    report::{EventEntry, SessionReport},
};

fn main() -> Result<()> {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if let Err(e) = &loaded {
        log::warn!("using default config: {e}");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, input] if cmd == "decode" => decode(&config, input),
        [cmd, input] if cmd == "readline" => readline(&config, input),
        [cmd, input, out] if cmd == "report" => report(&config, input, out),
        _ => {
            eprintln!("usage: ps2kbd <decode|readline> <capture|->");
            eprintln!("       ps2kbd report <capture|-> <out.json>");
            process::exit(2);
        }
    }
}

/// Read capture text from a file, or stdin for `-`
fn read_capture(input: &str) -> Result<Vec<u8>> {
    let text = if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading capture from stdin")?;
        text
    } else {
        fs::read_to_string(input).with_context(|| format!("reading capture {input}"))?
    };
    Ok(parse_capture(&text)?)
}

/// Replay the capture through a driver and wait for the pump to drain it.
///
/// The returned subscriber holds every event, queued in order.
fn replay(config: &Config, input: &str) -> Result<(Subscriber, PumpStats)> {
    let bytes = read_capture(input)?;

    let bus = MessageBus::new();
    let subscriber = bus.subscribe("ps2kbd");
    subscriber.set_listen_status(KEYPRESS_TOPIC, true);

    let port = ChannelPort::from_bytes(&bytes);
    let driver = KeyboardDriver::initialize(
        port,
        bus,
        &config.driver,
        config.translator.translator(),
    )?;
    let stats = driver.join()?;
    Ok((subscriber, stats))
}

fn drain(subscriber: &Subscriber) -> Result<Vec<KeyEvent>> {
    let mut events = Vec::new();
    loop {
        match get_next_key_event(subscriber) {
            Ok(event) => events.push(event),
            Err(BusError::Disconnected) => return Ok(events),
            Err(e) => return Err(e.into()),
        }
    }
}

fn decode(config: &Config, input: &str) -> Result<()> {
    let (subscriber, stats) = replay(config, input)?;
    for event in drain(&subscriber)? {
        println!("{}", serde_json::to_string(&EventEntry::from(&event))?);
    }
    eprintln!(
        "{} bytes, {} events",
        stats.bytes_read, stats.events_published
    );
    Ok(())
}

fn readline(config: &Config, input: &str) -> Result<()> {
    let (subscriber, _) = replay(config, input)?;
    let editor = LineEditor::new(TerminalConsole::stdout()).with_echo(config.line_editor.echo);
    match editor.read(&subscriber) {
        Ok(line) => {
            println!("{:?} ({} bytes)", line.to_string_lossy(), line.len());
            Ok(())
        }
        Err(LineError::Bus(BusError::Disconnected)) => {
            bail!("capture ended before Enter was pressed")
        }
        Err(e) => Err(e.into()),
    }
}

fn report(config: &Config, input: &str, out: &str) -> Result<()> {
    let start = Instant::now();
    let (subscriber, stats) = replay(config, input)?;
    let events = drain(&subscriber)?;
    let report = SessionReport::new(start, &stats, &events);
    report
        .export_json(Path::new(out))
        .with_context(|| format!("writing report to {out}"))?;
    println!("Report written to {out} ({} events)", events.len());
    Ok(())
}
