use anyhow::Context;
use crossbeam_channel as channel;
use std::time::{Duration, Instant};

use mcu_vu::{
    ctrl_surf::{decay, Vu, VuConfig},
    midi, InputElement,
};

const CLIENT_NAME: &str = "MCU VU Monitor";
const DEFAULT_TICK_MS: u64 = 10;

fn env_parsed<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => {
            let value = value
                .parse()
                .with_context(|| format!("Invalid value for {name}: {value}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

/// The update period, which must be at least 1 ms for the loop to wait.
fn tick_period(tick_ms: Option<u64>) -> anyhow::Result<Duration> {
    match tick_ms.unwrap_or(DEFAULT_TICK_MS) {
        0 => anyhow::bail!("MCU_VU_TICK_MS must be greater than 0"),
        tick_ms => Ok(Duration::from_millis(tick_ms)),
    }
}

fn report(meters: &mut [Vu]) {
    for (idx, meter) in meters.iter_mut().enumerate() {
        if meter.dirty() {
            log::info!(
                "Track {}: {:>2}/12{}",
                idx + 1,
                meter.position(),
                if meter.overload() { " OVERLOAD" } else { "" },
            );
            meter.clear_dirty();
        }
    }
}

fn run() -> anyhow::Result<()> {
    let decay_ms = env_parsed("MCU_VU_DECAY_MS")?.unwrap_or(decay::DEFAULT);
    let tick = tick_period(env_parsed("MCU_VU_TICK_MS")?)?;

    let (msg_tx, msg_rx) = channel::unbounded();
    let mut ports = midi::PortsIn::try_new(CLIENT_NAME.into(), msg_tx, midi::Cable::default())
        .context("Creating MIDI input")?;
    ports.refresh().context("Listing MIDI ports")?;

    match std::env::var("MCU_VU_PORT") {
        Ok(port_name) => ports.connect(port_name.into())?,
        Err(_) => {
            let port_name = ports.connect_first()?;
            log::info!("MCU_VU_PORT not set, using {port_name}");
        }
    }

    let mut meters = (1..=8)
        .map(|track| VuConfig::for_track(track).map(|config| Vu::new(config.with_decay(decay_ms))))
        .collect::<Result<Vec<_>, _>>()?;

    let mut next_tick = Instant::now() + tick;
    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        // `ports` holds the sender for as long as it is connected.
        if let Ok(msg) = msg_rx.recv_timeout(timeout) {
            if !meters.iter_mut().any(|meter| meter.handle(&msg)) {
                log::trace!("Unhandled {msg:?}");
            }
        }

        if Instant::now() >= next_tick {
            next_tick += tick;
            meters.iter_mut().for_each(InputElement::update);
        }

        report(&mut meters);
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(err) = run() {
        log::error!("Error: {}", err);
        for cause in err.chain().skip(1) {
            log::error!("\t{}", cause);
        }
    }
}
