// packages/extensions/src/main.rs
//! Recorder extensions demo
//!
//! Instruments a simulated Wi-Fi driver, records a short session, writes the
//! trace file and reports which schema file each extension resolves to.

use anyhow::{Context, Result};
use recorder_extensions::extension::{ExtensionRegistry, SchemaLocator};
use recorder_extensions::extensions::aws_wifi::{
    self, NetworkParams, WifiApi, WifiReturnCode, WifiSecurity,
};
use recorder_extensions::extensions::EXTENSIONS;
use recorder_extensions::interception::Interceptable;
use recorder_extensions::observability::{init_metrics, init_tracing};
use recorder_extensions::recording::{Compressor, TraceDocument};
use recorder_extensions::sink::RingRecorder;
use recorder_extensions::utils::config::KitConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Driver stand-in that only knows one access point
struct SimulatedWifi {
    known_ssid: &'static str,
    powered: AtomicBool,
}

impl Interceptable for SimulatedWifi {}

impl WifiApi for SimulatedWifi {
    fn on(&self) -> WifiReturnCode {
        self.powered.store(true, Ordering::SeqCst);
        WifiReturnCode::Success
    }

    fn off(&self) -> WifiReturnCode {
        self.powered.store(false, Ordering::SeqCst);
        WifiReturnCode::Success
    }

    fn connect_ap(&self, params: &NetworkParams) -> WifiReturnCode {
        if !self.powered.load(Ordering::SeqCst) {
            WifiReturnCode::Failure
        } else if params.ssid == self.known_ssid {
            WifiReturnCode::Success
        } else {
            WifiReturnCode::Timeout
        }
    }
}

/// Application code; unaware of tracing
fn join_network<W: WifiApi>(wifi: &W, candidates: &[NetworkParams]) -> Option<String> {
    if !wifi.on().is_success() {
        return None;
    }
    candidates
        .iter()
        .find(|params| wifi.connect_ap(params).is_success())
        .map(|params| params.ssid.clone())
}

fn main() -> Result<()> {
    let config = KitConfig::load().context("loading configuration")?;

    init_tracing(&config.logging)?;
    init_metrics()?;

    info!("Starting recorder extensions demo v{}", recorder_extensions::VERSION);

    // Re-check the build-time table and keep it for code lookups
    let registry = ExtensionRegistry::from_table(&EXTENSIONS)?;
    for ext in registry.extensions() {
        info!(
            "Extension {} {} codes {}..{} schema {}",
            ext.name,
            ext.version,
            ext.base_code,
            ext.end_code(),
            ext.schema_file_name()
        );
    }

    let recorder = RingRecorder::new(&config.recorder);
    let driver = SimulatedWifi {
        known_ssid: "home-ap",
        powered: AtomicBool::new(false),
    };
    let wifi = aws_wifi::instrument(driver, &recorder);

    let candidates = [
        NetworkParams::new("office", WifiSecurity::Wpa2Enterprise),
        NetworkParams::new("home-ap", WifiSecurity::Wpa).with_password("hunter2"),
    ];
    match join_network(&wifi, &candidates) {
        Some(ssid) => info!("Joined {}", ssid),
        None => warn!("No network joined"),
    }
    wifi.off();

    let stats = recorder.stats();
    info!(
        "Recorded {} events, dropped {}, truncated {}",
        stats.recorded, stats.dropped, stats.truncated
    );

    let events = recorder.drain();
    for event in &events {
        if let Some((ext, offset)) = registry.resolve(event.code) {
            info!(
                "t={}ns {}[{}] text={:?} fields={:?}",
                event.timestamp_ns,
                ext.name,
                offset,
                event.text(),
                event.scalars()
            );
        }
    }

    let document = TraceDocument::new(&registry.extensions(), events);
    let compressor = config
        .trace
        .compress
        .then(|| Compressor::new(config.trace.compression_level));
    document
        .write_to(&config.trace.output_path, compressor.as_ref())
        .with_context(|| format!("writing trace to {:?}", config.trace.output_path))?;

    let locator = SchemaLocator::new(config.schema.fallback_dir.clone());
    for (ext, schema) in document.resolve_schemas(&config.trace.output_path, &locator) {
        match schema {
            Some(path) => info!("{} resolves to {:?}", ext.name, path),
            None => warn!(
                "{} has no schema; the viewer will look for {}",
                ext.name,
                ext.schema_file_name()
            ),
        }
    }

    Ok(())
}
