//! # AgroLink Gateway
//!
//! Ponta de encaminhamento: faz poll do enlace de rádio, decodifica
//! frames de 8 bytes e submete cada pacote como JSON ao endpoint REST
//! da nuvem — um POST por pacote, melhor esforço, sem fila.
//!
//! Falha de bind do rádio no arranque é fatal: o Gateway para em
//! espera infinita.

mod cloud;
mod forwarder;
mod uplink;

use std::time::Duration;

use agrolink_core::clock::{Clock, SystemClock};
use agrolink_core::config::AppConfig;
use agrolink_core::link::UdpRadioRx;
use cloud::HttpSink;
use forwarder::Forwarder;
use tracing::{error, warn};
use uplink::TcpProbeUplink;

/// Pausa do loop quando não há frame disponível.
const IDLE_POLL: Duration = Duration::from_millis(20);

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        let _ = config.save(&config_path);
    }

    for e in config.validate() {
        warn!("Config: {e}");
    }

    let gw_cfg = &config.gateway;
    let format = config.wire_format().unwrap_or_default();

    // ── Rádio (fatal se o bind falhar) ──
    let mut radio = match UdpRadioRx::open(&gw_cfg.link, &gw_cfg.radio) {
        Ok(r) => r,
        Err(e) => halt(&format!("Rádio não inicializou: {e}")),
    };

    // ── Uplink + nuvem ──
    let uplink = match TcpProbeUplink::from_endpoint(&gw_cfg.cloud.endpoint_url) {
        Ok(u) => u,
        Err(e) => halt(&format!("Endpoint de nuvem inválido: {e}")),
    };
    let sink = HttpSink::new(&gw_cfg.cloud);

    let clock = SystemClock;
    let mut fwd = Forwarder::new(gw_cfg, format, sink, uplink, clock);

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌱 AGROLINK GATEWAY – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Rádio:    porta {} | pipe {}", gw_cfg.link.port, gw_cfg.radio.pipe_address);
    println!("  Nuvem:    {}", gw_cfg.cloud.endpoint_url);
    println!("  Nó:       {}", gw_cfg.cloud.node_name);
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop principal: poll sequencial, sem threads ──
    loop {
        if !fwd.poll(&mut radio) {
            clock.sleep(IDLE_POLL);
        }
    }
}

/// Parada de segurança: loga e fica em espera infinita (sem recuperação).
fn halt(msg: &str) -> ! {
    error!("{msg} — Gateway parado");
    loop {
        std::thread::sleep(Duration::from_secs(60));
    }
}
