//! # AgroLink Node
//!
//! Ponta sensora: amostra clima (AHT10), luminância (BH1750) e três
//! canais analógicos (solo, NPK, UV), monta o frame de 8 bytes e o
//! transmite em melhor esforço pelo enlace de rádio a cada 10 s.
//!
//! Falha de sondagem de sensor no arranque é fatal: o Node para em
//! espera infinita em vez de transmitir telemetria lixo.

mod acquisition;
mod scale;
mod sensors;

use std::time::{Duration, Instant};

use acquisition::Acquisition;
use agrolink_core::clock::{Clock, SystemClock};
use agrolink_core::codec::encode_frame;
use agrolink_core::config::AppConfig;
use agrolink_core::link::{RadioTx, UdpRadioTx};
use sensors::{SimAnalogInput, SimClimateSensor, SimLightSensor};
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    for e in config.validate() {
        warn!("Config: {e}");
    }

    let node_cfg = &config.node;
    let format = config.wire_format().unwrap_or_default();
    let interval = Duration::from_secs_f64(node_cfg.cycle_secs);

    // ── Sensores (sondagem fatal) ──
    let climate = match SimClimateSensor::probe() {
        Ok(s) => s,
        Err(e) => halt(&format!("Sensor de clima: {e}")),
    };
    let light = match SimLightSensor::probe() {
        Ok(s) => s,
        Err(e) => halt(&format!("Sensor de luminância: {e}")),
    };
    let sensors_cfg = &node_cfg.sensors;
    let soil = SimAnalogInput::new(sensors_cfg.soil_pin);
    let npk = SimAnalogInput::new(sensors_cfg.npk_pin);
    let uv = SimAnalogInput::new(sensors_cfg.uv_pin);

    // ── Rádio (o Node não re-checa o enlace após o bind) ──
    let mut radio = UdpRadioTx::open(&node_cfg.link, &node_cfg.radio)
        .expect("Falha ao abrir o enlace de rádio");

    let clock = SystemClock;
    let mut acq = Acquisition::new(
        climate,
        light,
        soil,
        npk,
        uv,
        sensors_cfg.clone(),
        clock,
    );

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌱 AGROLINK NODE – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Destino:   {}:{}", node_cfg.link.dest_ip, node_cfg.link.port);
    println!("  Pipe:      {}", node_cfg.radio.pipe_address);
    println!("  Intervalo: {:.1}s", node_cfg.cycle_secs);
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop principal ──
    loop {
        let cycle_start = Instant::now();

        match acq.acquire() {
            Ok(packet) => match encode_frame(&packet, format) {
                Ok(frame) => {
                    // Uma tentativa, sem retry: o próximo ciclo sobrescreve
                    if let Err(e) = radio.try_send(&frame) {
                        warn!("Falha no envio de rádio: {e}");
                    }
                    info!("TX → {packet}");
                }
                Err(e) => error!("Erro ao serializar pacote: {e}"),
            },
            Err(e) => warn!("Ciclo de aquisição falhou: {e}"),
        }

        // Dormir pelo tempo restante do intervalo
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            clock.sleep(interval - elapsed);
        }
    }
}

/// Parada de segurança: loga e fica em espera infinita (sem recuperação).
fn halt(msg: &str) -> ! {
    error!("{msg} — Node parado");
    loop {
        std::thread::sleep(Duration::from_secs(60));
    }
}
