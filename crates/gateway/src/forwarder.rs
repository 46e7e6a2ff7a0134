//! Encaminhador de telemetria: máquina de estados Idle → Receiving →
//! Forwarding → Idle.
//!
//! - Idle → Receiving: guiada só pela disponibilidade do enlace;
//! - Receiving → Forwarding: incondicional quando um frame de tamanho
//!   correto decodifica (tamanho errado = descarte silencioso);
//! - Forwarding → Idle: após a pausa fixa de pacing, qualquer que seja
//!   o desfecho HTTP.
//!
//! Entrega é "no máximo uma vez", fogo-e-esquece: sem fila, sem retry,
//! sem efeito sobre o ciclo seguinte.

use std::time::Duration;

use agrolink_core::clock::Clock;
use agrolink_core::codec::{WireFormat, decode_frame};
use agrolink_core::config::GatewayConfig;
use agrolink_core::link::RadioRx;
use agrolink_core::types::SensorPacket;
use tracing::{debug, info, warn};

use crate::cloud::{CloudError, CloudRecord, CloudResponse, CloudSink};
use crate::uplink::Uplink;

/// Estados do encaminhador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwarderState {
    #[default]
    Idle,
    Receiving,
    Forwarding,
}

/// Erros de um encaminhamento (só logados, nunca propagados entre ciclos).
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Uplink fora do ar após {0} tentativas — pacote descartado")]
    LinkDown(u32),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

/// Encaminhador: decodifica frames recebidos e faz um POST por pacote.
pub struct Forwarder<S, U, K> {
    sink: S,
    uplink: U,
    clock: K,
    node_name: String,
    format: WireFormat,
    pacing: Duration,
    reconnect_attempts: u32,
    reconnect_spacing: Duration,
    state: ForwarderState,
}

impl<S, U, K> Forwarder<S, U, K>
where
    S: CloudSink,
    U: Uplink,
    K: Clock,
{
    pub fn new(cfg: &GatewayConfig, format: WireFormat, sink: S, uplink: U, clock: K) -> Self {
        Self {
            sink,
            uplink,
            clock,
            node_name: cfg.cloud.node_name.clone(),
            format,
            pacing: Duration::from_millis(cfg.pacing_ms),
            reconnect_attempts: cfg.reconnect_attempts,
            reconnect_spacing: Duration::from_millis(cfg.reconnect_spacing_ms),
            state: ForwarderState::Idle,
        }
    }

    pub fn state(&self) -> ForwarderState {
        self.state
    }

    /// Um tique do loop do Gateway. `true` se um frame foi consumido.
    pub fn poll<R: RadioRx>(&mut self, radio: &mut R) -> bool {
        if !radio.available() {
            self.state = ForwarderState::Idle;
            return false;
        }

        self.state = ForwarderState::Receiving;
        let data = match radio.receive() {
            Ok(d) => d,
            Err(e) => {
                warn!("Erro ao ler rádio: {e}");
                self.state = ForwarderState::Idle;
                return false;
            }
        };

        let packet = match decode_frame(&data, self.format) {
            Ok(p) => p,
            Err(e) => {
                // Descarte silencioso: frame malformado não gera submissão
                debug!("Frame descartado ({} bytes): {e}", data.len());
                self.state = ForwarderState::Idle;
                return false;
            }
        };

        info!("📥 RX ← {packet}");

        self.state = ForwarderState::Forwarding;
        match self.forward(&packet) {
            Ok(resp) => info!("Nuvem respondeu {}: {}", resp.status, resp.body),
            Err(e) => warn!("{e}"),
        }

        // Pacing fixo independente do desfecho HTTP
        self.clock.sleep(self.pacing);
        self.state = ForwarderState::Idle;
        true
    }

    /// Encaminha um pacote: JSON + associação de uplink + um POST.
    pub fn forward(&mut self, packet: &SensorPacket) -> Result<CloudResponse, ForwardError> {
        let json = CloudRecord::from_packet(&self.node_name, packet).to_json()?;
        info!("🚀 Enviando JSON → {json}");

        self.ensure_uplink()?;
        Ok(self.sink.post_json(&json)?)
    }

    /// Janela limitada de reassociação: N tentativas espaçadas; se o
    /// uplink não voltar, o pacote atual é perdido (sem fila).
    fn ensure_uplink(&mut self) -> Result<(), ForwardError> {
        if self.uplink.is_up() {
            return Ok(());
        }

        warn!("Uplink fora do ar, tentando reassociar...");
        for _ in 0..self.reconnect_attempts {
            self.clock.sleep(self.reconnect_spacing);
            if self.uplink.reconnect() {
                info!("Uplink reassociado");
                return Ok(());
            }
        }
        Err(ForwardError::LinkDown(self.reconnect_attempts))
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
