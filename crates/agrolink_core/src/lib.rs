//! # AgroLink Core
//!
//! Crate compartilhada entre o Node (ponta sensora) e o Gateway
//! (encaminhador para a nuvem): contrato de dados, codec do frame de
//! 8 bytes, abstrações de enlace de rádio e relógio, e configuração TOML.
//!
//! ## Módulos
//! - [`types`] – `SensorPacket`, o contrato de dados de fio
//! - [`codec`] – Encode/decode do frame fixo (legado e versionado)
//! - [`link`] – Papéis TX/RX do enlace (UDP no host, loopback em testes)
//! - [`clock`] – Relógio bloqueante abstraído para testes de cadência
//! - [`config`] – Configuração unificada via TOML

pub mod clock;
pub mod codec;
pub mod config;
pub mod link;
pub mod types;

// Re-exports convenientes
pub use codec::{FRAME_LEN, WIRE_VERSION, WireFormat, decode_frame, encode_frame};
pub use config::{AppConfig, GatewayConfig, NodeConfig};
pub use types::SensorPacket;
