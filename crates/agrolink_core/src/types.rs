//! Definição do pacote de sensores compartilhado entre Node e Gateway.
//!
//! O `SensorPacket` é o contrato de dados do sistema inteiro: ordem e
//! largura dos campos fazem parte do formato de fio e não podem mudar
//! sem quebrar a compatibilidade entre as duas pontas.

use serde::{Deserialize, Serialize};

/// Valor máximo do ADC de 10 bits (Arduino UNO).
pub const ADC_MAX: u16 = 1023;

// ──────────────────────────────────────────────
// SensorPacket
// ──────────────────────────────────────────────

/// Leitura completa de um ciclo de aquisição do Node.
///
/// Layout binário fixo (7 bytes de campos, little-endian):
///
/// ```text
/// ┌──────────┬─────────┬───────────┬─────────┬────────┬────────┐
/// │ temp i8  │ hum u8  │ light u16 │ soil u8 │ npk u8 │ uv u8  │
/// └──────────┴─────────┴───────────┴─────────┴────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorPacket {
    /// Temperatura do ar (°C inteiros, truncado)
    pub temperature: i8,
    /// Umidade relativa do ar (0–100%, com clamp)
    pub humidity: u8,
    /// Luminosidade (lux, truncado, sem clamp)
    pub light: u16,
    /// Umidade do solo (0–100%, com clamp; calibração wet/dry invertida)
    pub soil: u8,
    /// Proxy NPK (0–100%, **sem** clamp — ver DESIGN.md)
    pub npk: u8,
    /// Índice UV em décimos (0–250 ↔ 0.0–25.0)
    pub uv: u8,
}

impl SensorPacket {
    /// Índice UV como float (byte em décimos ÷ 10).
    ///
    /// f64 para que a serialização JSON imprima `25.0`/`0.3` sem
    /// ruído de conversão f32→f64.
    pub fn uv_index(&self) -> f64 {
        f64::from(self.uv) / 10.0
    }
}

impl std::fmt::Display for SensorPacket {
    /// Linha de resumo humana usada nos logs das duas pontas.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} °C, {} %, {} lux, {} %, {} %, {:.1} UV",
            self.temperature,
            self.humidity,
            self.light,
            self.soil,
            self.npk,
            self.uv_index()
        )
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
