//! Regras de escala e quantização dos campos do pacote.
//!
//! Reproduz exatamente a aritmética do firmware original: `map()` de
//! Arduino (interpolação linear inteira com divisão truncada), clamp de
//! percentuais e casts truncantes. O campo NPK fica deliberadamente sem
//! clamp (semântica preservada — ver DESIGN.md).

use agrolink_core::types::ADC_MAX;

/// Clamp de percentual para [0,100].
pub fn clamp_pct(x: i32) -> u8 {
    x.clamp(0, 100) as u8
}

/// `map()` de Arduino: interpolação linear inteira entre dois pontos de
/// calibração, divisão truncada em direção a zero, sem clamp.
pub fn map_linear(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Temperatura: cast truncante float → inteiro (23.7 → 23, -5.9 → -5).
pub fn temperature_c(t: f32) -> i8 {
    t as i8
}

/// Umidade do ar: truncada e com clamp (glitch de 105% vira 100).
pub fn humidity_pct(h: f32) -> u8 {
    clamp_pct(h as i32)
}

/// Luminosidade: cast truncante, sem clamp.
pub fn light_lux(lux: f32) -> u16 {
    lux as u16
}

/// Umidade do solo: remap com endpoints invertidos (ADC maior = mais
/// seco = percentual menor), depois clamp.
pub fn soil_percent(raw: u16, wet: u16, dry: u16) -> u8 {
    clamp_pct(map_linear(
        i32::from(raw),
        i32::from(dry),
        i32::from(wet),
        0,
        100,
    ))
}

/// Proxy NPK: remap [0,1023] → [0,100] **sem** clamp. O cast final
/// reproduz o `(uint8_t)` do C: trunca para os 8 bits baixos.
pub fn npk_percent(raw: u16) -> u8 {
    map_linear(i32::from(raw), 0, i32::from(ADC_MAX), 0, 100) as u8
}

/// Índice UV em décimos: raw × (25.0/1023.0), truncado para décimos
/// inteiros (1023 → 250 ↔ "25.0"). f64 para que o fundo de escala
/// caia exatamente em 250.
pub fn uv_tenths(raw: u16) -> u8 {
    (f64::from(raw) * 250.0 / f64::from(ADC_MAX)) as u8
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
