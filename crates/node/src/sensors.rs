//! Seams de sensores do Node.
//!
//! O hardware original (AHT10 + BH1750 no I2C, três canais analógicos)
//! fica atrás de traits para que a aquisição seja testável sem placa.
//! O backend "sim" gera leituras determinísticas plausíveis para rodar
//! no host; backends de hardware implementam as mesmas traits.

use agrolink_core::types::ADC_MAX;

/// Erros de sensores.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// Sensor ausente ou mal cabeado no arranque. Fatal: o Node para em
    /// espera infinita em vez de reportar telemetria lixo.
    #[error("Sensor {0} não detectado")]
    NotDetected(&'static str),

    #[error("Falha de leitura em {0}: {1}")]
    Read(&'static str, String),
}

/// Um evento combinado de temperatura + umidade (AHT10).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Temperatura do ar (°C)
    pub temperature_c: f32,
    /// Umidade relativa (%)
    pub humidity_pct: f32,
}

/// Sensor de clima combinado: um evento por ciclo, sem média.
pub trait ClimateSensor {
    fn read(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Sensor de luminância: uma leitura por ciclo, sem média.
pub trait LightSensor {
    fn read_lux(&mut self) -> Result<f32, SensorError>;
}

/// Um canal analógico cru (0–1023).
pub trait AnalogInput {
    fn read_raw(&mut self) -> u16;
}

// ──────────────────────────────────────────────
// Backend simulado (host)
// ──────────────────────────────────────────────

/// Clima simulado: senóides lentas em torno de um dia ameno.
pub struct SimClimateSensor {
    step: u32,
}

impl SimClimateSensor {
    /// Sondagem de arranque (equivalente ao `begin()` do driver I2C).
    pub fn probe() -> Result<Self, SensorError> {
        Ok(Self { step: 0 })
    }
}

impl ClimateSensor for SimClimateSensor {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.step = self.step.wrapping_add(1);
        let t = self.step as f32;
        Ok(ClimateReading {
            temperature_c: 23.0 + 6.0 * (t * 0.031).sin(),
            humidity_pct: 55.0 + 20.0 * (t * 0.017 + 1.3).sin(),
        })
    }
}

/// Luminância simulada.
pub struct SimLightSensor {
    step: u32,
}

impl SimLightSensor {
    pub fn probe() -> Result<Self, SensorError> {
        Ok(Self { step: 0 })
    }
}

impl LightSensor for SimLightSensor {
    fn read_lux(&mut self) -> Result<f32, SensorError> {
        self.step = self.step.wrapping_add(1);
        let t = self.step as f32;
        Ok((12_000.0 + 11_000.0 * (t * 0.023).sin()).max(0.0))
    }
}

/// Canal analógico simulado: valor base por pino + ruído xorshift,
/// sempre dentro de 0–1023.
pub struct SimAnalogInput {
    base: u16,
    state: u32,
}

impl SimAnalogInput {
    pub fn new(pin: u8) -> Self {
        // Bases plausíveis: solo meio úmido, NPK médio, UV baixo
        let base = match pin {
            0 => 600,
            1 => 410,
            _ => 80,
        };
        Self {
            base,
            state: 0x9E37_79B9 ^ u32::from(pin),
        }
    }

    fn next_noise(&mut self) -> i32 {
        // xorshift32
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x % 31) as i32 - 15
    }
}

impl AnalogInput for SimAnalogInput {
    fn read_raw(&mut self) -> u16 {
        let noise = self.next_noise();
        (i32::from(self.base) + noise).clamp(0, i32::from(ADC_MAX)) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_analog_stays_in_adc_range() {
        let mut adc = SimAnalogInput::new(0);
        for _ in 0..1000 {
            assert!(adc.read_raw() <= ADC_MAX);
        }
    }

    #[test]
    fn sim_climate_is_plausible() {
        let mut sensor = SimClimateSensor::probe().unwrap();
        for _ in 0..200 {
            let r = sensor.read().unwrap();
            assert!((10.0..=35.0).contains(&r.temperature_c));
            assert!((20.0..=90.0).contains(&r.humidity_pct));
        }
    }

    #[test]
    fn sim_light_never_negative() {
        let mut sensor = SimLightSensor::probe().unwrap();
        for _ in 0..200 {
            assert!(sensor.read_lux().unwrap() >= 0.0);
        }
    }
}
