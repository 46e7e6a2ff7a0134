//! Aquisição: produz um [`SensorPacket`] completo por ciclo.
//!
//! Clima e luminância são eventos únicos por ciclo; os três canais
//! analógicos passam por uma média móvel de janela limitada (10
//! amostras com 5 ms de espaçamento, média inteira truncada) — o único
//! filtro passa-baixa do sistema.

use std::time::Duration;

use agrolink_core::clock::Clock;
use agrolink_core::config::SensorConfig;
use agrolink_core::types::SensorPacket;

use crate::scale;
use crate::sensors::{AnalogInput, ClimateSensor, LightSensor, SensorError};

/// Média inteira (truncada) de `count` amostras com espaçamento fixo.
///
/// O delay acontece após cada amostra, inclusive a última, como no
/// firmware original.
pub fn sample_averaged<A: AnalogInput>(
    adc: &mut A,
    clock: &dyn Clock,
    count: u32,
    spacing: Duration,
) -> u16 {
    let mut sum: u32 = 0;
    for _ in 0..count {
        sum += u32::from(adc.read_raw());
        clock.sleep(spacing);
    }
    (sum / count.max(1)) as u16
}

/// Ponta sensora: sensores + calibração + relógio.
pub struct Acquisition<C, L, A, K> {
    climate: C,
    light: L,
    soil: A,
    npk: A,
    uv: A,
    cfg: SensorConfig,
    clock: K,
}

impl<C, L, A, K> Acquisition<C, L, A, K>
where
    C: ClimateSensor,
    L: LightSensor,
    A: AnalogInput,
    K: Clock,
{
    pub fn new(climate: C, light: L, soil: A, npk: A, uv: A, cfg: SensorConfig, clock: K) -> Self {
        Self { climate, light, soil, npk, uv, cfg, clock }
    }

    /// Executa um ciclo completo de leitura + escala.
    pub fn acquire(&mut self) -> Result<SensorPacket, SensorError> {
        let climate = self.climate.read()?;
        let lux = self.light.read_lux()?;

        let spacing = Duration::from_millis(self.cfg.sample_spacing_ms);
        let count = self.cfg.sample_count;
        let soil_raw = sample_averaged(&mut self.soil, &self.clock, count, spacing);
        let npk_raw = sample_averaged(&mut self.npk, &self.clock, count, spacing);
        let uv_raw = sample_averaged(&mut self.uv, &self.clock, count, spacing);

        Ok(SensorPacket {
            temperature: scale::temperature_c(climate.temperature_c),
            humidity: scale::humidity_pct(climate.humidity_pct),
            light: scale::light_lux(lux),
            soil: scale::soil_percent(soil_raw, self.cfg.soil_wet, self.cfg.soil_dry),
            npk: scale::npk_percent(npk_raw),
            uv: scale::uv_tenths(uv_raw),
        })
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::ClimateReading;
    use agrolink_core::clock::ManualClock;
    use std::cell::Cell;

    struct FixedClimate {
        t: f32,
        h: f32,
    }

    impl ClimateSensor for FixedClimate {
        fn read(&mut self) -> Result<ClimateReading, SensorError> {
            Ok(ClimateReading { temperature_c: self.t, humidity_pct: self.h })
        }
    }

    struct FixedLight(f32);

    impl LightSensor for FixedLight {
        fn read_lux(&mut self) -> Result<f32, SensorError> {
            Ok(self.0)
        }
    }

    /// ADC que devolve uma sequência fixa e conta as leituras.
    struct SeqAdc {
        values: Vec<u16>,
        idx: Cell<usize>,
    }

    impl SeqAdc {
        fn new(values: Vec<u16>) -> Self {
            Self { values, idx: Cell::new(0) }
        }

        fn constant(v: u16) -> Self {
            Self::new(vec![v])
        }

        fn reads(&self) -> usize {
            self.idx.get()
        }
    }

    impl AnalogInput for SeqAdc {
        fn read_raw(&mut self) -> u16 {
            let i = self.idx.get();
            self.idx.set(i + 1);
            self.values[i % self.values.len()]
        }
    }

    #[test]
    fn averaging_truncates_remainder() {
        let clock = ManualClock::new();
        let mut adc = SeqAdc::new(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]); // soma 45
        let mean = sample_averaged(&mut adc, &clock, 10, Duration::from_millis(5));
        assert_eq!(mean, 4); // 45 / 10 truncado
    }

    #[test]
    fn sampler_issues_ten_spaced_reads() {
        let clock = ManualClock::new();
        let mut adc = SeqAdc::constant(600);
        sample_averaged(&mut adc, &clock, 10, Duration::from_millis(5));
        assert_eq!(adc.reads(), 10);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(5); 10]);
    }

    #[test]
    fn glitched_humidity_is_clamped_in_packet() {
        // Cenário ponta-a-ponta do contrato: 23.7 °C e 105% de umidade
        let clock = ManualClock::new();
        let mut acq = Acquisition::new(
            FixedClimate { t: 23.7, h: 105.0 },
            FixedLight(480.0),
            SeqAdc::constant(600),
            SeqAdc::constant(512),
            SeqAdc::constant(0),
            SensorConfig::default(),
            &clock,
        );

        let packet = acq.acquire().unwrap();
        assert_eq!(packet.temperature, 23);
        assert_eq!(packet.humidity, 100);
        assert_eq!(packet.light, 480);
        assert_eq!(packet.soil, 50);
        assert_eq!(packet.uv, 0);
    }

    #[test]
    fn cycle_samples_three_channels() {
        let clock = ManualClock::new();
        let mut acq = Acquisition::new(
            FixedClimate { t: 20.0, h: 50.0 },
            FixedLight(100.0),
            SeqAdc::constant(600),
            SeqAdc::constant(500),
            SeqAdc::constant(1023),
            SensorConfig::default(),
            &clock,
        );

        let packet = acq.acquire().unwrap();
        // 3 canais × 10 amostras × 5 ms = 150 ms de janela de amostragem
        assert_eq!(clock.total_slept(), Duration::from_millis(150));
        assert_eq!(packet.uv, 250);
    }
}
