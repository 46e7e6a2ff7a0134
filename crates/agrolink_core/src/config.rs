//! Configuração unificada via TOML.
//!
//! Um único `config.toml` cobre as duas pontas. Todas as constantes do
//! hardware original viram campos ajustáveis aqui: pinos CE/CSN e
//! analógicos, calibração do solo, credenciais WiFi, endpoint da nuvem,
//! endereço do pipe, cadências e limites de reconexão.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::codec::WireFormat;

/// Configuração do rádio nRF24 (fixa, combinada fora de banda).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Pino CE
    pub ce_pin: u8,
    /// Pino CSN
    pub csn_pin: u8,
    /// Potência: "min", "low", "high", "max"
    pub pa_level: String,
    /// Taxa de dados: "250kbps", "1mbps", "2mbps"
    pub data_rate: String,
    /// Token de endereço do pipe (5–6 bytes, idêntico nas duas pontas)
    pub pipe_address: String,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            ce_pin: 7,
            csn_pin: 8,
            pa_level: "low".into(),
            data_rate: "250kbps".into(),
            pipe_address: "NODE1".into(),
        }
    }
}

/// Enlace UDP que faz o papel do canal de rádio no host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// IP local para bind (vazio = auto; só o Node usa)
    pub bind_ip: String,
    /// IP de destino (só o Node usa)
    pub dest_ip: String,
    /// Porta UDP do canal
    pub port: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind_ip: String::new(),
            dest_ip: "127.0.0.1".into(),
            port: 5008,
        }
    }
}

/// Pinos e calibração dos sensores do Node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Backend: "sim" (host) — reservado para backends de hardware
    pub backend: String,
    /// Canal analógico do solo (A0)
    pub soil_pin: u8,
    /// Canal analógico do NPK (A1)
    pub npk_pin: u8,
    /// Canal analógico do UV (A2)
    pub uv_pin: u8,
    /// ADC cru com solo saturado de água
    pub soil_wet: u16,
    /// ADC cru com solo seco
    pub soil_dry: u16,
    /// Amostras por canal analógico em cada ciclo
    pub sample_count: u32,
    /// Espaçamento entre amostras (ms)
    pub sample_spacing_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            backend: "sim".into(),
            soil_pin: 0,
            npk_pin: 1,
            uv_pin: 2,
            soil_wet: 350,
            soil_dry: 850,
            sample_count: 10,
            sample_spacing_ms: 5,
        }
    }
}

/// Configuração do Node (ponta sensora).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Intervalo entre ciclos de aquisição (segundos)
    pub cycle_secs: f64,
    pub link: LinkConfig,
    pub radio: RadioConfig,
    pub sensors: SensorConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            cycle_secs: 10.0,
            link: LinkConfig::default(),
            radio: RadioConfig::default(),
            sensors: SensorConfig::default(),
        }
    }
}

/// Credenciais de WiFi (preservadas como superfície de configuração;
/// o backend de uplink do host só sonda conectividade).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
}

/// Endpoint REST de ingestão (estilo Supabase).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// URL completa da tabela de ingestão
    pub endpoint_url: String,
    /// Chave usada nos headers `apikey` e `Authorization: Bearer`
    pub api_key: String,
    /// Identidade fixa do nó no documento JSON
    pub node_name: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://example.supabase.co/rest/v1/sensor_data".into(),
            api_key: String::new(),
            node_name: "Node1".into(),
        }
    }
}

/// Configuração do Gateway (ponta de encaminhamento).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub link: LinkConfig,
    pub radio: RadioConfig,
    pub wifi: WifiConfig,
    pub cloud: CloudConfig,
    /// Pausa fixa após cada encaminhamento (ms)
    pub pacing_ms: u64,
    /// Tentativas de reassociação do uplink
    pub reconnect_attempts: u32,
    /// Espaçamento entre tentativas (ms)
    pub reconnect_spacing_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            radio: RadioConfig {
                ce_pin: 4,
                csn_pin: 5,
                ..RadioConfig::default()
            },
            wifi: WifiConfig::default(),
            cloud: CloudConfig::default(),
            pacing_ms: 500,
            reconnect_attempts: 30,
            reconnect_spacing_ms: 500,
        }
    }
}

/// Configuração raiz (unifica Node e Gateway).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Formato de fio: "legacy" ou "versioned" (idêntico nas duas pontas)
    pub wire_format: String,
    pub node: NodeConfig,
    pub gateway: GatewayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wire_format: "legacy".into(),
            node: NodeConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Formato de fio configurado.
    pub fn wire_format(&self) -> Option<WireFormat> {
        WireFormat::parse(&self.wire_format)
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.wire_format().is_none() {
            errors.push(format!(
                "wire_format inválido: \"{}\" (\"legacy\" ou \"versioned\")",
                self.wire_format
            ));
        }
        if self.node.link.port == 0 || self.gateway.link.port == 0 {
            errors.push("Porta do enlace não pode ser 0".into());
        }
        if self.node.cycle_secs < 1.0 || self.node.cycle_secs > 3600.0 {
            errors.push(format!(
                "Intervalo de ciclo inválido: {} (1–3600 s)",
                self.node.cycle_secs
            ));
        }
        for radio in [&self.node.radio, &self.gateway.radio] {
            let len = radio.pipe_address.len();
            if !(5..=6).contains(&len) {
                errors.push(format!(
                    "Endereço de pipe \"{}\" deve ter 5–6 bytes",
                    radio.pipe_address
                ));
            }
        }
        if self.node.radio.pipe_address != self.gateway.radio.pipe_address {
            errors.push("Endereço de pipe difere entre Node e Gateway".into());
        }
        let sensors = &self.node.sensors;
        if sensors.sample_count == 0 {
            errors.push("sample_count não pode ser 0".into());
        }
        if sensors.soil_wet >= sensors.soil_dry {
            errors.push(format!(
                "Calibração do solo invertida: wet={} deve ser < dry={}",
                sensors.soil_wet, sensors.soil_dry
            ));
        }
        if self.gateway.cloud.endpoint_url.is_empty() {
            errors.push("endpoint_url da nuvem não pode ser vazio".into());
        }
        if self.gateway.reconnect_attempts == 0 {
            errors.push("reconnect_attempts não pode ser 0".into());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn default_matches_original_constants() {
        let config = AppConfig::default();
        assert_eq!(config.node.sensors.soil_wet, 350);
        assert_eq!(config.node.sensors.soil_dry, 850);
        assert_eq!(config.node.radio.pipe_address, "NODE1");
        assert_eq!(config.node.cycle_secs, 10.0);
        assert_eq!(config.gateway.pacing_ms, 500);
        assert_eq!(config.gateway.reconnect_attempts, 30);
        assert_eq!(config.gateway.reconnect_spacing_ms, 500);
        assert_eq!(config.gateway.cloud.node_name, "Node1");
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.node.link.port, parsed.node.link.port);
        assert_eq!(config.gateway.cloud.node_name, parsed.gateway.cloud.node_name);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
wire_format = "versioned"

[node.sensors]
soil_wet = 300
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.wire_format(), Some(WireFormat::Versioned));
        assert_eq!(config.node.sensors.soil_wet, 300);
        // Outros campos devem ter valor padrão
        assert_eq!(config.node.sensors.soil_dry, 850);
        assert_eq!(config.gateway.pacing_ms, 500);
    }

    #[test]
    fn rejects_mismatched_pipe() {
        let mut config = AppConfig::default();
        config.gateway.radio.pipe_address = "NODE2".into();
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn rejects_inverted_soil_calibration() {
        let mut config = AppConfig::default();
        config.node.sensors.soil_wet = 900;
        assert!(config.validate().iter().any(|e| e.contains("Calibração")));
    }
}
