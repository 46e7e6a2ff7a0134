//! Documento JSON e submissão HTTP ao endpoint de ingestão.
//!
//! Uma submissão por pacote, nunca re-tentada, nunca persistida. O
//! resultado (status ou falha de transporte) só vai para o log.

use agrolink_core::config::CloudConfig;
use agrolink_core::types::SensorPacket;
use serde::Serialize;
use tracing::info;

/// Documento enviado à nuvem. A ordem dos campos é a do contrato REST.
#[derive(Debug, Clone, Serialize)]
pub struct CloudRecord<'a> {
    pub node_name: &'a str,
    pub temperature: i8,
    pub humidity: u8,
    pub light: u16,
    pub soil_moisture: u8,
    pub npk: u8,
    /// Float com uma casa decimal (byte em décimos ÷ 10)
    pub uv_index: f64,
}

impl<'a> CloudRecord<'a> {
    pub fn from_packet(node_name: &'a str, packet: &SensorPacket) -> Self {
        Self {
            node_name,
            temperature: packet.temperature,
            humidity: packet.humidity,
            light: packet.light,
            soil_moisture: packet.soil,
            npk: packet.npk,
            uv_index: packet.uv_index(),
        }
    }

    pub fn to_json(&self) -> Result<String, CloudError> {
        serde_json::to_string(self).map_err(|e| CloudError::Encode(e.to_string()))
    }
}

/// Resposta crua da nuvem (status + corpo, só para log).
#[derive(Debug, Clone)]
pub struct CloudResponse {
    pub status: u16,
    pub body: String,
}

/// Erros do caminho de submissão.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("Erro ao montar JSON: {0}")]
    Encode(String),

    #[error("Falha de transporte HTTP: {0}")]
    Transport(String),
}

/// Destino de submissão — mockável nos testes do forwarder.
pub trait CloudSink {
    /// Exatamente um POST por chamada.
    fn post_json(&self, body: &str) -> Result<CloudResponse, CloudError>;
}

/// Sink real: POST com `Content-Type`, `apikey` e `Authorization: Bearer`.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpSink {
    pub fn new(cfg: &CloudConfig) -> Self {
        info!("Endpoint de nuvem: {}", cfg.endpoint_url);
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: cfg.endpoint_url.clone(),
            api_key: cfg.api_key.clone(),
        }
    }
}

impl CloudSink for HttpSink {
    fn post_json(&self, body: &str) -> Result<CloudResponse, CloudError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("apikey", &self.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .body(body.to_string())
            .send()
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok(CloudResponse { status, body })
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_has_contract_keys_in_order() {
        let packet = SensorPacket {
            temperature: 23,
            humidity: 100,
            light: 512,
            soil: 50,
            npk: 30,
            uv: 250,
        };
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"node_name":"Node1","temperature":23,"humidity":100,"light":512,"soil_moisture":50,"npk":30,"uv_index":25.0}"#
        );
    }

    #[test]
    fn clamped_glitch_fields_render_as_ints() {
        // 23.7 °C / 105% já chegam quantizados do Node: 23 / 100
        let packet = SensorPacket {
            temperature: 23,
            humidity: 100,
            ..Default::default()
        };
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert!(json.contains(r#""temperature":23,"humidity":100"#));
    }

    #[test]
    fn uv_renders_one_decimal() {
        let mut packet = SensorPacket::default();

        packet.uv = 0;
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert!(json.contains(r#""uv_index":0.0"#));

        packet.uv = 3;
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert!(json.contains(r#""uv_index":0.3"#));

        packet.uv = 250;
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert!(json.contains(r#""uv_index":25.0"#));
    }

    #[test]
    fn negative_temperature_renders_signed() {
        let packet = SensorPacket { temperature: -8, ..Default::default() };
        let json = CloudRecord::from_packet("Node1", &packet).to_json().unwrap();
        assert!(json.contains(r#""temperature":-8"#));
    }
}
