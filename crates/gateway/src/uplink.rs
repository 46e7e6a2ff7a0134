//! Associação do uplink antes de cada submissão.
//!
//! No firmware original isto é `WiFi.status()` + uma janela limitada de
//! reconexão. No host, o papel vira uma trait: `is_up` consulta o
//! estado, `reconnect` faz UMA tentativa — o laço limitado (30×500 ms)
//! vive no forwarder.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

/// Associação do enlace de subida.
pub trait Uplink {
    /// O uplink está associado agora?
    fn is_up(&mut self) -> bool;

    /// Uma tentativa de reassociação. `true` se o uplink voltou.
    fn reconnect(&mut self) -> bool;
}

/// Backend de host: sonda alcançabilidade TCP do host do endpoint.
pub struct TcpProbeUplink {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbeUplink {
    /// Extrai host/porta da URL do endpoint de ingestão.
    pub fn from_endpoint(endpoint_url: &str) -> Result<Self, String> {
        let url = reqwest::Url::parse(endpoint_url).map_err(|e| e.to_string())?;
        let host = url
            .host_str()
            .ok_or_else(|| format!("URL sem host: {endpoint_url}"))?
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| format!("URL sem porta conhecida: {endpoint_url}"))?;
        Ok(Self {
            host,
            port,
            timeout: Duration::from_millis(500),
        })
    }

    fn probe(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(a) => a,
            Err(e) => {
                debug!("Resolução de {} falhou: {e}", self.host);
                return false;
            }
        };
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.timeout).is_ok() {
                return true;
            }
        }
        false
    }
}

impl Uplink for TcpProbeUplink {
    fn is_up(&mut self) -> bool {
        self.probe()
    }

    fn reconnect(&mut self) -> bool {
        self.probe()
    }
}
