//! Enlace de rádio: um canal lógico fixo, half-duplex, melhor esforço.
//!
//! As duas pontas combinam fora de banda o endereço do pipe, a potência
//! e a taxa de dados — configuração fixa, nunca negociada. O papel de
//! escrita expõe só `try_send`; o de escuta, `available` + `receive`.
//! Não há primitiva bloqueante de espera por dado: o Gateway faz poll.
//!
//! Backend de host: pipe de bytes UDP unicast (1 datagrama = 1 frame).
//! Para testes existe o [`MemRadio`], um loopback em memória.

use std::collections::VecDeque;
use std::io;
use std::net::UdpSocket;
use std::sync::{Arc, Mutex};

use crate::codec::FRAME_LEN;
use crate::config::{LinkConfig, RadioConfig};
use tracing::{info, warn};

/// Papel de escrita do enlace.
pub trait RadioTx {
    /// Um envio, melhor esforço. Falha é não-fatal e nunca re-tentada
    /// dentro do mesmo ciclo.
    fn try_send(&mut self, frame: &[u8; FRAME_LEN]) -> io::Result<()>;
}

/// Papel de escuta do enlace.
pub trait RadioRx {
    /// Há frame aguardando leitura?
    fn available(&mut self) -> bool;

    /// Lê um frame cru. Só deve ser chamado após `available()` true.
    fn receive(&mut self) -> io::Result<Vec<u8>>;
}

// ──────────────────────────────────────────────
// Backend UDP
// ──────────────────────────────────────────────

/// Transmissor UDP (Node).
pub struct UdpRadioTx {
    sock: UdpSocket,
    dest: String,
}

impl UdpRadioTx {
    pub fn open(link: &LinkConfig, radio: &RadioConfig) -> io::Result<Self> {
        let bind = if link.bind_ip.is_empty() {
            "0.0.0.0:0".to_string()
        } else {
            format!("{}:0", link.bind_ip)
        };
        let sock = UdpSocket::bind(bind)?;
        let dest = format!("{}:{}", link.dest_ip, link.port);
        info!(
            "Rádio TX → {dest} | pipe \"{}\" | PA {} | {}",
            radio.pipe_address, radio.pa_level, radio.data_rate
        );
        Ok(Self { sock, dest })
    }
}

impl RadioTx for UdpRadioTx {
    fn try_send(&mut self, frame: &[u8; FRAME_LEN]) -> io::Result<()> {
        self.sock.send_to(frame, &self.dest).map(|_| ())
    }
}

/// Receptor UDP (Gateway), socket não-bloqueante.
pub struct UdpRadioRx {
    sock: UdpSocket,
}

impl UdpRadioRx {
    pub fn open(link: &LinkConfig, radio: &RadioConfig) -> io::Result<Self> {
        let sock = UdpSocket::bind(format!("0.0.0.0:{}", link.port))?;
        sock.set_nonblocking(true)?;
        info!(
            "Rádio RX escutando em 0.0.0.0:{} | pipe \"{}\" | PA {} | {}",
            link.port, radio.pipe_address, radio.pa_level, radio.data_rate
        );
        Ok(Self { sock })
    }

    /// Porta efetiva do socket (útil quando configurada como 0).
    pub fn local_port(&self) -> io::Result<u16> {
        self.sock.local_addr().map(|a| a.port())
    }
}

impl RadioRx for UdpRadioRx {
    fn available(&mut self) -> bool {
        let mut probe = [0u8; 1];
        match self.sock.peek_from(&mut probe) {
            Ok(_) => true,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => false,
            Err(e) => {
                warn!("Erro ao sondar rádio: {e}");
                false
            }
        }
    }

    fn receive(&mut self) -> io::Result<Vec<u8>> {
        // Buffer maior que FRAME_LEN de propósito: frames de tamanho
        // errado precisam chegar inteiros ao codec para serem descartados lá.
        let mut buf = [0u8; 64];
        let (size, _addr) = self.sock.recv_from(&mut buf)?;
        Ok(buf[..size].to_vec())
    }
}

// ──────────────────────────────────────────────
// Loopback em memória (testes)
// ──────────────────────────────────────────────

type FrameQueue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// Enlace loopback em memória com as duas pontas desacopladas.
pub struct MemRadio;

impl MemRadio {
    /// Cria um par TX/RX ligado pela mesma fila.
    pub fn pair() -> (MemRadioTx, MemRadioRx) {
        let queue: FrameQueue = Arc::new(Mutex::new(VecDeque::new()));
        (
            MemRadioTx { queue: Arc::clone(&queue) },
            MemRadioRx { queue },
        )
    }
}

pub struct MemRadioTx {
    queue: FrameQueue,
}

impl MemRadioTx {
    /// Injeta um frame cru de qualquer tamanho (simula lixo no ar).
    pub fn inject_raw(&self, data: Vec<u8>) {
        self.queue.lock().unwrap().push_back(data);
    }
}

impl RadioTx for MemRadioTx {
    fn try_send(&mut self, frame: &[u8; FRAME_LEN]) -> io::Result<()> {
        self.queue.lock().unwrap().push_back(frame.to_vec());
        Ok(())
    }
}

pub struct MemRadioRx {
    queue: FrameQueue,
}

impl RadioRx for MemRadioRx {
    fn available(&mut self) -> bool {
        !self.queue.lock().unwrap().is_empty()
    }

    fn receive(&mut self) -> io::Result<Vec<u8>> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "fila vazia"))
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
