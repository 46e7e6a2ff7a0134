//! Codec do frame de rádio.
//!
//! Todo frame tem exatamente [`FRAME_LEN`] bytes; frames com qualquer
//! outro tamanho são rejeitados antes de qualquer decodificação. O corpo
//! de campos ([`BODY_LEN`] bytes) é serializado com bincode fixint
//! little-endian, byte a byte idêntico ao struct C original.
//!
//! Dois formatos de fio, ambos de 8 bytes:
//!
//! ```text
//! Legacy:     ┌──────────────────┬─────────┐
//!             │ campos (7 bytes) │ pad (1) │   struct C com padding final
//!             └──────────────────┴─────────┘
//!
//! Versioned:  ┌─────────┬──────────────────┐
//!             │ ver (1) │ campos (7 bytes) │   byte de versão explícito
//!             └─────────┴──────────────────┘
//! ```
//!
//! O formato é configuração fixa compartilhada fora de banda pelas duas
//! pontas, nunca negociado em tempo de execução.

use crate::types::SensorPacket;

/// Tamanho fixo do frame no ar.
pub const FRAME_LEN: usize = 8;

/// Tamanho do corpo de campos serializado.
pub const BODY_LEN: usize = 7;

/// Versão atual do esquema (formato `Versioned`).
pub const WIRE_VERSION: u8 = 1;

/// Formato de framing do pacote no ar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// Layout legado: campos + 1 byte de padding final (ignorado).
    #[default]
    Legacy,
    /// Layout versionado: byte de versão + campos.
    Versioned,
}

impl WireFormat {
    /// Interpreta o valor do `config.toml` ("legacy" | "versioned").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "legacy" => Some(Self::Legacy),
            "versioned" => Some(Self::Versioned),
            _ => None,
        }
    }
}

/// Erros do codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Frame com {0} bytes (esperado {FRAME_LEN})")]
    BadLength(usize),

    #[error("Versão de esquema incompatível: {0} (suportada: {WIRE_VERSION})")]
    VersionMismatch(u8),

    #[error("Erro de serialização: {0}")]
    Encode(String),

    #[error("Erro de deserialização: {0}")]
    Decode(String),
}

/// Codifica um [`SensorPacket`] em um frame de 8 bytes.
pub fn encode_frame(
    packet: &SensorPacket,
    format: WireFormat,
) -> Result<[u8; FRAME_LEN], CodecError> {
    let body = bincode::serialize(packet).map_err(|e| CodecError::Encode(e.to_string()))?;
    debug_assert_eq!(body.len(), BODY_LEN);

    let mut frame = [0u8; FRAME_LEN];
    match format {
        WireFormat::Legacy => {
            frame[..BODY_LEN].copy_from_slice(&body);
            // frame[7] fica em zero (padding final do struct C)
        }
        WireFormat::Versioned => {
            frame[0] = WIRE_VERSION;
            frame[1..].copy_from_slice(&body);
        }
    }
    Ok(frame)
}

/// Decodifica um frame recebido em [`SensorPacket`].
///
/// Reinterpretação crua dos bytes: nenhuma re-checagem semântica de
/// faixa é feita aqui — os clamps vivem só no lado de aquisição.
pub fn decode_frame(data: &[u8], format: WireFormat) -> Result<SensorPacket, CodecError> {
    if data.len() != FRAME_LEN {
        return Err(CodecError::BadLength(data.len()));
    }

    let body = match format {
        WireFormat::Legacy => &data[..BODY_LEN],
        WireFormat::Versioned => {
            let version = data[0];
            if version != WIRE_VERSION {
                return Err(CodecError::VersionMismatch(version));
            }
            &data[1..]
        }
    };

    bincode::deserialize(body).map_err(|e| CodecError::Decode(e.to_string()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_packet() -> SensorPacket {
        SensorPacket {
            temperature: -5,
            humidity: 42,
            light: 515, // 0x0203
            soil: 50,
            npk: 30,
            uv: 146,
        }
    }

    #[test]
    fn roundtrip_legacy() {
        let original = sample_packet();
        let frame = encode_frame(&original, WireFormat::Legacy).unwrap();
        let decoded = decode_frame(&frame, WireFormat::Legacy).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn roundtrip_versioned() {
        let original = sample_packet();
        let frame = encode_frame(&original, WireFormat::Versioned).unwrap();
        let decoded = decode_frame(&frame, WireFormat::Versioned).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn legacy_layout_matches_c_struct() {
        // Offsets do struct C: temp(0) hum(1) light(2..4 LE) soil(4) npk(5) uv(6) pad(7)
        let frame = encode_frame(&sample_packet(), WireFormat::Legacy).unwrap();
        assert_eq!(frame, [0xFB, 42, 0x03, 0x02, 50, 30, 146, 0x00]);
    }

    #[test]
    fn versioned_layout_prefixes_version() {
        let frame = encode_frame(&sample_packet(), WireFormat::Versioned).unwrap();
        assert_eq!(frame[0], WIRE_VERSION);
        assert_eq!(&frame[1..], &[0xFB, 42, 0x03, 0x02, 50, 30, 146]);
    }

    #[test]
    fn rejects_any_length_but_eight() {
        for len in [0usize, 1, 7, 9, 64] {
            let data = vec![0u8; len];
            assert!(
                matches!(
                    decode_frame(&data, WireFormat::Legacy),
                    Err(CodecError::BadLength(l)) if l == len
                ),
                "frame de {len} bytes não deve decodificar"
            );
            assert!(matches!(
                decode_frame(&data, WireFormat::Versioned),
                Err(CodecError::BadLength(_))
            ));
        }
    }

    #[test]
    fn rejects_wrong_version() {
        let mut frame = encode_frame(&sample_packet(), WireFormat::Versioned).unwrap();
        frame[0] = 99;
        assert!(matches!(
            decode_frame(&frame, WireFormat::Versioned),
            Err(CodecError::VersionMismatch(99))
        ));
    }

    #[test]
    fn legacy_pad_byte_is_ignored() {
        let mut frame = encode_frame(&sample_packet(), WireFormat::Legacy).unwrap();
        frame[7] = 0xAA;
        let decoded = decode_frame(&frame, WireFormat::Legacy).unwrap();
        assert_eq!(decoded, sample_packet());
    }

    #[test]
    fn decode_is_raw_reinterpretation() {
        // Valores fora de faixa semântica passam intactos pelo decode
        let frame = [0x80, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let p = decode_frame(&frame, WireFormat::Legacy).unwrap();
        assert_eq!(p.temperature, -128);
        assert_eq!(p.humidity, 255);
        assert_eq!(p.light, 65535);
    }

    #[test]
    fn parse_wire_format() {
        assert_eq!(WireFormat::parse("legacy"), Some(WireFormat::Legacy));
        assert_eq!(WireFormat::parse("versioned"), Some(WireFormat::Versioned));
        assert_eq!(WireFormat::parse("tlv"), None);
    }
}
