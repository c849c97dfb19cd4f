use std::{fmt::Display, str::FromStr};

use super::{QRError, QRResult};

// Largest payload, in characters, accepted for a single symbol
pub const MAX_PAYLOAD_CHARS: usize = 2953;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ECLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> QRResult<Self> {
        match s.trim() {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<ECLevel> for qrcode::EcLevel {
    fn from(ecl: ECLevel) -> Self {
        match ecl {
            ECLevel::L => Self::L,
            ECLevel::M => Self::M,
            ECLevel::Q => Self::Q,
            ECLevel::H => Self::H,
        }
    }
}

// Payload
//------------------------------------------------------------------------------

// Trims the payload and checks it against the single symbol limit
pub fn validate_payload(data: &str) -> QRResult<&str> {
    let data = data.trim();
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }
    if data.chars().count() > MAX_PAYLOAD_CHARS {
        return Err(QRError::DataTooLong);
    }
    Ok(data)
}
