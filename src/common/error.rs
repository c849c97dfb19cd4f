use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Payload
    EmptyData,
    DataTooLong,
    InvalidECLevel,
    InvalidColor,
    InvalidChar,

    // Scan
    SymbolNotFound,
    InvalidSymbol,

    // Batch
    EmptyBatch,
    TooManyItems,

    // Session
    EmptyDatabase,
    UnknownDatabase,
    InvalidSession,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            // Payload
            Self::EmptyData => "Empty data",
            Self::DataTooLong => "Data too long",
            Self::InvalidECLevel => "Invalid error correction level",
            Self::InvalidColor => "Invalid color",
            Self::InvalidChar => "Invalid character",

            // Scan
            Self::SymbolNotFound => "No QR symbol found in image",
            Self::InvalidSymbol => "QR symbol could not be decoded",

            // Batch
            Self::EmptyBatch => "Template expands to no items",
            Self::TooManyItems => "Template expands to more items than the limit",

            // Session
            Self::EmptyDatabase => "No valid records found",
            Self::UnknownDatabase => "Unknown database",
            Self::InvalidSession => "Invalid session data",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
