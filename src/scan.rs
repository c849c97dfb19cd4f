//! Decoding a QR symbol from a still image.
//!
//! ```rust
//! use qrkit::{encode_raster, scan, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = encode_raster("SHELF-A01", ECLevel::M, 8)?;
//! assert_eq!(scan(&img)?, "SHELF-A01");
//! # Ok(())
//! # }
//! ```

use image::{GenericImageView, Pixel};
use rqrr::PreparedImage;

use crate::common::{QRError, QRResult};

// Light margin added around the input, as a fraction of its longer side. Symbols
// rendered edge to edge have no quiet zone of their own.
const MARGIN_RATIO: u32 = 4;
const MIN_MARGIN: u32 = 8;

// Scan
//------------------------------------------------------------------------------

// Decodes the first QR symbol detected in the image and returns its text
pub fn scan<I>(img: &I) -> QRResult<String>
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let (w, h) = img.dimensions();
    let margin = (w.max(h) / MARGIN_RATIO).max(MIN_MARGIN);
    let (pw, ph) = (w + 2 * margin, h + 2 * margin);

    let mut prepared = PreparedImage::prepare_from_greyscale(pw as usize, ph as usize, |x, y| {
        let (x, y) = (x as u32, y as u32);
        if x < margin || y < margin || x >= w + margin || y >= h + margin {
            return 255;
        }
        img.get_pixel(x - margin, y - margin).to_luma()[0]
    });

    let grids = prepared.detect_grids();
    log::debug!("Detected {} candidate grids in {w}x{h} image", grids.len());

    let Some(grid) = grids.first() else {
        return Err(QRError::SymbolNotFound);
    };
    let (meta, content) = grid.decode().map_err(|e| {
        log::warn!("Failed to decode symbol: {e:?}");
        QRError::InvalidSymbol
    })?;
    log::info!("Decoded version {} symbol: {content:?}", meta.version.0);

    Ok(content)
}
