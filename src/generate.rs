//! Single code generation.
//!
//! ```rust
//! use qrkit::{ECLevel, Generator, ModuleStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = Generator::new()
//!     .ec_level(ECLevel::H)
//!     .style(ModuleStyle::Dots)
//!     .foreground(qrkit::parse_hex_color("#1e3a8a")?)
//!     .generate("  https://example.com  ")?;
//!
//! assert_eq!(img.dimensions(), (29 * 10, 29 * 10));
//! # Ok(())
//! # }
//! ```

use image::{GrayImage, Luma, Rgb, RgbImage};
use qrcode::{types::QrError, Color, QrCode};

use crate::{
    common::{validate_payload, ECLevel, QRError, QRResult},
    restyle::{ModuleGrid, ModuleStyle, Restyler},
};

pub const DEFAULT_MODULE_SIZE: u32 = 10;

// Generator
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Generator {
    ec_level: ECLevel,
    module_sz: u32,
    restyler: Restyler,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::M,
            module_sz: DEFAULT_MODULE_SIZE,
            restyler: Restyler::default(),
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn module_size(&mut self, px: u32) -> &mut Self {
        debug_assert!(px > 0, "Module size must be at least one pixel");
        self.module_sz = px.max(1);
        self
    }

    pub fn style(&mut self, style: ModuleStyle) -> &mut Self {
        self.restyler.style(style);
        self
    }

    pub fn foreground(&mut self, color: Rgb<u8>) -> &mut Self {
        self.restyler.foreground(color);
        self
    }

    pub fn background(&mut self, color: Rgb<u8>) -> &mut Self {
        self.restyler.background(color);
        self
    }

    pub fn metadata(&self) -> String {
        format!("{{ {} }}", self.fields())
    }

    pub(crate) fn fields(&self) -> String {
        format!(
            "Ec level: {:?}, Style: {}, Module size: {}",
            self.ec_level,
            self.restyler.get_style(),
            self.module_sz
        )
    }

    // Trims and validates the payload, then draws the encoder's modules directly so no
    // grid inference is involved
    pub fn generate(&self, data: &str) -> QRResult<RgbImage> {
        let payload = validate_payload(data)?;
        let grid = encode_grid(payload, self.ec_level, self.module_sz)?;
        let px = grid.size() as u32 * self.module_sz;
        log::debug!("Generating {}x{} code {}", grid.size(), grid.size(), self.metadata());
        Ok(self.restyler.render(&grid, px, px).0)
    }
}


// Encoder
//------------------------------------------------------------------------------

fn encode_modules(data: &str, ec_level: ECLevel) -> QRResult<(usize, Vec<bool>)> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), ec_level.into())
        .map_err(|e| match e {
            QrError::DataTooLong => QRError::DataTooLong,
            _ => QRError::InvalidChar,
        })?;
    let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
    Ok((code.width(), modules))
}

pub fn encode_grid(data: &str, ec_level: ECLevel, module_sz: u32) -> QRResult<ModuleGrid> {
    let (w, modules) = encode_modules(data, ec_level)?;
    Ok(ModuleGrid::from_modules(w, module_sz as f64, modules))
}

// Renders the symbol black on white without quiet zone, `module_sz` pixels per module
pub fn encode_raster(data: &str, ec_level: ECLevel, module_sz: u32) -> QRResult<GrayImage> {
    let (w, modules) = encode_modules(data, ec_level)?;
    let qr_sz = w as u32 * module_sz;

    let mut canvas = GrayImage::new(qr_sz, qr_sz);
    for i in 0..qr_sz {
        for j in 0..qr_sz {
            let r = (i / module_sz) as usize;
            let c = (j / module_sz) as usize;

            let pixel = if modules[r * w + c] { Luma([0]) } else { Luma([255]) };
            canvas.put_pixel(j, i, pixel);
        }
    }

    Ok(canvas)
}
