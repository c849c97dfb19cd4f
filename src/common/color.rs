use image::{Pixel, Rgb};

use super::{QRError, QRResult};

// Red channel intensity below which a pixel counts as a dark module
pub const DARK_THRESHOLD: u8 = 128;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub fn is_dark<P: Pixel<Subpixel = u8>>(px: &P) -> bool {
    px.to_rgb()[0] < DARK_THRESHOLD
}

// Parses `#rrggbb` or `#rgb`. The leading `#` is optional.
pub fn parse_hex_color(s: &str) -> QRResult<Rgb<u8>> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QRError::InvalidColor);
    }

    let channel = |h: &str| u8::from_str_radix(h, 16).or(Err(QRError::InvalidColor));

    match hex.len() {
        6 => Ok(Rgb([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?])),
        3 => {
            let mut rgb = [0; 3];
            for (i, c) in rgb.iter_mut().enumerate() {
                let v = channel(&hex[i..i + 1])?;
                *c = v << 4 | v;
            }
            Ok(Rgb(rgb))
        }
        _ => Err(QRError::InvalidColor),
    }
}
