//! Module restyling.
//!
//! Reconstructs the module grid of a rendered two colour QR raster and draws it again with
//! dot or rounded modules. The three finder patterns always stay plain squares so decoders
//! can still locate the symbol.
//!
//! ```rust
//! use image::{GrayImage, Luma};
//! use qrkit::restyle::{restyle, ModuleStyle};
//! use qrkit::{BLACK, WHITE};
//!
//! let src = GrayImage::from_pixel(210, 210, Luma([255]));
//! let out = restyle(&src, ModuleStyle::Dots, BLACK, WHITE);
//! assert_eq!(out.dimensions(), (210, 210));
//! ```

mod draw;
mod grid;

use std::{convert::Infallible, fmt::Display, str::FromStr};

use image::{GenericImageView, Pixel, Rgb, RgbImage};

pub use draw::Draw;
pub use grid::{ModuleGrid, FINDER_SIZE};

use crate::common::{BLACK, WHITE};

// Dot radius as a share of the cell size
pub const DOT_RADIUS: f64 = 0.45;
// Rounded module inset on each side and corner radius, as shares of the cell size
pub const ROUNDED_INSET: f64 = 0.05;
pub const ROUNDED_RADIUS: f64 = 0.2;

// Module style
//------------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ModuleStyle {
    #[default]
    Square,
    Dots,
    Rounded,
}

// Unrecognised names fall back to plain squares
impl FromStr for ModuleStyle {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let style = match s.trim().to_ascii_lowercase().as_str() {
            "dots" => Self::Dots,
            "rounded" => Self::Rounded,
            _ => Self::Square,
        };
        Ok(style)
    }
}

impl From<&str> for ModuleStyle {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(style) => style,
            Err(never) => match never {},
        }
    }
}

impl Display for ModuleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Square => "square",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
        };
        f.write_str(name)
    }
}

// Render stats
//------------------------------------------------------------------------------

// Dark cells drawn as dots or rounded squares, and dark cells drawn as plain squares
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RenderStats {
    pub styled: usize,
    pub plain: usize,
}

// Restyler
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Restyler {
    style: ModuleStyle,
    fg: Rgb<u8>,
    bg: Rgb<u8>,
}

impl Default for Restyler {
    fn default() -> Self {
        Self { style: ModuleStyle::Square, fg: BLACK, bg: WHITE }
    }
}

impl Restyler {
    pub fn new(style: ModuleStyle) -> Self {
        Self { style, ..Self::default() }
    }

    pub fn style(&mut self, style: ModuleStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn foreground(&mut self, color: Rgb<u8>) -> &mut Self {
        self.fg = color;
        self
    }

    pub fn background(&mut self, color: Rgb<u8>) -> &mut Self {
        self.bg = color;
        self
    }

    pub fn get_style(&self) -> ModuleStyle {
        self.style
    }

    pub fn render(&self, grid: &ModuleGrid, w: u32, h: u32) -> (RgbImage, RenderStats) {
        let mut canvas = RgbImage::from_pixel(w, h, self.bg);
        let mut stats = RenderStats::default();
        let cell = grid.cell_size();

        for (r, c, dark) in grid.cells() {
            if !dark {
                continue;
            }

            let (x, y) = (c as f64 * cell, r as f64 * cell);
            if grid.is_finder(r, c) {
                canvas.fill_rect(x, y, cell, cell, self.fg);
                stats.plain += 1;
                continue;
            }

            match self.style {
                ModuleStyle::Dots => {
                    let half = cell / 2.0;
                    canvas.fill_circle(x + half, y + half, DOT_RADIUS * cell, self.fg);
                    stats.styled += 1;
                }
                ModuleStyle::Rounded => {
                    let inset = ROUNDED_INSET * cell;
                    let side = cell - 2.0 * inset;
                    let radius = ROUNDED_RADIUS * cell;
                    canvas.fill_rounded_rect(x + inset, y + inset, side, side, radius, self.fg);
                    stats.styled += 1;
                }
                ModuleStyle::Square => {
                    canvas.fill_rect(x, y, cell, cell, self.fg);
                    stats.plain += 1;
                }
            }
        }

        log::debug!(
            "Rendered {}x{} grid as {}: {} styled, {} plain",
            grid.size(),
            grid.size(),
            self.style,
            stats.styled,
            stats.plain
        );
        (canvas, stats)
    }

    // Infers the grid from the raster and renders it again at the same dimensions
    pub fn restyle<I>(&self, img: &I) -> RgbImage
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (w, h) = img.dimensions();
        let grid = ModuleGrid::infer(img);
        self.render(&grid, w, h).0
    }
}

pub fn restyle<I>(img: &I, style: ModuleStyle, fg: Rgb<u8>, bg: Rgb<u8>) -> RgbImage
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    Restyler::new(style).foreground(fg).background(bg).restyle(img)
}
