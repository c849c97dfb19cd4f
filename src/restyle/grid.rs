use image::{GenericImageView, Pixel};

use crate::common::is_dark;

// Side of a finder pattern in modules
pub const FINDER_SIZE: usize = 7;

// Smallest symbol width in modules, used when the scanline shows no transition
pub const FALLBACK_MODULES: f64 = 25.0;

// Module grid
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGrid {
    size: usize,
    // Pixel pitch of one module, not necessarily integral
    cell: f64,
    modules: Vec<bool>,
}

impl ModuleGrid {
    pub fn new(size: usize, cell: f64) -> Self {
        Self { size, cell, modules: vec![false; size * size] }
    }

    pub fn from_modules(size: usize, cell: f64, modules: Vec<bool>) -> Self {
        debug_assert!(
            modules.len() == size * size,
            "Module count {} doesn't match grid size {size}",
            modules.len()
        );
        Self { size, cell, modules }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.size && c < self.size, "Cell ({r}, {c}) out of bounds");
        self.modules[r * self.size + c]
    }

    pub fn set(&mut self, r: usize, c: usize, dark: bool) {
        debug_assert!(r < self.size && c < self.size, "Cell ({r}, {c}) out of bounds");
        self.modules[r * self.size + c] = dark;
    }

    // Top left, top right and bottom left only. Bottom right carries no finder.
    pub fn is_finder(&self, r: usize, c: usize) -> bool {
        let near_end = |i: usize| i + FINDER_SIZE >= self.size;
        (r < FINDER_SIZE && c < FINDER_SIZE)
            || (r < FINDER_SIZE && near_end(c))
            || (near_end(r) && c < FINDER_SIZE)
    }

    pub fn count_dark(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    pub fn count_dark_outside_finders(&self) -> usize {
        self.cells().filter(|&(r, c, dark)| dark && !self.is_finder(r, c)).count()
    }

    // (row, col, dark) in row major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.modules.iter().enumerate().map(|(i, &m)| (i / self.size, i % self.size, m))
    }
}

// Grid inference
//------------------------------------------------------------------------------
// Steps:
// 1. Walks the middle row and records the length of every run closed by a dark/light flip
// 2. Takes the shortest run as the module pitch. Without any flip the pitch is width / 25
// 3. Grid size is width / pitch rounded, cell size is width / grid size
// 4. Samples the centre pixel of every cell. Centres outside the raster read light
// Note: The shortest run is a heuristic. A middle row without any single module run
// misestimates the grid and the result is visually wrong, but never an error
//------------------------------------------------------------------------------

impl ModuleGrid {
    pub fn estimate_module_size<I>(img: &I) -> f64
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (w, h) = img.dimensions();
        let fallback = w as f64 / FALLBACK_MODULES;
        if w == 0 || h == 0 {
            return fallback;
        }

        let y = h / 2;
        let mut runs = Vec::new();
        let mut last = is_dark(&img.get_pixel(0, y));
        let mut run = 0u32;
        for x in 0..w {
            let dark = is_dark(&img.get_pixel(x, y));
            if dark == last {
                run += 1;
            } else {
                runs.push(run);
                run = 1;
                last = dark;
            }
        }

        runs.into_iter().min().map_or(fallback, f64::from)
    }

    pub fn infer<I>(img: &I) -> Self
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Self::new(0, 0.0);
        }

        let n = w as f64;
        let module = Self::estimate_module_size(img);
        let size = ((n / module).round() as usize).max(1);
        let cell = n / size as f64;
        log::debug!("Estimated module size {module}px, grid {size}x{size}, cell {cell:.3}px");

        let mut grid = Self::new(size, cell);
        for r in 0..size {
            for c in 0..size {
                let cx = (c as f64 * cell + cell / 2.0).floor();
                let cy = (r as f64 * cell + cell / 2.0).floor();
                if cx < 0.0 || cy < 0.0 || cx >= w as f64 || cy >= h as f64 {
                    continue;
                }
                grid.set(r, c, is_dark(&img.get_pixel(cx as u32, cy as u32)));
            }
        }
        grid
    }
}


#[cfg(test)]
pub(crate) use grid_tests::sample_grid;
