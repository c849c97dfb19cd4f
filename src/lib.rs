//! # qrkit
//!
//! Batch QR generation and module restyling.
//!
//! ## Features
//!
//! - **Template expansion**: `{01-20}`, `{A-F}` and `{red|green|blue}` tokens expand into
//!   every combination, leftmost token varying slowest
//! - **Module restyling**: infers the module grid of a rendered QR raster and draws it again
//!   with dots or rounded squares, keeping the finder patterns plain
//! - **Generation**: single codes with error correction level, colours and module style
//! - **Batch generation**: template to payloads to encoded, restyled rasters with an item cap
//! - **Scanning**: decodes a QR symbol from a still image
//! - **Session context**: history, scan history and searchable item databases, persisted as
//!   one JSON document
//!
//! ## Quick Start
//!
//! ### Expanding a template
//!
//! ```rust
//! use qrkit::pattern::expand;
//!
//! assert_eq!(expand("{1-3}-{A-B}"), ["1-A", "1-B", "2-A", "2-B", "3-A", "3-B"]);
//! ```
//!
//! ### Restyling a rendered code
//!
//! ```rust
//! use qrkit::{encode_raster, restyle, ECLevel, ModuleStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let src = encode_raster("https://example.com", ECLevel::M, 10)?;
//! let fg = qrkit::parse_hex_color("#1e3a8a")?;
//! let img = restyle(&src, ModuleStyle::Dots, fg, qrkit::WHITE);
//! assert_eq!(img.dimensions(), src.dimensions());
//! # Ok(())
//! # }
//! ```
//!
//! ### Batch generation
//!
//! ```rust
//! use qrkit::{BatchBuilder, ModuleStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let items = BatchBuilder::new("ROOM-{1-3}").style(ModuleStyle::Rounded).limit(10).build()?;
//! assert_eq!(items.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub(crate) mod common;
pub mod generate;
pub mod pattern;
pub mod restyle;
pub mod scan;
pub mod session;

pub use batch::{Batch, BatchBuilder, BatchItem};
pub use common::{
    parse_hex_color, validate_payload, ECLevel, QRError, QRResult, BLACK, MAX_PAYLOAD_CHARS,
    WHITE,
};
pub use pattern::{expand, Pattern};
pub use generate::{encode_grid, encode_raster, Generator};
pub use restyle::{restyle, ModuleGrid, ModuleStyle, RenderStats, Restyler};
pub use scan::scan;
pub use session::{Database, History, Record, Session, Theme};
