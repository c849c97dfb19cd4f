//! Batch generation.
//!
//! Expands a template into payloads and turns every payload into a restyled QR raster.
//!
//! ```rust
//! use qrkit::{BatchBuilder, ECLevel, ModuleStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let items = BatchBuilder::new("SHELF-{A-B}{01-02}")
//!     .ec_level(ECLevel::Q)
//!     .style(ModuleStyle::Rounded)
//!     .build()?;
//!
//! assert_eq!(items.len(), 4);
//! assert_eq!(items[1].data, "SHELF-A02");
//! # Ok(())
//! # }
//! ```

use image::{Rgb, RgbImage};

use crate::{
    common::{validate_payload, ECLevel, QRError, QRResult},
    generate::Generator,
    pattern::Pattern,
    restyle::ModuleStyle,
};

pub const DEFAULT_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub index: usize,
    pub data: String,
    pub image: RgbImage,
}

// Batch builder
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BatchBuilder<'a> {
    template: &'a str,
    generator: Generator,
    limit: usize,
}

impl<'a> BatchBuilder<'a> {
    pub fn new(template: &'a str) -> Self {
        Self { template, generator: Generator::default(), limit: DEFAULT_LIMIT }
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.generator.ec_level(ec_level);
        self
    }

    pub fn module_size(&mut self, px: u32) -> &mut Self {
        self.generator.module_size(px);
        self
    }

    pub fn style(&mut self, style: ModuleStyle) -> &mut Self {
        self.generator.style(style);
        self
    }

    pub fn foreground(&mut self, color: Rgb<u8>) -> &mut Self {
        self.generator.foreground(color);
        self
    }

    pub fn background(&mut self, color: Rgb<u8>) -> &mut Self {
        self.generator.background(color);
        self
    }

    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn metadata(&self) -> String {
        format!("{{ {}, Limit: {} }}", self.generator.fields(), self.limit)
    }
}

impl BatchBuilder<'_> {
    // Expands the template without rendering anything and enforces the item cap
    pub fn plan(&self) -> QRResult<Batch> {
        let pattern = Pattern::parse(self.template);
        match pattern.combinations() {
            Some(0) => {
                log::warn!("Template {:?} expands to no items", self.template);
                return Err(QRError::EmptyBatch);
            }
            Some(n) if n <= self.limit => log::info!("Template expands to {n} items"),
            n => {
                log::warn!("Template expands to {n:?} items, limit is {}", self.limit);
                return Err(QRError::TooManyItems);
            }
        }

        Ok(Batch { pattern, generator: self.generator })
    }

    pub fn build(&self) -> QRResult<Vec<BatchItem>> {
        log::info!("Generating batch {}...", self.metadata());
        let items = self.plan()?.items().collect::<QRResult<Vec<_>>>()?;
        log::info!("Generated {} items", items.len());
        Ok(items)
    }
}


// Batch
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Batch {
    pattern: Pattern,
    generator: Generator,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.pattern.combinations().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Lazily encodes and styles one payload per expanded string
    pub fn items(&self) -> impl Iterator<Item = QRResult<BatchItem>> + '_ {
        let total = self.len();
        self.pattern.iter().enumerate().map(move |(index, data)| {
            log::debug!("Encoding item {}/{total}: {data:?}", index + 1);
            let image = self.generator.generate(&data)?;
            let data = validate_payload(&data)?.to_string();
            Ok(BatchItem { index, data, image })
        })
    }
}

#[cfg(test)]
mod batch_tests {
    use test_case::test_case;

    use super::BatchBuilder;
    use crate::{
        common::{ECLevel, QRError},
        generate::Generator,
        restyle::ModuleStyle,
    };

    #[test_case("{5-1}", QRError::EmptyBatch; "reversed range")]
    #[test_case("{1-501}", QRError::TooManyItems; "over default limit")]
    #[test_case("{0-4294967295}{0-4294967295}{0-4294967295}", QRError::TooManyItems; "overflow")]
    fn test_plan_rejects(template: &str, err: QRError) {
        assert_eq!(BatchBuilder::new(template).plan().unwrap_err(), err);
    }

    #[test]
    fn test_plan_limit_is_inclusive() {
        let batch = BatchBuilder::new("{1-4}").limit(4).plan().unwrap();
        assert_eq!(batch.len(), 4);
        assert!(!batch.is_empty());
        assert_eq!(BatchBuilder::new("{1-4}").limit(3).plan().unwrap_err(), QRError::TooManyItems);
    }

    #[test]
    fn test_items_match_single_generation() {
        let items = BatchBuilder::new("ROOM-{1-2}")
            .ec_level(ECLevel::Q)
            .style(ModuleStyle::Dots)
            .module_size(4)
            .build()
            .unwrap();
        let mut generator = Generator::new();
        generator.ec_level(ECLevel::Q).style(ModuleStyle::Dots).module_size(4);
        for item in &items {
            assert_eq!(item.image, generator.generate(&item.data).unwrap(), "{}", item.data);
        }
    }

    #[test]
    fn test_build_items_in_order() {
        let items = BatchBuilder::new("BIN-{1-2}{x|y}").module_size(3).build().unwrap();
        let data = items.iter().map(|i| i.data.as_str()).collect::<Vec<_>>();
        assert_eq!(data, ["BIN-1x", "BIN-1y", "BIN-2x", "BIN-2y"]);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.index, i);
            assert_eq!(item.image.dimensions(), (21 * 3, 21 * 3));
        }
    }

    #[test]
    fn test_build_rejects_blank_payload() {
        let err = BatchBuilder::new("{a| }").build().unwrap_err();
        assert_eq!(err, QRError::EmptyData);
    }
}
