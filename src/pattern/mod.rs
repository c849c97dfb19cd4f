//! Batch template expansion.
//!
//! A template holds zero or more `{...}` token spans. Each span resolves to a list of values
//! and the template expands to one string per element of the Cartesian product of those
//! lists, leftmost span varying slowest.
//!
//! ```rust
//! use qrkit::pattern::expand;
//!
//! assert_eq!(expand("{1-2}-{A-B}"), ["1-A", "1-B", "2-A", "2-B"]);
//! assert_eq!(expand("box-{01-03}"), ["box-01", "box-02", "box-03"]);
//! assert!(expand("{5-1}").is_empty());
//! ```

mod token;
mod values;

use std::iter::FusedIterator;

pub use token::{tokenize, TokenSpan};
pub use values::Values;

// Pattern
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    template: String,
    spans: Vec<TokenSpan>,
    values: Vec<Values>,
}

impl Pattern {
    pub fn parse(template: &str) -> Self {
        let spans = tokenize(template);
        let values = spans.iter().map(|s| Values::classify(&s.content)).collect::<Vec<_>>();
        log::debug!("Parsed {} token spans from template {template:?}", spans.len());
        Self { template: template.to_string(), spans, values }
    }

    pub fn spans(&self) -> &[TokenSpan] {
        &self.spans
    }

    pub fn values(&self) -> &[Values] {
        &self.values
    }

    // Number of strings the template expands to, None if it overflows usize
    pub fn combinations(&self) -> Option<usize> {
        self.values.iter().try_fold(1usize, |acc, v| acc.checked_mul(v.len()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().any(Values::is_empty)
    }

    pub fn iter(&self) -> Expansion<'_> {
        let cursor = if self.is_empty() { None } else { Some(vec![0; self.spans.len()]) };
        Expansion { pattern: self, cursor, emitted: 0 }
    }

    // Substitutes right to left so the span offsets stay valid
    fn render(&self, picks: &[usize]) -> String {
        let mut out = self.template.clone();
        for ((span, vals), &i) in self.spans.iter().zip(&self.values).zip(picks).rev() {
            if let Some(v) = vals.get(i) {
                out.replace_range(span.index..span.end(), &v);
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = String;
    type IntoIter = Expansion<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Expansion iterator
//------------------------------------------------------------------------------

// Odometer over the value lists. The last span is the fastest digit.
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    pattern: &'a Pattern,
    cursor: Option<Vec<usize>>,
    emitted: usize,
}

impl Expansion<'_> {
    fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        for (pos, vals) in cursor.iter_mut().zip(&self.pattern.values).rev() {
            *pos += 1;
            if *pos < vals.len() {
                return;
            }
            *pos = 0;
        }
        self.cursor = None;
    }
}

impl Iterator for Expansion<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.pattern.render(self.cursor.as_deref()?);
        self.emitted += 1;
        self.advance();
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.is_none() {
            return (0, Some(0));
        }
        match self.pattern.combinations() {
            Some(total) => (total - self.emitted, Some(total - self.emitted)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Expansion<'_> {}

pub fn expand(template: &str) -> Vec<String> {
    Pattern::parse(template).iter().collect()
}
