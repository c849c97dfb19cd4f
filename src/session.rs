//! Session context: generation and scan history, loaded item databases and UI theme.
//!
//! The whole context serialises to a single JSON document so the caller decides where it
//! lives.

use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use image::{GenericImageView, Pixel, RgbImage};
use serde::{Deserialize, Serialize};

use crate::{
    common::{validate_payload, QRError, QRResult},
    generate::Generator,
    scan::scan,
};

pub const HISTORY_CAP: usize = 20;
pub const SEARCH_CAP: usize = 20;

// History
//------------------------------------------------------------------------------

// Most recent first, without duplicates
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<String>);

impl History {
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        self.0.retain(|e| *e != entry);
        self.0.insert(0, entry);
        self.0.truncate(HISTORY_CAP);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn latest(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn recent(&self, n: usize) -> &[String] {
        &self.0[..n.min(self.0.len())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Record
//------------------------------------------------------------------------------

// Field names tried in order when mapping a loosely shaped record
const LABEL_FIELDS: [&str; 3] = ["label", "name", "title"];
const ID_FIELDS: [&str; 2] = ["id", "code"];
const DISPLAY_FIELDS: [&str; 3] = ["displayText", "display_text", "description"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub label: String,
    pub id: String,
    #[serde(default)]
    pub display_text: String,
}

impl Record {
    pub fn new(label: &str, id: &str, display_text: &str) -> Self {
        Self {
            label: label.to_string(),
            id: id.to_string(),
            display_text: display_text.to_string(),
        }
    }

    // First non-blank value per field wins. Records without label or id are dropped.
    pub fn from_fields(fields: &HashMap<String, String>) -> Option<Self> {
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| fields.get(*k))
                .map(|v| v.trim())
                .find(|v| !v.is_empty())
                .unwrap_or_default()
        };

        let rec = Self::new(pick(&LABEL_FIELDS), pick(&ID_FIELDS), pick(&DISPLAY_FIELDS));
        if rec.label.is_empty() || rec.id.is_empty() {
            return None;
        }
        Some(rec)
    }

    // `query` must already be lowercase
    fn matches(&self, query: &str) -> bool {
        [&self.label, &self.id, &self.display_text]
            .iter()
            .any(|f| f.to_lowercase().contains(query))
    }
}

// Database
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub records: Vec<Record>,
    // Seconds since unix epoch
    pub created: u64,
}

impl Database {
    pub fn rows(&self) -> usize {
        self.records.len()
    }
}

// Theme
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Session
//------------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub history: History,
    pub scan_history: History,
    pub theme: Theme,
    databases: Vec<Database>,
    active: Option<String>,
    next_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    pub fn database(&self, id: &str) -> Option<&Database> {
        self.databases.iter().find(|d| d.id == id)
    }

    pub fn active_database(&self) -> Option<&Database> {
        self.database(self.active.as_deref()?)
    }

    // Registers the records as a new database and makes it the active one
    pub fn add_database(&mut self, name: &str, records: Vec<Record>) -> QRResult<String> {
        if records.is_empty() {
            return Err(QRError::EmptyDatabase);
        }

        let id = self.fresh_id();
        let created = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
        log::info!("Loaded {} records into database {name:?} ({id})", records.len());

        self.databases.push(Database { id: id.clone(), name: name.to_string(), records, created });
        self.active = Some(id.clone());
        Ok(id)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = format!("db{:04}", self.next_id);
            self.next_id += 1;
            if self.database(&id).is_none() {
                return id;
            }
        }
    }

    pub fn activate(&mut self, id: &str) -> QRResult<()> {
        if self.database(id).is_none() {
            return Err(QRError::UnknownDatabase);
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    // Removing the active database activates the first remaining one
    pub fn remove_database(&mut self, id: &str) -> QRResult<Database> {
        let pos =
            self.databases.iter().position(|d| d.id == id).ok_or(QRError::UnknownDatabase)?;
        let db = self.databases.remove(pos);
        if self.active.as_deref() == Some(id) {
            self.active = self.databases.first().map(|d| d.id.clone());
        }
        log::info!("Removed database {:?} ({id})", db.name);
        Ok(db)
    }

    // Case insensitive substring search over label, id and display text of the active
    // database
    pub fn search(&self, query: &str) -> Vec<&Record> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let Some(db) = self.active_database() else {
            return Vec::new();
        };
        db.records.iter().filter(|r| r.matches(&query)).take(SEARCH_CAP).collect()
    }

    // Active database records as pretty printed JSON
    pub fn export_active(&self) -> QRResult<String> {
        let db = self.active_database().ok_or(QRError::UnknownDatabase)?;
        serde_json::to_string_pretty(&db.records).map_err(|e| {
            log::error!("Failed to export database {:?}: {e}", db.name);
            QRError::InvalidSession
        })
    }

    // Generates a code for the payload and records the trimmed payload in history
    pub fn generate(&mut self, generator: &Generator, data: &str) -> QRResult<RgbImage> {
        let img = generator.generate(data)?;
        self.history.push(validate_payload(data)?);
        Ok(img)
    }

    // Decodes a code from the image and records its text in scan history
    pub fn scan<I>(&mut self, img: &I) -> QRResult<String>
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let text = scan(img)?;
        self.scan_history.push(text.as_str());
        Ok(text)
    }

    pub fn to_json(&self) -> QRResult<String> {
        serde_json::to_string(self).map_err(|e| {
            log::error!("Failed to serialise session: {e}");
            QRError::InvalidSession
        })
    }

    pub fn from_json(json: &str) -> QRResult<Self> {
        let mut session: Self = serde_json::from_str(json).map_err(|e| {
            log::error!("Failed to load session: {e}");
            QRError::InvalidSession
        })?;
        if let Some(active) = session.active.as_deref() {
            if session.database(active).is_none() {
                log::warn!("Active database {active} missing from session");
                session.active = session.databases.first().map(|d| d.id.clone());
            }
        }
        Ok(session)
    }
}

#[cfg(test)]
mod session_tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::{History, Record, Session, Theme, HISTORY_CAP, SEARCH_CAP};
    use crate::{
        common::{ECLevel, QRError},
        generate::{encode_raster, Generator},
    };

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn fruit() -> Vec<Record> {
        vec![
            Record::new("Apple", "FR-001", "Red, crisp"),
            Record::new("Banana", "FR-002", ""),
            Record::new("Cherry", "fr-003", "Seasonal"),
        ]
    }

    #[test]
    fn test_history_dedupes_to_front() {
        let mut h = History::default();
        h.push("a");
        h.push("b");
        h.push("a");
        assert_eq!(h.iter().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(h.latest(), Some("a"));
    }

    #[test]
    fn test_history_cap() {
        let mut h = History::default();
        for i in 0..30 {
            h.push(i.to_string());
        }
        assert_eq!(h.len(), HISTORY_CAP);
        assert_eq!(h.latest(), Some("29"));
        assert_eq!(h.recent(3), ["29", "28", "27"]);
        assert_eq!(h.recent(100).len(), HISTORY_CAP);
        h.clear();
        assert!(h.is_empty());
    }

    #[test_case(&[("label", "A"), ("name", "B"), ("id", "1")], Some(("A", "1", "")); "label first")]
    #[test_case(&[("name", "B"), ("title", "C"), ("code", "7")], Some(("B", "7", "")); "name over title")]
    #[test_case(&[("label", " "), ("title", "C"), ("id", "1")], Some(("C", "1", "")); "blank skipped")]
    #[test_case(&[("title", "T"), ("id", "1"), ("code", "2"), ("description", "d")], Some(("T", "1", "d")); "id over code")]
    #[test_case(&[("label", "A"), ("displayText", "x"), ("description", "y"), ("id", "1")], Some(("A", "1", "x")); "display text")]
    #[test_case(&[("label", "A")], None; "missing id")]
    #[test_case(&[("id", "1"), ("price", "3")], None; "missing label")]
    fn test_record_from_fields(pairs: &[(&str, &str)], exp: Option<(&str, &str, &str)>) {
        let exp = exp.map(|(l, i, d)| Record::new(l, i, d));
        assert_eq!(Record::from_fields(&fields(pairs)), exp);
    }

    #[test]
    fn test_add_and_activate() {
        let mut s = Session::new();
        assert_eq!(s.add_database("empty", vec![]), Err(QRError::EmptyDatabase));

        let a = s.add_database("fruit", fruit()).unwrap();
        let b = s.add_database("more fruit", fruit()).unwrap();
        assert_ne!(a, b);
        assert_eq!(s.active_database().unwrap().id, b);
        assert_eq!(s.active_database().unwrap().rows(), 3);

        s.activate(&a).unwrap();
        assert_eq!(s.active_database().unwrap().name, "fruit");
        assert_eq!(s.activate("nope"), Err(QRError::UnknownDatabase));
    }

    #[test]
    fn test_remove_active_falls_back_to_first() {
        let mut s = Session::new();
        let a = s.add_database("a", fruit()).unwrap();
        let b = s.add_database("b", fruit()).unwrap();
        let c = s.add_database("c", fruit()).unwrap();

        assert_eq!(s.remove_database(&c).unwrap().name, "c");
        assert_eq!(s.active_database().unwrap().id, a);

        s.activate(&b).unwrap();
        s.remove_database(&a).unwrap();
        assert_eq!(s.active_database().unwrap().id, b);

        s.remove_database(&b).unwrap();
        assert!(s.active_database().is_none());
        assert_eq!(s.remove_database(&b).unwrap_err(), QRError::UnknownDatabase);
    }

    #[test]
    fn test_search() {
        let mut s = Session::new();
        assert!(s.search("apple").is_empty());
        s.add_database("fruit", fruit()).unwrap();

        let labels = |q: &str| s.search(q).iter().map(|r| r.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels("APPLE"), ["Apple"]);
        assert_eq!(labels("fr-00"), ["Apple", "Banana", "Cherry"]);
        assert_eq!(labels("  seasonal "), ["Cherry"]);
        assert_eq!(labels("crisp"), ["Apple"]);
        assert!(labels("   ").is_empty());
        assert!(labels("kiwi").is_empty());
    }

    #[test]
    fn test_search_cap() {
        let mut s = Session::new();
        let records = (0..50).map(|i| Record::new(&format!("Item {i}"), &i.to_string(), ""));
        s.add_database("items", records.collect()).unwrap();
        assert_eq!(s.search("item").len(), SEARCH_CAP);
    }

    #[test]
    fn test_theme_toggle() {
        let mut s = Session::new();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.toggle_theme(), Theme::Dark);
        assert_eq!(s.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_json_persistence() {
        let mut s = Session::new();
        s.history.push("https://example.com");
        s.scan_history.push("WIFI:S:home;;");
        s.toggle_theme();
        let id = s.add_database("fruit", fruit()).unwrap();

        let json = s.to_json().unwrap();
        assert!(json.contains("\"scanHistory\""));
        assert!(json.contains("\"displayText\""));

        let mut loaded = Session::from_json(&json).unwrap();
        assert_eq!(loaded, s);

        // Ids keep counting after a reload
        let next = loaded.add_database("again", fruit()).unwrap();
        assert_ne!(next, id);
    }

    #[test]
    fn test_json_partial_and_invalid() {
        let s = Session::from_json(r#"{"history": ["x"], "theme": "dark"}"#).unwrap();
        assert_eq!(s.history.latest(), Some("x"));
        assert_eq!(s.theme, Theme::Dark);
        assert!(s.databases().is_empty());

        assert_eq!(Session::from_json("not json"), Err(QRError::InvalidSession));
    }

    #[test]
    fn test_json_resets_dangling_active() {
        let mut s = Session::new();
        let a = s.add_database("a", fruit()).unwrap();
        s.add_database("b", fruit()).unwrap();
        let json = s.to_json().unwrap();
        let json = json.replace(r#""active":"db0001""#, r#""active":"db9999""#);

        let loaded = Session::from_json(&json).unwrap();
        assert_eq!(loaded.active_database().map(|d| d.id.as_str()), Some(a.as_str()));

        let empty = Session::from_json(r#"{"active": "db0003"}"#).unwrap();
        assert!(empty.active_database().is_none());
        assert_eq!(empty.export_active(), Err(QRError::UnknownDatabase));
    }

    #[test]
    fn test_export_active() {
        let mut s = Session::new();
        assert_eq!(s.export_active(), Err(QRError::UnknownDatabase));
        s.add_database("fruit", fruit()).unwrap();

        let json = s.export_active().unwrap();
        assert!(json.contains("\n  {\n    \"label\": \"Apple\""));
        let records: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert_eq!(records, fruit());
    }

    #[test]
    fn test_generate_records_history() {
        let mut s = Session::new();
        let generator = Generator::new();
        s.generate(&generator, " ROOM-101 ").unwrap();
        s.generate(&generator, "ROOM-102").unwrap();
        s.generate(&generator, "ROOM-101").unwrap();
        assert_eq!(s.history.iter().collect::<Vec<_>>(), ["ROOM-101", "ROOM-102"]);

        assert_eq!(s.generate(&generator, "   ").unwrap_err(), QRError::EmptyData);
        assert_eq!(s.history.len(), 2);
    }

    #[test]
    fn test_scan_records_history() {
        let mut s = Session::new();
        for data in ["LOC-A1", "LOC-A2", "LOC-A1"] {
            let img = encode_raster(data, ECLevel::M, 5).unwrap();
            assert_eq!(s.scan(&img).unwrap(), data);
        }
        assert_eq!(s.scan_history.iter().collect::<Vec<_>>(), ["LOC-A1", "LOC-A2"]);
        assert!(s.history.is_empty());

        let blank = image::GrayImage::from_pixel(50, 50, image::Luma([255]));
        assert_eq!(s.scan(&blank).unwrap_err(), QRError::SymbolNotFound);
        assert_eq!(s.scan_history.len(), 2);
    }
}
