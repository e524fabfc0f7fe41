//! Immutable scheme catalog and its loaders.
//!
//! Spreadsheets (`.xlsx`, `.xls`, `.ods`) are read with calamine: first
//! worksheet, first row is the header, required columns located by name.
//! JSON catalogs are an array of `CatalogRecord` objects.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::types::{CatalogRecord, CATALOG_COLUMNS};
use schemesage_core::{Error, Result};

/// Ordered, read-only collection of catalog records.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<CatalogRecord>,
    fingerprint: String,
}

impl Corpus {
    /// Build a corpus, assigning ids by position.
    pub fn new(mut records: Vec<CatalogRecord>) -> Self {
        let mut hasher = Sha256::new();
        for (i, record) in records.iter_mut().enumerate() {
            record.id = i;
            hasher.update(record.combined_text().as_bytes());
            hasher.update([0u8]);
        }
        Self {
            records,
            fingerprint: hex::encode(hasher.finalize()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// SHA-256 over every record's combined text, in order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Combined text of every record, aligned with record order.
    pub fn combined_texts(&self) -> Vec<String> {
        self.records.iter().map(CatalogRecord::combined_text).collect()
    }

    /// Lowercase word tokens appearing anywhere in the catalog.
    pub fn vocabulary(&self) -> HashSet<String> {
        self.records
            .iter()
            .flat_map(|r| {
                r.combined_text()
                    .to_lowercase()
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Load a catalog, dispatching on the file extension.
pub fn load(path: &Path) -> Result<Corpus> {
    if !path.exists() {
        return Err(Error::CorpusLoad(format!("catalog not found: {}", path.display())));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let records = match extension.as_str() {
        "json" => load_json(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_spreadsheet(path)?,
        other => {
            return Err(Error::CorpusLoad(format!(
                "unsupported catalog format `{other}`: {}",
                path.display()
            )))
        }
    };

    if records.is_empty() {
        warn!("Catalog {} contains no schemes", path.display());
    }
    let corpus = Corpus::new(records);
    info!(
        "Catalog loaded: {} schemes from {} (fingerprint {})",
        corpus.len(),
        path.display(),
        &corpus.fingerprint()[..12]
    );
    Ok(corpus)
}

fn load_json(path: &Path) -> Result<Vec<CatalogRecord>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::CorpusLoad(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&data).map_err(|e| Error::CorpusLoad(format!("{}: {e}", path.display())))
}

fn load_spreadsheet(path: &Path) -> Result<Vec<CatalogRecord>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::CorpusLoad(format!("{}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::CorpusLoad(format!("{}: workbook has no sheets", path.display())))?
        .map_err(|e| Error::CorpusLoad(format!("{}: {e}", path.display())))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let header = rows
        .next()
        .ok_or_else(|| Error::CorpusLoad(format!("{}: sheet is empty", path.display())))?;

    records_from_rows(&header, rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Turn header + data rows into records.
///
/// Column order in the sheet does not matter; extra columns are ignored and
/// rows with every required cell blank are skipped.
pub fn records_from_rows<I>(header: &[String], rows: I) -> Result<Vec<CatalogRecord>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut positions = [0usize; 9];
    for (slot, column) in positions.iter_mut().zip(CATALOG_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| Error::CorpusLoad(format!("missing column `{column}`")))?;
    }

    let mut records = Vec::new();
    for row in rows {
        let cells = positions.map(|p| row.get(p).cloned().unwrap_or_default());
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        records.push(CatalogRecord::from_cells(records.len(), cells));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_records_from_rows_any_column_order() {
        let mut header = strings(&CATALOG_COLUMNS);
        header.reverse();
        header.push("Notes".into());

        let mut row = strings(&[
            "Aadhaar, ration card",
            "Apply online",
            "State agriculture dept",
            "Rs 6000 per year",
            "Small farmers",
            "Income support",
            "Direct transfer to farmers",
            "Agriculture",
            "PM-KISAN",
        ]);
        row.push("ignored".into());

        let records = records_from_rows(&header, vec![row]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "PM-KISAN");
        assert_eq!(records[0].sector, "Agriculture");
        assert_eq!(records[0].documents_required, "Aadhaar, ration card");
    }

    #[test]
    fn test_records_from_rows_missing_column() {
        let header = strings(&CATALOG_COLUMNS[..8]);
        let err = records_from_rows(&header, Vec::<Vec<String>>::new()).unwrap_err();
        assert!(matches!(err, Error::CorpusLoad(msg) if msg.contains("Documents Required")));
    }

    #[test]
    fn test_records_from_rows_skips_blank_and_pads_short_rows() {
        let header = strings(&CATALOG_COLUMNS);
        let rows = vec![
            vec![String::new(); 9],
            strings(&["Ujjwala", "Energy"]),
        ];
        let records = records_from_rows(&header, rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ujjwala");
        assert_eq!(records[0].benefits, "");
    }

    #[test]
    fn test_corpus_assigns_ids_and_fingerprint() {
        let a = Corpus::new(vec![
            CatalogRecord { name: "A".into(), ..Default::default() },
            CatalogRecord { name: "B".into(), id: 42, ..Default::default() },
        ]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(1).unwrap().id, 1);
        assert_eq!(a.fingerprint().len(), 64);

        let b = Corpus::new(vec![
            CatalogRecord { name: "B".into(), ..Default::default() },
            CatalogRecord { name: "A".into(), ..Default::default() },
        ]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_vocabulary() {
        let corpus = Corpus::new(vec![CatalogRecord {
            name: "Beti Bachao".into(),
            sector: "Women & Child".into(),
            ..Default::default()
        }]);
        let vocab = corpus.vocabulary();
        assert!(vocab.contains("beti"));
        assert!(vocab.contains("child"));
        assert!(!vocab.contains("&"));
    }

    #[test]
    fn test_load_json_catalog() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"name": "Ayushman Bharat", "sector": "Health"}}, {{"name": "Mudra", "sector": "Finance"}}]"#
        )
        .unwrap();

        let corpus = load(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1).unwrap().name, "Mudra");
        assert_eq!(corpus.get(1).unwrap().id, 1);
    }

    #[test]
    fn test_load_failures() {
        let missing = load(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(matches!(missing, Error::CorpusLoad(_)));

        let mut txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(txt, "hello").unwrap();
        assert!(matches!(load(txt.path()), Err(Error::CorpusLoad(_))));

        let mut bad = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(bad, "not a zip archive").unwrap();
        assert!(matches!(load(bad.path()), Err(Error::CorpusLoad(_))));
    }
}
