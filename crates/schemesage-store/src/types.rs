//! Catalog record type.

use serde::{Deserialize, Serialize};

/// Spreadsheet header for each record field, in combined-text order.
pub const CATALOG_COLUMNS: [&str; 9] = [
    "Scheme Name",
    "Sector",
    "Description",
    "Objectives",
    "Eligibility Criteria",
    "Benefits",
    "Implementation Agency",
    "Application Process",
    "Documents Required",
];

/// One welfare scheme from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Position in the catalog; assigned on load, never taken from input.
    #[serde(default, skip_deserializing)]
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub eligibility_criteria: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub implementation_agency: String,
    #[serde(default)]
    pub application_process: String,
    #[serde(default)]
    pub documents_required: String,
}

impl CatalogRecord {
    /// Build a record from cells ordered like `CATALOG_COLUMNS`.
    pub fn from_cells(id: usize, cells: [String; 9]) -> Self {
        let [name, sector, description, objectives, eligibility_criteria, benefits, implementation_agency, application_process, documents_required] =
            cells;
        Self {
            id,
            name,
            sector,
            description,
            objectives,
            eligibility_criteria,
            benefits,
            implementation_agency,
            application_process,
            documents_required,
        }
    }

    /// All text fields joined by single spaces; this is what gets embedded.
    pub fn combined_text(&self) -> String {
        [
            self.name.as_str(),
            &self.sector,
            &self.description,
            &self.objectives,
            &self.eligibility_criteria,
            &self.benefits,
            &self.implementation_agency,
            &self.application_process,
            &self.documents_required,
        ]
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text_order() {
        let cells = CATALOG_COLUMNS.map(|c| c.to_lowercase());
        let record = CatalogRecord::from_cells(7, cells);
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "scheme name");
        assert_eq!(record.documents_required, "documents required");
        assert!(record.combined_text().starts_with("scheme name sector description"));
        assert!(record.combined_text().ends_with("application process documents required"));
    }

    #[test]
    fn test_json_ignores_incoming_id() {
        let record: CatalogRecord =
            serde_json::from_str(r#"{"id": 99, "name": "PM-KISAN", "sector": "Agriculture"}"#)
                .unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.name, "PM-KISAN");
        assert_eq!(record.benefits, "");
    }
}
