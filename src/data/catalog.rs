use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use super::filter::PATIENT_ID_COLUMN;
use super::loader::load_table;
use super::model::MetadataTable;
use crate::error::CatalogError;

/// Ordering applied to the discovered patient folder names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortPolicy {
    /// By integer value; equal values fall back to string order.
    #[default]
    Numeric,
    /// Plain string order.
    Lexical,
}

impl SortPolicy {
    pub fn sort(self, ids: &mut [String]) {
        match self {
            SortPolicy::Lexical => ids.sort(),
            SortPolicy::Numeric => ids.sort_by(|a, b| {
                // Names are all digits, so compare by significant digits.
                let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
                ta.len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| a.cmp(b))
            }),
        }
    }
}

/// The metadata table plus the patient folders found under the records root.
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub metadata: MetadataTable,
    pub patient_ids: Vec<String>,
    pub records_root: PathBuf,
}

impl Catalog {
    /// Load the metadata table and scan `records_root` for patient folders.
    pub fn load(
        metadata_path: &Path,
        records_root: &Path,
        sort: SortPolicy,
    ) -> Result<Self, CatalogError> {
        if !metadata_path.exists() {
            return Err(CatalogError::MetadataNotFound(metadata_path.to_path_buf()));
        }
        let metadata = load_table(metadata_path).map_err(|cause| CatalogError::Metadata {
            path: metadata_path.to_path_buf(),
            cause,
        })?;
        if metadata.column_index(PATIENT_ID_COLUMN).is_none() {
            return Err(CatalogError::MissingKeyColumn(PATIENT_ID_COLUMN.to_string()));
        }

        let patient_ids = scan_patient_ids(records_root, sort)?;
        log::info!(
            "Found {} patient folders under {}",
            patient_ids.len(),
            records_root.display()
        );

        let catalog = Catalog {
            metadata,
            patient_ids,
            records_root: records_root.to_path_buf(),
        };
        catalog.log_unmatched();
        Ok(catalog)
    }

    pub fn contains(&self, patient_id: &str) -> bool {
        self.patient_ids.iter().any(|id| id == patient_id)
    }

    /// Base path of a patient's record: `<root>/<id>/<id>`.
    pub fn record_base(&self, patient_id: &str) -> PathBuf {
        self.records_root.join(patient_id).join(patient_id)
    }

    fn log_unmatched(&self) {
        let Some(key) = self.metadata.column_index(PATIENT_ID_COLUMN) else {
            return;
        };
        let keyed: BTreeSet<i64> = self
            .metadata
            .rows
            .iter()
            .filter_map(|row| row.get(key).and_then(|v| v.as_i64()))
            .collect();
        let folders: BTreeSet<i64> = self
            .patient_ids
            .iter()
            .filter_map(|id| id.parse().ok())
            .collect();

        let without_rows = folders.difference(&keyed).count();
        let without_folders = keyed.difference(&folders).count();
        if without_rows > 0 {
            log::warn!("{without_rows} patient folders have no metadata row");
        }
        if without_folders > 0 {
            log::warn!("{without_folders} metadata rows have no patient folder");
        }
    }
}

/// List the immediate subdirectories of `root` whose names are non-empty
/// strings of ASCII decimal digits, ordered by `sort`.
pub fn scan_patient_ids(root: &Path, sort: SortPolicy) -> Result<Vec<String>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::RecordsDirNotFound(root.to_path_buf()));
    }
    let scan_err = |source| CatalogError::Scan {
        path: root.to_path_buf(),
        source,
    };

    let mut ids = Vec::new();
    for entry in std::fs::read_dir(root).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            log::debug!("skipping non-numeric entry {name}");
            continue;
        }
        // Follows symlinks, like a plain directory check would.
        if !entry.path().is_dir() {
            log::debug!("skipping non-directory entry {name}");
            continue;
        }
        ids.push(name);
    }

    sort.sort(&mut ids);
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_keeps_only_numeric_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["123", "7", "abc", "12a", "0042"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("99"), b"not a folder").unwrap();
        fs::write(dir.path().join("RECORDS"), b"").unwrap();

        let ids = scan_patient_ids(dir.path(), SortPolicy::Numeric).unwrap();
        assert_eq!(ids, vec!["7", "0042", "123"]);
    }

    #[test]
    fn lexical_policy_sorts_as_strings() {
        let mut ids = vec!["7".to_string(), "123".to_string(), "0042".to_string()];
        SortPolicy::Lexical.sort(&mut ids);
        assert_eq!(ids, vec!["0042", "123", "7"]);
    }

    #[test]
    fn numeric_policy_breaks_ties_lexically() {
        let mut ids = vec!["7".to_string(), "07".to_string(), "10".to_string()];
        SortPolicy::Numeric.sort(&mut ids);
        assert_eq!(ids, vec!["07", "7", "10"]);
    }

    #[test]
    fn missing_records_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("files");
        let err = scan_patient_ids(&missing, SortPolicy::Numeric).unwrap_err();
        assert!(matches!(err, CatalogError::RecordsDirNotFound(p) if p == missing));
    }

    #[test]
    fn load_checks_metadata_then_records() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("metadata.csv");
        let records = dir.path().join("files");

        let err = Catalog::load(&metadata, &records, SortPolicy::Numeric).unwrap_err();
        assert!(matches!(err, CatalogError::MetadataNotFound(_)));
        assert!(err.to_string().contains("metadata.csv"));

        fs::write(&metadata, "patient_id,age\n1042,57\n").unwrap();
        let err = Catalog::load(&metadata, &records, SortPolicy::Numeric).unwrap_err();
        assert!(matches!(err, CatalogError::RecordsDirNotFound(_)));

        fs::create_dir_all(records.join("1042")).unwrap();
        let catalog = Catalog::load(&metadata, &records, SortPolicy::Numeric).unwrap();
        assert_eq!(catalog.patient_ids, vec!["1042"]);
        assert!(catalog.contains("1042"));
        assert!(!catalog.contains("9999"));
        assert_eq!(catalog.record_base("1042"), records.join("1042").join("1042"));
    }

    #[test]
    fn load_requires_key_column() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = dir.path().join("metadata.csv");
        fs::write(&metadata, "id,age\n1,2\n").unwrap();
        let err = Catalog::load(&metadata, dir.path(), SortPolicy::Numeric).unwrap_err();
        assert!(matches!(err, CatalogError::MissingKeyColumn(_)));
    }
}
