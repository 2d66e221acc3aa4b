use super::model::MetadataTable;

/// Name of the integer key column every metadata table must carry.
pub const PATIENT_ID_COLUMN: &str = "patient_id";

/// Return indices of rows whose `patient_id` equals the integer value of
/// `patient_id`.
///
/// * An identifier that does not parse as an integer matches nothing.
/// * Cells that are not integers (or whole floats) never match.
/// * A table without the key column matches nothing.
pub fn rows_for_patient(table: &MetadataTable, patient_id: &str) -> Vec<usize> {
    let Ok(wanted) = patient_id.trim().parse::<i64>() else {
        return Vec::new();
    };
    let Some(key) = table.column_index(PATIENT_ID_COLUMN) else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(key).and_then(|v| v.as_i64()) == Some(wanted))
        .map(|(i, _)| i)
        .collect()
}

/// The metadata rows for one patient, as a table of their own.
pub fn patient_metadata(table: &MetadataTable, patient_id: &str) -> MetadataTable {
    table.select_rows(&rows_for_patient(table, patient_id))
}
