use std::fmt;

// ---------------------------------------------------------------------------
// MetadataValue – a single cell in a metadata column
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" on whole floats.
            MetadataValue::Float(v) => write!(f, "{v:?}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "NaN"),
        }
    }
}

impl MetadataValue {
    /// Infer the value type from raw delimited text.
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return MetadataValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return MetadataValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return MetadataValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => MetadataValue::Bool(true),
            "false" | "False" | "FALSE" => MetadataValue::Bool(false),
            _ => MetadataValue::String(s.to_string()),
        }
    }

    /// Integer view of the value, accepting whole floats as a dataframe
    /// would after a float-promoted integer column.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            MetadataValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MetadataTable – the complete loaded catalog table
// ---------------------------------------------------------------------------

/// Column-named rows of metadata. Every row has one cell per column.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<MetadataValue>>,
}

impl MetadataTable {
    /// Build a table, padding short rows with nulls and dropping surplus cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<MetadataValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, MetadataValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy the rows at `indices` into a new table with the same columns.
    pub fn select_rows(&self, indices: &[usize]) -> MetadataTable {
        MetadataTable {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        assert_eq!(MetadataValue::infer(""), MetadataValue::Null);
        assert_eq!(MetadataValue::infer("1042"), MetadataValue::Integer(1042));
        assert_eq!(MetadataValue::infer(" 57.5 "), MetadataValue::Float(57.5));
        assert_eq!(MetadataValue::infer("True"), MetadataValue::Bool(true));
        assert_eq!(
            MetadataValue::infer("brugada"),
            MetadataValue::String("brugada".into())
        );
    }

    #[test]
    fn whole_floats_act_as_integers() {
        assert_eq!(MetadataValue::Float(7.0).as_i64(), Some(7));
        assert_eq!(MetadataValue::Float(7.5).as_i64(), None);
        assert_eq!(MetadataValue::String("7".into()).as_i64(), None);
        assert_eq!(MetadataValue::Float(7.0).to_string(), "7.0");
    }

    #[test]
    fn new_pads_short_rows() {
        let table = MetadataTable::new(
            vec!["patient_id".into(), "age".into()],
            vec![vec![MetadataValue::Integer(1)]],
        );
        assert_eq!(table.rows[0], vec![MetadataValue::Integer(1), MetadataValue::Null]);
    }
}
