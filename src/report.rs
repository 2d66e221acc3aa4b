use std::fmt;

use crate::data::model::MetadataTable;

/// Text rendering of metadata rows: a header line then one line per row,
/// every column right-aligned to its widest cell, no row index.
pub struct MetadataReport<'a> {
    table: &'a MetadataTable,
}

impl<'a> MetadataReport<'a> {
    pub fn new(table: &'a MetadataTable) -> Self {
        Self { table }
    }
}

impl fmt::Display for MetadataReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .table
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_line(f, &self.table.columns, &widths)?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, items: &[String], widths: &[usize]) -> fmt::Result {
    for (i, (item, &width)) in items.iter().zip(widths).enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item:>width$}")?;
    }
    writeln!(f)
}
