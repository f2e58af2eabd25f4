//! In-memory [`Table`] used as a stand-in for a remote table.
//!
//! Every write is appended to a log so callers can assert on exactly which
//! mutations a run performed. A write budget makes the table start failing
//! after a given number of writes.

use crate::error::TableError;
use crate::table::Table;
use crate::types::{Fields, RowId, TableRow};

/// A single mutation applied to a [`MemoryTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableWrite {
    Create { id: RowId, fields: Fields },
    SetField { id: RowId, field: String, value: String },
    Delete { id: RowId },
}

#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Vec<TableRow>,
    next_id: u64,
    writes: Vec<TableWrite>,
    write_budget: Option<usize>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with `rows`. Ids are kept as given and never handed
    /// out again by [`Table::create_row`].
    pub fn with_rows(rows: impl IntoIterator<Item = TableRow>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fail every write after the first `budget` ones.
    pub fn with_write_budget(mut self, budget: usize) -> Self {
        self.write_budget = Some(budget);
        self
    }

    /// Convenience for seeding: a row with the three default columns.
    pub fn row(id: &str, name: &str, url: &str, description: &str) -> TableRow {
        TableRow::new(id)
            .with_field("Name", name)
            .with_field("URL", url)
            .with_field("Description", description)
    }

    pub fn snapshot(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn writes(&self) -> &[TableWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn spend(&mut self, operation: &str) -> Result<(), TableError> {
        if let Some(budget) = self.write_budget {
            if self.writes.len() >= budget {
                return Err(TableError::Transport {
                    operation: operation.to_string(),
                    message: "write budget exhausted".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Next `mem-N` id not already taken by a row.
    fn fresh_id(&mut self) -> RowId {
        loop {
            self.next_id += 1;
            let id = RowId(format!("mem-{}", self.next_id));
            if !self.rows.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    fn position(&self, id: &RowId) -> Result<usize, TableError> {
        self.rows
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| TableError::RowNotFound(id.clone()))
    }
}

impl Table for MemoryTable {
    fn rows(&self) -> Result<Vec<TableRow>, TableError> {
        Ok(self.rows.clone())
    }

    fn create_row(&mut self, fields: &Fields) -> Result<RowId, TableError> {
        self.spend("create row")?;
        let id = self.fresh_id();
        let mut row = TableRow::new(id.clone());
        for (name, value) in fields {
            row.set_field(name.clone(), value.clone());
        }
        self.rows.push(row);
        self.writes.push(TableWrite::Create {
            id: id.clone(),
            fields: fields.clone(),
        });
        Ok(id)
    }

    fn set_field(&mut self, row: &RowId, field: &str, value: &str) -> Result<(), TableError> {
        self.spend("update row")?;
        let idx = self.position(row)?;
        self.rows[idx].set_field(field, value);
        self.writes.push(TableWrite::SetField {
            id: row.clone(),
            field: field.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn delete_row(&mut self, row: &RowId) -> Result<(), TableError> {
        self.spend("delete row")?;
        let idx = self.position(row)?;
        self.rows.remove(idx);
        self.writes.push(TableWrite::Delete { id: row.clone() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_fresh_ids() {
        let mut table = MemoryTable::with_rows([MemoryTable::row("mem-1", "A", "u1", "")]);
        let id = table.create_row(&Fields::new()).expect("create");
        assert_ne!(id, RowId::from("mem-1"));
        assert_eq!(table.snapshot().len(), 2);
    }

    #[test]
    fn create_skips_ids_taken_by_seeded_rows() {
        let mut table = MemoryTable::with_rows([MemoryTable::row("mem-2", "A", "u1", "")]);
        let first = table.create_row(&Fields::new()).expect("create");
        let second = table.create_row(&Fields::new()).expect("create");
        assert_eq!(first, RowId::from("mem-1"));
        assert_eq!(second, RowId::from("mem-3"));
        let ids: std::collections::HashSet<_> = table.snapshot().iter().map(|r| &r.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn write_budget_fails_after_limit() {
        let mut table = MemoryTable::new().with_write_budget(1);
        table.create_row(&Fields::new()).expect("first write");
        let err = table.create_row(&Fields::new()).unwrap_err();
        assert!(matches!(err, TableError::Transport { .. }));
        assert_eq!(table.writes().len(), 1);
    }

    #[test]
    fn delete_unknown_row_is_not_found() {
        let mut table = MemoryTable::new();
        let err = table.delete_row(&RowId::from("nope")).unwrap_err();
        assert!(matches!(err, TableError::RowNotFound(_)));
    }
}
