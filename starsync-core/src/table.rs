//! The destination-table capability consumed by the reconciler.

use crate::error::TableError;
use crate::types::{Fields, RowId, TableRow};

/// A table of rows addressable by named fields.
///
/// Implementations own their transport; callers only see row snapshots and
/// four operations. Writes take effect immediately and are not batched.
pub trait Table {
    /// Enumerate every current row. Order is the table's own.
    fn rows(&self) -> Result<Vec<TableRow>, TableError>;

    /// Create a row carrying `fields`, returning its id.
    fn create_row(&mut self, fields: &Fields) -> Result<RowId, TableError>;

    /// Overwrite a single field of an existing row.
    fn set_field(&mut self, row: &RowId, field: &str, value: &str) -> Result<(), TableError>;

    /// Remove a row from the table.
    fn delete_row(&mut self, row: &RowId) -> Result<(), TableError>;
}
