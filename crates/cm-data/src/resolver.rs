//! Column discovery by alias keywords.
//!
//! Export layouts drift between product versions ("Software STAP Host",
//! "STAP Host", "Host"), so columns are located by case-insensitive
//! substring match against an ordered alias list rather than by exact name.

use crate::table::{ColumnRef, Table};

/// Find the first column, in file order, whose lower-cased name contains any
/// of `aliases`.
///
/// Aliases are checked in the caller's priority order for each column, but
/// column order decides: a later column never wins over an earlier one, even
/// when it matches a higher-priority alias. `None` means the field is not
/// available in this table.
pub fn resolve_column(table: &Table, aliases: &[String]) -> Option<ColumnRef> {
    table.columns.iter().enumerate().find_map(|(index, name)| {
        let lower = name.to_lowercase();
        aliases
            .iter()
            .any(|alias| lower.contains(alias.as_str()))
            .then(|| ColumnRef {
                index,
                name: name.clone(),
            })
    })
}
