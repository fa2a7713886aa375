//! Collector discovery from the Central Management inventory export.

use std::collections::BTreeSet;

use cm_core::models::Collector;
use cm_core::policy::ClassificationPolicy;
use tracing::debug;

use crate::classifier::is_collector_unit;
use crate::resolver::resolve_column;
use crate::table::Table;

/// Collect the unique, sorted names of all inventory units whose type marks
/// them as collectors.
///
/// A table without both a unit-name and a unit-type column contributes
/// nothing. Names are trimmed before deduplication. The result does not
/// depend on the order of `tables`.
pub fn discover_collectors(tables: &[Table], policy: &ClassificationPolicy) -> Vec<Collector> {
    let mut names: BTreeSet<String> = BTreeSet::new();

    for table in tables {
        let (Some(name_col), Some(type_col)) = (
            resolve_column(table, &policy.aliases.unit_name),
            resolve_column(table, &policy.aliases.unit_type),
        ) else {
            debug!("Skipping {}: no unit name/type columns", table.display_name());
            continue;
        };

        let before = names.len();
        for row in table.rows() {
            let unit_type = row.get(&type_col).as_text();
            let unit_name = row.text(&name_col);
            if is_collector_unit(&unit_type, policy) && !unit_name.is_empty() {
                names.insert(unit_name);
            }
        }
        debug!(
            "{}: {} new collectors",
            table.display_name(),
            names.len() - before
        );
    }

    names.into_iter().map(Collector::new).collect()
}
