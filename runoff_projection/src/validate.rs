use log::{debug, warn};

use crate::config::*;
use crate::store::ParameterStore;

/// Largest accepted total, with 0.1 of tolerance for the rounding of the entries.
pub const MAX_TOTAL_PERCENT: f64 = 100.1;

/// Checks, for every candidate, that the three shares do not exceed 100%.
///
/// Reads the percentage form of the fields. The result only depends on the
/// current state and is returned in candidate order.
pub fn validate_totals(table: &AggregatedTable, store: &ParameterStore) -> Vec<ValidationWarning> {
    let percents: Vec<[Option<f64>; 3]> = (0..table.len())
        .map(|idx| {
            ShareKind::ALL.map(|kind| {
                store
                    .get(FieldId::new(idx, kind))
                    .map(|v| v.percent)
            })
        })
        .collect();
    check_percent_totals(&table.names(), &percents)
}

/// Same check over raw percentage entries. Missing entries count as 0.
pub fn check_percent_totals(names: &[String], percents: &[[Option<f64>; 3]]) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = Vec::new();
    for (name, entries) in names.iter().zip(percents.iter()) {
        let total: f64 = entries.iter().map(|p| p.unwrap_or(0.0)).sum();
        debug!("check_percent_totals: {}: {}", name, total);
        if total > MAX_TOTAL_PERCENT {
            warn!("check_percent_totals: {}: total of {}% exceeds 100%", name, total);
            warnings.push(ValidationWarning {
                candidate: name.clone(),
                total_percent: total,
            });
        }
    }
    warnings
}
