mod aggregate;
pub mod builder;
mod config;
mod defaults;
pub mod manual;
mod projection;
mod store;
mod sync;
mod validate;

use log::info;

pub use crate::aggregate::aggregate;
pub use crate::config::*;
pub use crate::defaults::{derive_defaults, turnout_ratio};
pub use crate::projection::{compute_projection, format_votes};
pub use crate::store::{FieldValue, ParameterStore};
pub use crate::sync::{apply_event, sync_vector, SyncEvent, SyncOutcome, Trigger};
pub use crate::validate::{check_percent_totals, validate_totals, MAX_TOTAL_PERCENT};

/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Builds the candidate table and the default parameters from the survey rows.
///
/// Arguments:
/// * `rows` the rows of the survey, in any order
/// * `rules` which candidates to merge, which row holds the non-voters, the
/// display order and the target turnout
pub fn build_projection_table(
    rows: &[RawRow],
    rules: &ProjectionRules,
) -> Result<(AggregatedTable, DefaultParameters), ConfigurationError> {
    info!(
        "Processing {:?} survey rows, rules: {:?}",
        rows.len(),
        rules
    );
    let table = aggregate(rows, rules)?;
    let defaults = derive_defaults(&table, rules);
    for (c, d) in table.candidates.iter().zip(defaults.iter()) {
        info!("Candidate: {}: {} votes, defaults: {:?}", c.name, c.vote_count, d);
    }
    Ok((table, defaults))
}

/// The state of one projection session.
///
/// The table and the defaults are fixed at construction. The parameters only
/// change through [`Projector::apply`].
#[derive(Debug, Clone)]
pub struct Projector {
    table: AggregatedTable,
    defaults: DefaultParameters,
    store: ParameterStore,
    contenders: (String, String),
}

impl Projector {
    pub fn new(
        rows: &[RawRow],
        rules: &ProjectionRules,
        contenders: (String, String),
    ) -> Result<Projector, ConfigurationError> {
        let (table, defaults) = build_projection_table(rows, rules)?;
        let store = ParameterStore::new(&defaults);
        Ok(Projector {
            table,
            defaults,
            store,
            contenders,
        })
    }

    pub fn table(&self) -> &AggregatedTable {
        &self.table
    }

    pub fn defaults(&self) -> &DefaultParameters {
        &self.defaults
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn contenders(&self) -> (&str, &str) {
        (self.contenders.0.as_str(), self.contenders.1.as_str())
    }

    pub fn apply(&mut self, event: &SyncEvent) -> SyncOutcome {
        apply_event(&mut self.store, &self.defaults, event)
    }

    pub fn warnings(&self) -> Vec<ValidationWarning> {
        validate_totals(&self.table, &self.store)
    }

    /// Projection over the parameters as they are now.
    pub fn project(&self) -> Projection {
        compute_projection(&self.table, &self.store.snapshot())
    }

    pub fn summary(&self, projection: &Projection) -> String {
        projection.summary(&self.contenders.0, &self.contenders.1)
    }
}
