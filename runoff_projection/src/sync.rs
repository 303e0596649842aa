use log::{debug, info};

use crate::config::*;
use crate::store::{FieldValue, ParameterStore};

/// A single user interaction with the parameters.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum SyncEvent {
    /// The percentage entry of a field was edited. A missing value reads as 0.
    PercentEdited { field: FieldId, value: Option<f64> },
    /// The slider of a field was moved. A missing value reads as 0.
    FractionEdited { field: FieldId, value: Option<f64> },
    /// All the fields go back to their defaults.
    Reset,
}

/// What a pass changed.
#[derive(PartialEq, Debug, Clone)]
pub enum SyncOutcome {
    Updated(FieldId, FieldValue),
    ResetAll,
    /// The event addressed a field that does not exist. Nothing changed.
    UnknownField(FieldId),
}

/// Which field triggered a full-vector pass.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Trigger {
    Percent(FieldId),
    Fraction(FieldId),
    Reset,
}

/// Applies one event to the store.
///
/// Only the edited field changes: its other representation is derived from
/// the edited one and every other field keeps both its values. Applying the
/// same event twice leaves the store as applying it once.
pub fn apply_event(
    store: &mut ParameterStore,
    defaults: &DefaultParameters,
    event: &SyncEvent,
) -> SyncOutcome {
    debug!("apply_event: {:?}", event);
    let (field, stored) = match *event {
        SyncEvent::Reset => {
            info!("apply_event: resetting all parameters to their defaults");
            store.reset_all(defaults);
            return SyncOutcome::ResetAll;
        }
        SyncEvent::PercentEdited { field, value } => {
            (field, store.set_from_percent(field, value.unwrap_or(0.0)))
        }
        SyncEvent::FractionEdited { field, value } => {
            (field, store.set_from_fraction(field, value.unwrap_or(0.0)))
        }
    };
    match stored {
        Some(v) => SyncOutcome::Updated(field, v),
        None => SyncOutcome::UnknownField(field),
    }
}

/// Full-vector form of a pass.
///
/// `previous` holds both representations of every field, in canonical order,
/// with the raw new value already written in the representation named by the
/// trigger. Missing values read as 0. The returned vector is consistent: the
/// triggering field is resolved from its new raw value and all other fields
/// are passed through unchanged. No field is resolved from another field.
pub fn sync_vector(
    previous: &[(Option<f64>, Option<f64>)],
    trigger: Trigger,
    defaults: &DefaultParameters,
) -> Vec<FieldValue> {
    if trigger == Trigger::Reset {
        return ParameterStore::new(defaults).values().to_vec();
    }
    let edited_pos = |field: FieldId| field.candidate.0 * 3 + field.kind.offset();
    previous
        .iter()
        .enumerate()
        .map(|(pos, (fraction, percent))| match trigger {
            Trigger::Percent(field) if edited_pos(field) == pos => {
                FieldValue::from_percent(percent.unwrap_or(0.0))
            }
            Trigger::Fraction(field) if edited_pos(field) == pos => {
                FieldValue::from_fraction(fraction.unwrap_or(0.0))
            }
            _ => FieldValue {
                fraction: fraction.unwrap_or(0.0),
                percent: percent.unwrap_or(0.0),
            },
        })
        .collect()
}
