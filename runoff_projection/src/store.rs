use log::debug;

use crate::config::*;
use crate::round_to;

/// Both representations of one parameter: the slider fraction and the
/// percentage entry.
///
/// Invariant: `percent == round(fraction * 100, 1)`, up to the rounding of
/// the value that was entered.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct FieldValue {
    pub fraction: f64,
    pub percent: f64,
}

impl FieldValue {
    pub fn from_fraction(fraction: f64) -> FieldValue {
        let fraction = clamp_or_zero(fraction, 1.0);
        FieldValue {
            fraction,
            percent: round_to(fraction * 100.0, 1),
        }
    }

    pub fn from_percent(percent: f64) -> FieldValue {
        let percent = clamp_or_zero(percent, 100.0);
        FieldValue {
            fraction: round_to(percent / 100.0, 3),
            percent: round_to(percent, 1),
        }
    }
}

// NaN is read as 0 like a missing value.
fn clamp_or_zero(x: f64, max: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, max)
    }
}

/// The current value of every parameter, for every candidate.
///
/// The fields are stored flat, three per candidate, in the canonical candidate order.
#[derive(PartialEq, Debug, Clone)]
pub struct ParameterStore {
    values: Vec<FieldValue>,
}

impl ParameterStore {
    /// Creates a store seeded with the default parameters.
    pub fn new(defaults: &DefaultParameters) -> ParameterStore {
        let mut store = ParameterStore {
            values: vec![FieldValue::default(); defaults.len() * 3],
        };
        store.reset_all(defaults);
        store
    }

    pub fn num_candidates(&self) -> usize {
        self.values.len() / 3
    }

    fn position(&self, field: FieldId) -> Option<usize> {
        if field.candidate.0 < self.num_candidates() {
            Some(field.candidate.0 * 3 + field.kind.offset())
        } else {
            None
        }
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.position(field).is_some()
    }

    pub fn get(&self, field: FieldId) -> Option<FieldValue> {
        self.position(field).map(|pos| self.values[pos])
    }

    /// Sets a field from a slider value. Returns the stored value, or None if
    /// the field does not exist.
    pub fn set_from_fraction(&mut self, field: FieldId, fraction: f64) -> Option<FieldValue> {
        let pos = self.position(field)?;
        let v = FieldValue::from_fraction(fraction);
        debug!("set_from_fraction: {:?}: {} -> {:?}", field, fraction, v);
        self.values[pos] = v;
        Some(v)
    }

    /// Sets a field from a percentage entry. Returns the stored value, or None
    /// if the field does not exist.
    pub fn set_from_percent(&mut self, field: FieldId, percent: f64) -> Option<FieldValue> {
        let pos = self.position(field)?;
        let v = FieldValue::from_percent(percent);
        debug!("set_from_percent: {:?}: {} -> {:?}", field, percent, v);
        self.values[pos] = v;
        Some(v)
    }

    pub fn reset_all(&mut self, defaults: &DefaultParameters) {
        self.values = defaults
            .iter()
            .flat_map(|t| ShareKind::ALL.map(|k| FieldValue::from_fraction(t.get(k))))
            .collect();
    }

    /// The three fractions of a candidate.
    pub fn shares(&self, candidate: CandidateIndex) -> Option<ShareTriple> {
        let field = |kind| self.get(FieldId { candidate, kind }).map(|v| v.fraction);
        Some(ShareTriple {
            to_a: field(ShareKind::ToA)?,
            to_b: field(ShareKind::ToB)?,
            none: field(ShareKind::None)?,
        })
    }

    /// The current fractions of all candidates, as read by the projection.
    pub fn snapshot(&self) -> Vec<ShareTriple> {
        self.values
            .chunks(3)
            .map(|c| ShareTriple {
                to_a: c[0].fraction,
                to_b: c[1].fraction,
                none: c[2].fraction,
            })
            .collect()
    }

    /// All the fields in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, FieldValue)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(pos, v)| (FieldId::new(pos / 3, ShareKind::ALL[pos % 3]), *v))
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DefaultParameters {
        DefaultParameters::new(vec![
            ShareTriple {
                to_a: 0.6,
                to_b: 0.3,
                none: 0.1,
            },
            ShareTriple {
                to_a: 0.055,
                to_b: 0.045,
                none: 0.9,
            },
        ])
    }

    #[test]
    fn seeded_from_defaults() {
        let store = ParameterStore::new(&defaults());
        assert_eq!(store.num_candidates(), 2);
        let v = store.get(FieldId::new(1, ShareKind::ToA)).unwrap();
        assert_eq!(v.fraction, 0.055);
        assert!((v.percent - 5.5).abs() < 1e-9);
    }

    #[test]
    fn set_from_percent_rounds_both_sides() {
        let mut store = ParameterStore::new(&defaults());
        let f = FieldId::new(0, ShareKind::ToB);
        store.set_from_percent(f, 42.37);
        let v = store.get(f).unwrap();
        assert!((v.percent - 42.4).abs() < 0.05);
        assert!((v.fraction - 0.424).abs() < 1e-9);
    }

    #[test]
    fn set_from_fraction_derives_percent() {
        let mut store = ParameterStore::new(&defaults());
        let f = FieldId::new(0, ShareKind::None);
        store.set_from_fraction(f, 0.1234);
        let v = store.get(f).unwrap();
        assert_eq!(v.fraction, 0.1234);
        assert!((v.percent - 12.3).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_writes_are_clamped() {
        let mut store = ParameterStore::new(&defaults());
        let f = FieldId::new(0, ShareKind::ToA);
        assert_eq!(
            store.set_from_percent(f, 140.0),
            Some(FieldValue {
                fraction: 1.0,
                percent: 100.0
            })
        );
        assert_eq!(
            store.set_from_fraction(f, -0.5),
            Some(FieldValue {
                fraction: 0.0,
                percent: 0.0
            })
        );
        assert_eq!(
            store.set_from_fraction(f, f64::NAN),
            Some(FieldValue::default())
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut store = ParameterStore::new(&defaults());
        let before = store.clone();
        assert_eq!(store.set_from_percent(FieldId::new(7, ShareKind::ToA), 10.0), None);
        assert_eq!(store, before);
        assert!(store.get(FieldId::new(2, ShareKind::ToA)).is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let d = defaults();
        let mut store = ParameterStore::new(&d);
        store.set_from_percent(FieldId::new(0, ShareKind::ToA), 12.0);
        store.set_from_fraction(FieldId::new(1, ShareKind::None), 0.2);
        store.reset_all(&d);
        for (t, s) in d.iter().zip(store.snapshot().iter()) {
            assert!((t.to_a - s.to_a).abs() < 1e-4);
            assert!((t.to_b - s.to_b).abs() < 1e-4);
            assert!((t.none - s.none).abs() < 1e-4);
        }
    }

    #[test]
    fn fields_are_listed_in_canonical_order() {
        let store = ParameterStore::new(&defaults());
        let ids: Vec<FieldId> = store.fields().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 6);
        assert_eq!(ids[0], FieldId::new(0, ShareKind::ToA));
        assert_eq!(ids[4], FieldId::new(1, ShareKind::ToB));
        assert_eq!(
            store.shares(CandidateIndex(0)),
            Some(ShareTriple {
                to_a: 0.6,
                to_b: 0.3,
                none: 0.1
            })
        );
    }
}
