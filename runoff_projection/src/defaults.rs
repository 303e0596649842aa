use log::{debug, info};

use crate::config::*;
use crate::round_to;

/// Fraction of the non-voters who need to turn out for the overall turnout to
/// reach `target_turnout`. Clamped to [0, 1].
pub fn turnout_ratio(table: &AggregatedTable, target_turnout: f64) -> f64 {
    let total_votes = table.total_votes();
    let non_voter_total = table.non_voter().map(|c| c.vote_count).unwrap_or(0.0);
    let desired_turnout = target_turnout * total_votes;
    let current_turnout = total_votes - non_voter_total;
    let additional_needed = desired_turnout - current_turnout;
    debug!(
        "turnout_ratio: total: {} desired: {} current: {} additional: {}",
        total_votes, desired_turnout, current_turnout, additional_needed
    );
    if additional_needed < 0.0 || non_voter_total <= 0.0 {
        0.0
    } else {
        (additional_needed / non_voter_total).clamp(0.0, 1.0)
    }
}

/// Computes the default shares of every candidate from the survey proportions.
///
/// The undecided voters are split evenly between the two contenders. The
/// non-voters are scaled by the turnout ratio: the part that does not turn out
/// becomes their `none` share.
pub fn derive_defaults(table: &AggregatedTable, rules: &ProjectionRules) -> DefaultParameters {
    let ratio = turnout_ratio(table, rules.target_turnout);
    info!("derive_defaults: non-voter turnout ratio: {}", ratio);
    let shares: Vec<ShareTriple> = table
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let a_share = c.to_a + 0.5 * c.unsure;
            let b_share = c.to_b + 0.5 * c.unsure;
            let triple = if table.is_non_voter(CandidateIndex(idx)) {
                ShareTriple {
                    to_a: ratio * a_share,
                    to_b: ratio * b_share,
                    none: 1.0 - ratio,
                }
            } else {
                ShareTriple {
                    to_a: a_share,
                    to_b: b_share,
                    none: c.abstain,
                }
            };
            let rounded = ShareTriple {
                to_a: round_to(triple.to_a, 4),
                to_b: round_to(triple.to_b, 4),
                none: round_to(triple.none, 4),
            };
            debug!("derive_defaults: {}: {:?}", c.name, rounded);
            rounded
        })
        .collect();
    DefaultParameters::new(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, vote_count: f64, to_a: f64, to_b: f64, abstain: f64, unsure: f64) -> AggregatedCandidate {
        AggregatedCandidate {
            name: name.to_string(),
            vote_count,
            to_a,
            to_b,
            abstain,
            unsure,
        }
    }

    fn table(voters: f64, non_voters: f64) -> AggregatedTable {
        AggregatedTable {
            candidates: vec![
                candidate("Alice", voters, 0.5, 0.2, 0.1, 0.2),
                candidate("Nonvoters", non_voters, 0.4, 0.3, 0.0, 0.3),
            ],
            non_voter: CandidateIndex(1),
        }
    }

    #[test]
    fn turnout_uplift_example() {
        // 1000 people, 300 non-voters: current turnout 700, target 730.
        let t = table(700.0, 300.0);
        let ratio = turnout_ratio(&t, DEFAULT_TARGET_TURNOUT);
        assert!((ratio - 0.1).abs() < 1e-9);

        let defaults = derive_defaults(&t, &ProjectionRules::default_rules());
        let nv = defaults.get(CandidateIndex(1)).unwrap();
        assert!((nv.to_a - 0.055).abs() < 1e-9);
        assert!((nv.to_b - 0.045).abs() < 1e-9);
        assert!((nv.none - 0.9).abs() < 1e-9);
    }

    #[test]
    fn ordinary_candidates_split_the_undecided() {
        let defaults = derive_defaults(&table(700.0, 300.0), &ProjectionRules::default_rules());
        let alice = defaults.get(CandidateIndex(0)).unwrap();
        assert!((alice.to_a - 0.6).abs() < 1e-9);
        assert!((alice.to_b - 0.3).abs() < 1e-9);
        assert!((alice.none - 0.1).abs() < 1e-9);
    }

    #[test]
    fn turnout_already_above_target() {
        // Current turnout 900 out of 1000 is above 730.
        let t = table(900.0, 100.0);
        assert_eq!(turnout_ratio(&t, DEFAULT_TARGET_TURNOUT), 0.0);
        let defaults = derive_defaults(&t, &ProjectionRules::default_rules());
        let nv = defaults.get(CandidateIndex(1)).unwrap();
        assert_eq!(nv.to_a, 0.0);
        assert_eq!(nv.to_b, 0.0);
        assert_eq!(nv.none, 1.0);
    }

    #[test]
    fn turnout_ratio_is_capped() {
        // Nobody voted: every non-voter would have to turn out and more.
        let t = table(0.0, 1000.0);
        assert_eq!(turnout_ratio(&t, 1.5), 1.0);
    }

    #[test]
    fn no_uplift_without_a_non_voter_entry() {
        let mut t = table(700.0, 300.0);
        t.non_voter = CandidateIndex(5);
        assert!(t.non_voter().is_none());
        assert_eq!(turnout_ratio(&t, DEFAULT_TARGET_TURNOUT), 0.0);
    }

    #[test]
    fn defaults_are_rounded_to_four_places() {
        let t = AggregatedTable {
            candidates: vec![
                candidate("Alice", 10.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 0.0),
                candidate("Nonvoters", 10.0, 0.0, 0.0, 1.0, 0.0),
            ],
            non_voter: CandidateIndex(1),
        };
        let defaults = derive_defaults(&t, &ProjectionRules::default_rules());
        assert_eq!(defaults.get(CandidateIndex(0)).unwrap().to_a, 0.3333);
    }
}
