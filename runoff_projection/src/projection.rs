use log::{debug, info};

use crate::config::*;

/// Computes the runoff totals from a snapshot of the fractions.
///
/// The part of each electorate that is not assigned to a contender or to
/// abstention is split evenly between the two contenders. Explicit shares
/// adding up to more than 1 are kept as they are and leave nothing undecided.
///
/// First-round voters all vote again. For the non-voters, the sum of the three
/// shares is the fraction that turns out.
pub fn compute_projection(table: &AggregatedTable, snapshot: &[ShareTriple]) -> Projection {
    let mut res = Projection::default();
    for (idx, (c, shares)) in table.candidates.iter().zip(snapshot.iter()).enumerate() {
        let explicit = shares.total();
        let undecided = (1.0 - explicit).max(0.0);
        let votes = if table.is_non_voter(CandidateIndex(idx)) {
            c.vote_count * explicit
        } else {
            c.vote_count
        };
        let to_a = votes * (shares.to_a + 0.5 * undecided);
        let to_b = votes * (shares.to_b + 0.5 * undecided);
        debug!(
            "compute_projection: {}: votes: {} undecided: {} -> a: {} b: {}",
            c.name, votes, undecided, to_a, to_b
        );
        res.outcome_a += to_a;
        res.outcome_b += to_b;
    }
    info!("compute_projection: {:?}", res);
    res
}

impl Projection {
    pub fn total(&self) -> f64 {
        self.outcome_a + self.outcome_b
    }

    /// Share of the first contender in the two-way total, 0 if there are no votes.
    pub fn share_a(&self) -> f64 {
        if self.total() > 0.0 {
            self.outcome_a / self.total()
        } else {
            0.0
        }
    }

    pub fn share_b(&self) -> f64 {
        if self.total() > 0.0 {
            self.outcome_b / self.total()
        } else {
            0.0
        }
    }

    /// Human-readable summary with the vote totals rounded to integers.
    pub fn summary(&self, name_a: &str, name_b: &str) -> String {
        format!(
            "Projected Votes — {}: {}, {}: {}",
            name_a,
            format_votes(self.outcome_a),
            name_b,
            format_votes(self.outcome_b)
        )
    }
}

/// Rounds to an integer and groups the digits by thousands: `1234567.6` -> `1,234,568`.
pub fn format_votes(x: f64) -> String {
    let rounded = x.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut res = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            res.push(',');
        }
        res.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", res)
    } else {
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, vote_count: f64) -> AggregatedCandidate {
        AggregatedCandidate {
            name: name.to_string(),
            vote_count,
            to_a: 0.0,
            to_b: 0.0,
            abstain: 0.0,
            unsure: 0.0,
        }
    }

    fn table() -> AggregatedTable {
        AggregatedTable {
            candidates: vec![candidate("A", 100.0), candidate("Nonvoters", 50.0)],
            non_voter: CandidateIndex(1),
        }
    }

    fn triple(to_a: f64, to_b: f64, none: f64) -> ShareTriple {
        ShareTriple { to_a, to_b, none }
    }

    #[test]
    fn end_to_end_example() {
        let p = compute_projection(&table(), &[triple(0.6, 0.3, 0.1), triple(0.2, 0.1, 0.7)]);
        assert!((p.outcome_a - 70.0).abs() < 1e-9);
        assert!((p.outcome_b - 35.0).abs() < 1e-9);
        assert!((p.share_a() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn undecided_is_split_evenly() {
        let p = compute_projection(&table(), &[triple(0.4, 0.2, 0.0), triple(0.0, 0.0, 0.0)]);
        // 40% undecided: 20 more for each side. Nobody turns out among the non-voters.
        assert!((p.outcome_a - 60.0).abs() < 1e-9);
        assert!((p.outcome_b - 40.0).abs() < 1e-9);
    }

    #[test]
    fn overflowing_shares_are_not_reduced() {
        let p = compute_projection(&table(), &[triple(0.8, 0.5, 0.0), triple(0.0, 0.0, 1.0)]);
        assert!((p.outcome_a - 80.0).abs() < 1e-9);
        assert!((p.outcome_b - 50.0).abs() < 1e-9);
    }

    #[test]
    fn increasing_a_share_increases_outcome_a() {
        let t = table();
        let mut last = compute_projection(&t, &[triple(0.1, 0.3, 0.1), triple(0.2, 0.1, 0.7)]);
        for step in 2..6 {
            let to_a = 0.1 * step as f64;
            let p = compute_projection(&t, &[triple(to_a, 0.3, 0.1), triple(0.2, 0.1, 0.7)]);
            assert!(p.outcome_a > last.outcome_a);
            last = p;
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let snapshot = [triple(0.33, 0.41, 0.05), triple(0.02, 0.03, 0.5)];
        assert_eq!(
            compute_projection(&table(), &snapshot),
            compute_projection(&table(), &snapshot)
        );
    }

    #[test]
    fn empty_projection_has_zero_shares() {
        let p = Projection::default();
        assert_eq!(p.share_a(), 0.0);
        assert_eq!(p.share_b(), 0.0);
    }

    #[test]
    fn summary_rounds_and_groups_digits() {
        let p = Projection {
            outcome_a: 1234567.6,
            outcome_b: 999.4,
        };
        assert_eq!(
            p.summary("Alice", "Bob"),
            "Projected Votes — Alice: 1,234,568, Bob: 999"
        );
        assert_eq!(format_votes(0.2), "0");
        assert_eq!(format_votes(1000.0), "1,000");
    }
}
