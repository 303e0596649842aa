use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::config::*;

// Running sums for one group, before dividing by the vote count.
#[derive(Debug, Clone, Default)]
struct WeightedSums {
    vote_count: f64,
    to_a: f64,
    to_b: f64,
    abstain: f64,
    unsure: f64,
}

impl WeightedSums {
    fn add(&mut self, row: &RawRow) {
        let w = row.vote_count;
        self.vote_count += w;
        self.to_a += row.to_a * w;
        self.to_b += row.to_b * w;
        self.abstain += row.abstain * w;
        self.unsure += row.unsure * w;
    }

    fn finish(&self, name: &str) -> Result<AggregatedCandidate, ConfigurationError> {
        if self.vote_count <= 0.0 {
            return Err(ConfigurationError::ZeroVoteGroup(name.to_string()));
        }
        Ok(AggregatedCandidate {
            name: name.to_string(),
            vote_count: self.vote_count,
            to_a: self.to_a / self.vote_count,
            to_b: self.to_b / self.vote_count,
            abstain: self.abstain / self.vote_count,
            unsure: self.unsure / self.vote_count,
        })
    }
}

/// Merges the minor candidates and puts all the candidates in canonical order.
///
/// The proportions of a merged entry are averages weighted by the vote counts
/// of its rows. Rows sharing the same name are merged as well.
///
/// The canonical order is:
/// - the candidates of the curated order that are present in the data,
/// - the other candidates, in the order they first appear in the input,
/// - the merged minor candidates,
/// - the non-voters.
pub fn aggregate(
    rows: &[RawRow],
    rules: &ProjectionRules,
) -> Result<AggregatedTable, ConfigurationError> {
    if rows.is_empty() {
        return Err(ConfigurationError::EmptyTable);
    }
    let minor: HashSet<&str> = rules.minor_candidates.iter().map(|s| s.as_str()).collect();

    // Group names in order of first appearance.
    let mut seen_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, WeightedSums> = HashMap::new();
    for row in rows.iter() {
        if !row.vote_count.is_finite() || row.vote_count < 0.0 {
            return Err(ConfigurationError::InvalidVoteCount(row.name.clone()));
        }
        let group_name = if minor.contains(row.name.as_str()) {
            rules.grouped_name.clone()
        } else {
            row.name.clone()
        };
        debug!("aggregate: row {:?} -> group {:?}", row, group_name);
        if !groups.contains_key(&group_name) {
            seen_order.push(group_name.clone());
        }
        groups.entry(group_name).or_default().add(row);
    }

    if !groups.contains_key(&rules.non_voter_name) {
        return Err(ConfigurationError::MissingNonVoters(
            rules.non_voter_name.clone(),
        ));
    }

    // Each group appears once, even if the curated order repeats a name.
    let mut ordered_names: Vec<String> = Vec::new();
    for name in rules.candidate_order.iter() {
        if groups.contains_key(name)
            && !ordered_names.contains(name)
            && *name != rules.grouped_name
            && *name != rules.non_voter_name
        {
            ordered_names.push(name.clone());
        }
    }
    for name in seen_order.iter() {
        if !ordered_names.contains(name)
            && *name != rules.grouped_name
            && *name != rules.non_voter_name
        {
            ordered_names.push(name.clone());
        }
    }
    if groups.contains_key(&rules.grouped_name) {
        ordered_names.push(rules.grouped_name.clone());
    }
    ordered_names.push(rules.non_voter_name.clone());

    let mut candidates: Vec<AggregatedCandidate> = Vec::new();
    for name in ordered_names.iter() {
        let c = groups[name].finish(name)?;
        debug!("aggregate: candidate {:?}", c);
        candidates.push(c);
    }
    info!(
        "aggregate: {} rows collapsed into {} candidates: {:?}",
        rows.len(),
        candidates.len(),
        ordered_names
    );

    let non_voter = CandidateIndex(candidates.len() - 1);
    Ok(AggregatedTable {
        candidates,
        non_voter,
    })
}
