// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of the first-round survey table.
///
/// The proportions describe where the voters of this first-round candidate
/// say they will go in the runoff. They are expected to sum to about 1, but
/// this is not checked.
#[derive(PartialEq, Debug, Clone)]
pub struct RawRow {
    pub name: String,
    pub vote_count: f64,
    pub to_a: f64,
    pub to_b: f64,
    pub abstain: f64,
    pub unsure: f64,
}

// ******** Intermediate data structures *********

/// A first-round candidate after the minor candidates have been merged.
///
/// The proportions are weighted by the vote counts of the merged rows.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregatedCandidate {
    pub name: String,
    pub vote_count: f64,
    pub to_a: f64,
    pub to_b: f64,
    pub abstain: f64,
    pub unsure: f64,
}

/// Position of a candidate in the canonical candidate order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateIndex(pub usize);

/// The aggregated candidates, in canonical order.
///
/// Invariant: the non-voter entity is always the last candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregatedTable {
    pub candidates: Vec<AggregatedCandidate>,
    pub non_voter: CandidateIndex,
}

impl AggregatedTable {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, idx: CandidateIndex) -> Option<&AggregatedCandidate> {
        self.candidates.get(idx.0)
    }

    /// The non-voter entity, None if the index is outside the table.
    pub fn non_voter(&self) -> Option<&AggregatedCandidate> {
        self.candidates.get(self.non_voter.0)
    }

    pub fn is_non_voter(&self, idx: CandidateIndex) -> bool {
        idx == self.non_voter
    }

    /// Finds a candidate by its exact name.
    pub fn find(&self, name: &str) -> Option<CandidateIndex> {
        self.candidates
            .iter()
            .position(|c| c.name == name)
            .map(CandidateIndex)
    }

    pub fn names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    pub fn total_votes(&self) -> f64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }
}

/// The three shares of a candidate's electorate that can be adjusted.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum ShareKind {
    /// Goes to the first runoff contender.
    ToA,
    /// Goes to the second runoff contender.
    ToB,
    /// Abstains, or for the non-voters, does not turn out.
    None,
}

impl ShareKind {
    pub const ALL: [ShareKind; 3] = [ShareKind::ToA, ShareKind::ToB, ShareKind::None];

    pub fn offset(&self) -> usize {
        match self {
            ShareKind::ToA => 0,
            ShareKind::ToB => 1,
            ShareKind::None => 2,
        }
    }
}

/// Identifier of one adjustable parameter.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct FieldId {
    pub candidate: CandidateIndex,
    pub kind: ShareKind,
}

impl FieldId {
    pub fn new(candidate: usize, kind: ShareKind) -> FieldId {
        FieldId {
            candidate: CandidateIndex(candidate),
            kind,
        }
    }
}

/// The default shares of one candidate, as derived from the survey.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct ShareTriple {
    pub to_a: f64,
    pub to_b: f64,
    pub none: f64,
}

impl ShareTriple {
    pub fn get(&self, kind: ShareKind) -> f64 {
        match kind {
            ShareKind::ToA => self.to_a,
            ShareKind::ToB => self.to_b,
            ShareKind::None => self.none,
        }
    }

    pub fn total(&self) -> f64 {
        self.to_a + self.to_b + self.none
    }
}

/// Default shares for every candidate, in canonical order.
///
/// Computed once and never modified: resetting the parameters reads from here.
#[derive(PartialEq, Debug, Clone)]
pub struct DefaultParameters {
    pub(crate) shares: Vec<ShareTriple>,
}

impl DefaultParameters {
    pub fn new(shares: Vec<ShareTriple>) -> DefaultParameters {
        DefaultParameters { shares }
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn get(&self, idx: CandidateIndex) -> Option<&ShareTriple> {
        self.shares.get(idx.0)
    }

    pub fn value(&self, field: FieldId) -> Option<f64> {
        self.get(field.candidate).map(|t| t.get(field.kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShareTriple> {
        self.shares.iter()
    }
}

// ******** Output data structures *********

/// The projected totals for the two runoff contenders.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Projection {
    pub outcome_a: f64,
    pub outcome_b: f64,
}

/// A candidate whose explicit shares add up to more than 100%.
#[derive(PartialEq, Debug, Clone)]
pub struct ValidationWarning {
    pub candidate: String,
    pub total_percent: f64,
}

impl Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "⚠️ {}: Total exceeds 100%.", self.candidate)
    }
}

/// Errors that prevent the projection table from being built.
#[derive(PartialEq, Debug, Clone)]
pub enum ConfigurationError {
    EmptyTable,
    /// A candidate (or group of merged candidates) has no votes at all, so
    /// its proportions cannot be weighted.
    ZeroVoteGroup(String),
    InvalidVoteCount(String),
    MissingNonVoters(String),
}

impl Error for ConfigurationError {}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::EmptyTable => write!(f, "the survey table is empty"),
            ConfigurationError::ZeroVoteGroup(name) => {
                write!(f, "candidate {} has a total vote count of zero", name)
            }
            ConfigurationError::InvalidVoteCount(name) => {
                write!(f, "candidate {} has an invalid vote count", name)
            }
            ConfigurationError::MissingNonVoters(name) => {
                write!(f, "the non-voter entry {} is missing from the table", name)
            }
        }
    }
}

// ********* Configuration **********

/// The turnout the non-voters are scaled up to reach, as a fraction of all
/// the people in the survey table.
pub const DEFAULT_TARGET_TURNOUT: f64 = 0.73;

#[derive(PartialEq, Debug, Clone)]
pub struct ProjectionRules {
    /// Names of the minor candidates merged into a single entry.
    pub minor_candidates: Vec<String>,
    /// Name of the merged entry.
    pub grouped_name: String,
    /// Name of the row holding the people who did not vote in the first round.
    pub non_voter_name: String,
    /// Display order of the named candidates. Candidates absent from the data are skipped.
    pub candidate_order: Vec<String>,
    pub target_turnout: f64,
}

impl ProjectionRules {
    pub fn default_rules() -> ProjectionRules {
        let names = |l: &[&str]| -> Vec<String> { l.iter().map(|s| s.to_string()).collect() };
        ProjectionRules {
            minor_candidates: names(&["Jakubiak", "Bartoszewicz", "Maciak", "Woch"]),
            grouped_name: "Inni prawica".to_string(),
            non_voter_name: "Nieglosujacy".to_string(),
            candidate_order: names(&[
                "Trzaskowski",
                "Nawrocki",
                "Mentzen",
                "Braun",
                "Holownia",
                "Zandberg",
                "Biejat",
                "Senyszyn",
                "Stanowski",
            ]),
            target_turnout: DEFAULT_TARGET_TURNOUT,
        }
    }
}

impl Default for ProjectionRules {
    fn default() -> Self {
        ProjectionRules::default_rules()
    }
}
