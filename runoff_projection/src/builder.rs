pub use crate::config::*;
use crate::Projector;

/// A builder for assembling the survey table row by row.
///
/// ```
/// pub use runoff_projection::builder::Builder;
/// pub use runoff_projection::ProjectionRules;
/// # use runoff_projection::ConfigurationError;
///
/// let mut builder = Builder::new(&ProjectionRules::default_rules())?
///     .contenders("Trzaskowski", "Nawrocki")?;
///
/// builder.add_row("Mentzen", 1000.0, &[0.1, 0.7, 0.1, 0.1])?;
/// builder.add_row("Nieglosujacy", 500.0, &[0.3, 0.3, 0.2, 0.2])?;
///
/// let projector = builder.build()?;
/// assert_eq!(projector.table().len(), 2);
///
/// # Ok::<(), ConfigurationError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ProjectionRules,
    pub(crate) _contenders: (String, String),
    pub(crate) _rows: Vec<RawRow>,
}

impl Builder {
    pub fn new(rules: &ProjectionRules) -> Result<Builder, ConfigurationError> {
        Ok(Builder {
            _rules: rules.clone(),
            _contenders: ("A".to_string(), "B".to_string()),
            _rows: Vec::new(),
        })
    }

    /// Names of the two runoff contenders, used for display only.
    pub fn contenders(self, a: &str, b: &str) -> Result<Builder, ConfigurationError> {
        Ok(Builder {
            _rules: self._rules,
            _contenders: (a.to_string(), b.to_string()),
            _rows: self._rows,
        })
    }

    /// Adds a row of the survey.
    ///
    /// proportions: the fractions of the voters going to A, going to B,
    /// abstaining and undecided, in this order. Missing trailing values are 0.
    pub fn add_row(
        &mut self,
        name: &str,
        vote_count: f64,
        proportions: &[f64],
    ) -> Result<(), ConfigurationError> {
        let p = |idx: usize| proportions.get(idx).cloned().unwrap_or(0.0);
        self.add_raw_row(&RawRow {
            name: name.to_string(),
            vote_count,
            to_a: p(0),
            to_b: p(1),
            abstain: p(2),
            unsure: p(3),
        })
    }

    pub fn add_raw_row(&mut self, row: &RawRow) -> Result<(), ConfigurationError> {
        if !row.vote_count.is_finite() || row.vote_count < 0.0 {
            return Err(ConfigurationError::InvalidVoteCount(row.name.clone()));
        }
        self._rows.push(row.clone());
        Ok(())
    }

    pub fn build(self) -> Result<Projector, ConfigurationError> {
        Projector::new(&self._rows, &self._rules, self._contenders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_counts() {
        let mut builder = Builder::new(&ProjectionRules::default_rules()).unwrap();
        assert_eq!(
            builder.add_row("Mentzen", -3.0, &[0.5, 0.5]),
            Err(ConfigurationError::InvalidVoteCount("Mentzen".to_string()))
        );
    }

    #[test]
    fn missing_proportions_are_zero() {
        let mut builder = Builder::new(&ProjectionRules::default_rules()).unwrap();
        builder.add_row("Mentzen", 3.0, &[0.5]).unwrap();
        assert_eq!(builder._rows[0].to_b, 0.0);
        assert_eq!(builder._rows[0].unsure, 0.0);
    }

    #[test]
    fn empty_builder_fails() {
        let builder = Builder::new(&ProjectionRules::default_rules()).unwrap();
        assert_eq!(builder.build().err(), Some(ConfigurationError::EmptyTable));
    }
}
