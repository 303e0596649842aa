use crate::survey::*;

use runoff_projection::{ProjectionRules, DEFAULT_TARGET_TURNOUT};
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub contenders: Vec<String>,
    #[serde(rename = "targetTurnout")]
    pub target_turnout: f64,
}

/// Where the survey table comes from, and the names of its columns.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveySource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "nameColumn")]
    _name_column: Option<String>,
    #[serde(rename = "countColumn")]
    _count_column: Option<String>,
    #[serde(rename = "toAColumn")]
    _to_a_column: Option<String>,
    #[serde(rename = "toBColumn")]
    _to_b_column: Option<String>,
    #[serde(rename = "abstainColumn")]
    _abstain_column: Option<String>,
    #[serde(rename = "unsureColumn")]
    _unsure_column: Option<String>,
}

impl SurveySource {
    pub fn new(file_path: &str) -> SurveySource {
        SurveySource {
            file_path: file_path.to_string(),
            ..Default::default()
        }
    }

    /// The columns of the table: name, count, to A, to B, abstain, unsure.
    pub fn column_names(&self) -> [String; 6] {
        let col = |c: &Option<String>, default: &str| c.clone().unwrap_or_else(|| default.to_string());
        [
            col(&self._name_column, "Imie"),
            col(&self._count_column, "Liczba glosow"),
            col(&self._to_a_column, "Do Trzaskowskiego"),
            col(&self._to_b_column, "Do Nawrockiego"),
            col(&self._abstain_column, "Nie glosuje"),
            col(&self._unsure_column, "Nie wie"),
        ]
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Contenders {
    pub a: String,
    pub b: String,
}

impl Default for Contenders {
    fn default() -> Self {
        Contenders {
            a: "Trzaskowski".to_string(),
            b: "Nawrocki".to_string(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyRules {
    #[serde(rename = "minorCandidates")]
    pub minor_candidates: Option<Vec<String>>,
    #[serde(rename = "groupedName")]
    pub grouped_name: Option<String>,
    #[serde(rename = "nonVoterName")]
    pub non_voter_name: Option<String>,
    #[serde(rename = "candidateOrder")]
    pub candidate_order: Option<Vec<String>>,
    #[serde(rename = "targetTurnout")]
    pub target_turnout: Option<f64>,
}

impl SurveyRules {
    /// The projection rules, with the missing options taken from the defaults.
    pub fn projection_rules(&self) -> SurveyResult<ProjectionRules> {
        let d = ProjectionRules::default_rules();
        let target_turnout = self.target_turnout.unwrap_or(DEFAULT_TARGET_TURNOUT);
        if !(0.0..=1.0).contains(&target_turnout) {
            whatever!(
                "targetTurnout must be a fraction between 0 and 1, got {}",
                target_turnout
            )
        }
        Ok(ProjectionRules {
            minor_candidates: self.minor_candidates.clone().unwrap_or(d.minor_candidates),
            grouped_name: self.grouped_name.clone().unwrap_or(d.grouped_name),
            non_voter_name: self.non_voter_name.clone().unwrap_or(d.non_voter_name),
            candidate_order: self.candidate_order.clone().unwrap_or(d.candidate_order),
            target_turnout,
        })
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "surveySource")]
    pub survey_source: SurveySource,
    pub contenders: Option<Contenders>,
    pub rules: Option<SurveyRules>,
}

impl SurveyConfig {
    /// Configuration with all the defaults, reading the given spreadsheet.
    pub fn for_input(file_path: &str) -> SurveyConfig {
        SurveyConfig {
            output_settings: None,
            survey_source: SurveySource::new(file_path),
            contenders: None,
            rules: None,
        }
    }

    pub fn contenders(&self) -> Contenders {
        self.contenders.clone().unwrap_or_default()
    }

    pub fn projection_rules(&self) -> SurveyResult<ProjectionRules> {
        self.rules.clone().unwrap_or_default().projection_rules()
    }

    pub fn contest_name(&self) -> String {
        self.output_settings
            .as_ref()
            .map(|o| o.contest_name.clone())
            .unwrap_or_else(|| "Runoff projection".to_string())
    }
}

pub fn read_config(path: &str) -> BSurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: SurveyConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> BSurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: SurveyConfig =
            serde_json::from_str(r#"{"surveySource": {"filePath": "wybory.ods"}}"#).unwrap();
        assert_eq!(config.survey_source.file_path, "wybory.ods");
        assert_eq!(config.survey_source.column_names()[1], "Liczba glosow");
        assert_eq!(config.contenders(), Contenders::default());
        let rules = config.projection_rules().unwrap();
        assert_eq!(rules, ProjectionRules::default_rules());
        assert_eq!(config.contest_name(), "Runoff projection");
    }

    #[test]
    fn overrides_are_applied() {
        let config: SurveyConfig = serde_json::from_str(
            r#"{
                "outputSettings": {"contestName": "Test"},
                "surveySource": {"filePath": "s.xlsx", "countColumn": "Votes", "excelWorksheetName": "Data"},
                "contenders": {"a": "Alice", "b": "Bob"},
                "rules": {"nonVoterName": "Abstainers", "targetTurnout": 0.6}
            }"#,
        )
        .unwrap();
        assert_eq!(config.survey_source.column_names()[1], "Votes");
        assert_eq!(config.survey_source.column_names()[0], "Imie");
        assert_eq!(
            config.survey_source.excel_worksheet_name,
            Some("Data".to_string())
        );
        assert_eq!(config.contenders().a, "Alice");
        let rules = config.projection_rules().unwrap();
        assert_eq!(rules.non_voter_name, "Abstainers");
        assert_eq!(rules.target_turnout, 0.6);
        assert_eq!(rules.grouped_name, "Inni prawica");
        assert_eq!(config.contest_name(), "Test");
    }

    #[test]
    fn rejects_turnout_out_of_range() {
        let rules = SurveyRules {
            target_turnout: Some(73.0),
            ..Default::default()
        };
        assert!(rules.projection_rules().is_err());
    }
}
