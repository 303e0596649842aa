use log::{debug, info, warn};

use runoff_projection::*;
use snafu::prelude::*;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_sheet;
pub mod session;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningSheet {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} has no content"))]
    EmptySheet { path: String },
    #[snafu(display("Cannot find the worksheet {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Cannot find the column {column_name} in the header"))]
    MissingColumn { column_name: String },
    #[snafu(display("Line {lineno}: expected a number, found {content}"))]
    WrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the input"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("No survey file: use --input or --config"))]
    MissingInput {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid survey table: {source}"))]
    InvalidTable { source: ConfigurationError },
    #[snafu(display("Unknown candidate: {name}"))]
    UnknownCandidate { name: String },
    #[snafu(display("Unknown command: {line} (type help for the list of commands)"))]
    UnknownCommand { line: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;
pub type BSurveyResult<T> = Result<T, Box<SurveyError>>;

fn build_summary_js(config: &SurveyConfig, projector: &Projector, projection: &Projection) -> JSValue {
    let (a, b) = projector.contenders();
    let rules_turnout = config
        .projection_rules()
        .map(|r| r.target_turnout)
        .unwrap_or(DEFAULT_TARGET_TURNOUT);
    let c = OutputConfig {
        contest: config.contest_name(),
        contenders: vec![a.to_string(), b.to_string()],
        target_turnout: rules_turnout,
    };

    let mut candidates: Vec<JSValue> = Vec::new();
    let snapshot = projector.store().snapshot();
    for (cand, shares) in projector.table().candidates.iter().zip(snapshot.iter()) {
        candidates.push(json!({
            "name": cand.name,
            "voteCount": cand.vote_count,
            "toA": shares.to_a,
            "toB": shares.to_b,
            "none": shares.none,
        }));
    }

    let mut results: JSMap<String, JSValue> = JSMap::new();
    results.insert(a.to_string(), json!(projection.outcome_a.round()));
    results.insert(b.to_string(), json!(projection.outcome_b.round()));
    results.insert("shareA".to_string(), json!(round_to(projection.share_a(), 4)));
    results.insert("shareB".to_string(), json!(round_to(projection.share_b(), 4)));

    json!({
        "config": c,
        "candidates": candidates,
        "results": results,
        "summary": projector.summary(projection),
    })
}

/// Reads the survey table and builds the session state.
pub fn load_projector(config: &SurveyConfig, root: &Path) -> BSurveyResult<Projector> {
    let p: PathBuf = root.join(&config.survey_source.file_path);
    let path = p.as_path().display().to_string();
    info!("Attempting to read survey file {:?}", path);
    let rows = io_sheet::read_survey_table(&path, &config.survey_source)?;
    let rules = config.projection_rules()?;
    let contenders = config.contenders();
    let projector = Projector::new(&rows, &rules, (contenders.a, contenders.b))
        .context(InvalidTableSnafu {})?;
    Ok(projector)
}

fn write_summary(out: &str, js: &str) -> BSurveyResult<()> {
    if out == "stdout" {
        println!("{}", js);
    } else {
        fs::write(out, js).context(WritingOutputSnafu { path: out })?;
        info!("Summary written to {:?}", out);
    }
    Ok(())
}

/// Compares the summary with a reference summary. Both are normalized through serde_json.
pub fn check_reference(pretty_js_stats: &str, reference_path: &str) -> BSurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return Err(Box::new(SurveyError::Whatever {
            message: "Difference detected between calculated summary and reference summary"
                .to_string(),
            source: None,
        }));
    }
    Ok(())
}

/// Resolves the configuration from the command line: a configuration file,
/// an input file overriding its survey path, or both.
fn resolve_config(args: &Args) -> BSurveyResult<(SurveyConfig, PathBuf)> {
    let (mut config, root) = match (&args.config, &args.input) {
        (Some(config_path), _) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        (None, Some(input)) => (SurveyConfig::for_input(input), PathBuf::new()),
        (None, None) => return Err(Box::new(SurveyError::MissingInput {})),
    };
    // The input from the command line is relative to the current directory.
    if let Some(input) = &args.input {
        config.survey_source.file_path = input.clone();
        if args.config.is_some() {
            config.survey_source.file_path = fs::canonicalize(input)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| input.clone());
        }
    }
    if let Some(ws) = &args.excel_worksheet_name {
        config.survey_source.excel_worksheet_name = Some(ws.clone());
    }
    Ok((config, root))
}

pub fn run_projection(args: &Args) -> BSurveyResult<()> {
    let (config, root) = resolve_config(args)?;
    let mut projector = load_projector(&config, &root)?;

    if !args.batch {
        let stdin = io::stdin();
        let input = stdin.lock();
        let mut stdout = io::stdout();
        session::run_session(&mut projector, input, &mut stdout)?;
    }

    let projection = projector.project();
    for w in projector.warnings() {
        warn!("{}", w);
    }
    info!("{}", projector.summary(&projection));

    let out = args.out.clone().or_else(|| {
        config
            .output_settings
            .as_ref()
            .and_then(|o| o.output_path.clone())
    });
    if args.batch || out.is_some() || args.reference.is_some() {
        let result_js = build_summary_js(&config, &projector, &projection);
        let pretty_js_stats =
            serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
        write_summary(out.as_deref().unwrap_or("stdout"), &pretty_js_stats)?;

        // The reference summary, if provided for comparison
        if let Some(reference) = &args.reference {
            check_reference(&pretty_js_stats, reference)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use runoff_projection::builder::Builder;

    fn projector() -> Projector {
        let mut builder = Builder::new(&ProjectionRules::default_rules())
            .unwrap()
            .contenders("Trzaskowski", "Nawrocki")
            .unwrap();
        builder.add_row("Trzaskowski", 100.0, &[0.6, 0.3, 0.1, 0.0]).unwrap();
        builder.add_row("Nieglosujacy", 50.0, &[0.2, 0.1, 0.7, 0.0]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn summary_json_shape() {
        let p = projector();
        let projection = p.project();
        let config = SurveyConfig::for_input("wybory.ods");
        let js = build_summary_js(&config, &p, &projection);
        assert_eq!(js["config"]["contest"], json!("Runoff projection"));
        assert_eq!(js["config"]["targetTurnout"], json!(0.73));
        assert_eq!(js["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(js["candidates"][0]["name"], json!("Trzaskowski"));
        assert!(js["results"]["Trzaskowski"].is_number());
        assert!(js["results"]["shareA"].is_number());
        assert!(js["summary"]
            .as_str()
            .unwrap()
            .starts_with("Projected Votes — Trzaskowski:"));
    }

    #[test]
    fn missing_input_is_reported() {
        let args = Args {
            config: None,
            input: None,
            out: None,
            reference: None,
            excel_worksheet_name: None,
            batch: true,
            verbose: false,
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(matches!(*err, SurveyError::MissingInput {}));
    }

    #[test]
    fn input_without_config_uses_defaults() {
        let args = Args {
            config: None,
            input: Some("wybory.ods".to_string()),
            out: None,
            reference: None,
            excel_worksheet_name: Some("Arkusz1".to_string()),
            batch: true,
            verbose: false,
        };
        let (config, root) = resolve_config(&args).unwrap();
        assert_eq!(config.survey_source.file_path, "wybory.ods");
        assert_eq!(
            config.survey_source.excel_worksheet_name,
            Some("Arkusz1".to_string())
        );
        assert_eq!(root, PathBuf::new());
    }
}
