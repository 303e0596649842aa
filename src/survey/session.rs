// A line-oriented session to adjust the parameters and compute the projection.

use std::fmt::Write as FmtWrite;
use std::io::{BufRead, Write};

use crate::survey::{io_common::parse_number, *};

/// A command typed in the session.
#[derive(PartialEq, Debug, Clone)]
pub enum Command {
    Show,
    Edit(SyncEvent),
    Update,
    Warnings,
    Help,
    Quit,
}

const HELP: &str = "Commands:
  show                            list all the parameters
  pct <candidate> <a|b|none> [v]  set a share as a percentage (0-100)
  slide <candidate> <a|b|none> [v] set a share as a fraction (0-1)
  reset                           restore all the default parameters
  update                          compute the projection
  warnings                        list the candidates above 100%
  help                            this message
  quit                            leave
Candidates are given by number or by name. A missing value counts as 0.";

fn parse_kind(s: &str) -> Option<ShareKind> {
    match s.to_lowercase().as_str() {
        "a" | "toa" => Some(ShareKind::ToA),
        "b" | "tob" => Some(ShareKind::ToB),
        "none" | "abstain" => Some(ShareKind::None),
        _ => None,
    }
}

fn find_candidate(name: &str, table: &AggregatedTable) -> SurveyResult<CandidateIndex> {
    if let Ok(num) = name.parse::<usize>() {
        if num >= 1 && num <= table.len() {
            return Ok(CandidateIndex(num - 1));
        }
    }
    table
        .find(name)
        .or_else(|| {
            table
                .candidates
                .iter()
                .position(|c| c.name.to_lowercase() == name.to_lowercase())
                .map(CandidateIndex)
        })
        .context(UnknownCandidateSnafu { name })
}

/// Parses a line of input. Values that cannot be read as numbers count as missing.
pub fn parse_command(line: &str, table: &AggregatedTable) -> SurveyResult<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [] | ["show"] => Ok(Command::Show),
        ["reset"] => Ok(Command::Edit(SyncEvent::Reset)),
        ["update"] => Ok(Command::Update),
        ["warnings"] => Ok(Command::Warnings),
        ["help"] => Ok(Command::Help),
        ["quit"] | ["exit"] => Ok(Command::Quit),
        [cmd @ ("pct" | "slide"), rest @ ..] if rest.len() >= 2 => {
            // The value is optional: look at the end of the line first.
            let (cand_tokens, kind, value) = match rest {
                [c @ .., k] if parse_kind(k).is_some() => (c, parse_kind(k), None),
                [c @ .., k, v] => (c, parse_kind(k), Some(*v)),
                _ => (rest, None, None),
            };
            let kind = kind.context(UnknownCommandSnafu { line })?;
            if cand_tokens.is_empty() {
                return UnknownCommandSnafu { line }.fail();
            }
            let candidate = find_candidate(&cand_tokens.join(" "), table)?;
            let field = FieldId { candidate, kind };
            let value = value.and_then(|v| {
                let t = v.trim_end_matches('%').replace(',', ".");
                parse_number(&t)
            });
            Ok(Command::Edit(if *cmd == "pct" {
                SyncEvent::PercentEdited { field, value }
            } else {
                SyncEvent::FractionEdited { field, value }
            }))
        }
        _ => UnknownCommandSnafu { line }.fail(),
    }
}

fn kind_label(kind: ShareKind, projector: &Projector) -> String {
    let (a, b) = projector.contenders();
    match kind {
        ShareKind::ToA => format!("to {}", a),
        ShareKind::ToB => format!("to {}", b),
        ShareKind::None => "abstain".to_string(),
    }
}

fn render_field(out: &mut String, projector: &Projector, field: FieldId, v: FieldValue) {
    let _ = write!(
        out,
        "  {:<16} {:>6.3} ({:>5.1}%)",
        kind_label(field.kind, projector),
        v.fraction,
        v.percent
    );
}

pub fn render_fields(projector: &Projector) -> String {
    let mut out = String::new();
    let table = projector.table();
    for (field, v) in projector.store().fields() {
        if field.kind == ShareKind::ToA {
            let c = &table.candidates[field.candidate.0];
            let _ = writeln!(
                out,
                "{}. {} ({} votes)",
                field.candidate.0 + 1,
                c.name,
                format_votes(c.vote_count)
            );
        }
        render_field(&mut out, projector, field, v);
        out.push('\n');
    }
    out
}

pub fn render_warnings(projector: &Projector) -> String {
    let warnings = projector.warnings();
    if warnings.is_empty() {
        return "No warnings.\n".to_string();
    }
    let mut out = String::new();
    for w in warnings.iter() {
        let _ = writeln!(out, "{}", w);
    }
    out
}

const CHART_WIDTH: usize = 40;

/// Both shares of the two-way total, a bar for the two slices, and the summary.
pub fn render_projection(projector: &Projector, projection: &Projection) -> String {
    let (a, b) = projector.contenders();
    let mut out = String::new();
    let _ = writeln!(out, "{}: {:.2}%", a, projection.share_a() * 100.0);
    let _ = writeln!(out, "{}: {:.2}%", b, projection.share_b() * 100.0);
    let filled = (projection.share_a() * CHART_WIDTH as f64).round() as usize;
    let filled = filled.min(CHART_WIDTH);
    if projection.total() > 0.0 {
        let _ = writeln!(
            out,
            "[{}{}]",
            "#".repeat(filled),
            "-".repeat(CHART_WIDTH - filled)
        );
    }
    let _ = writeln!(out, "{}", projector.summary(projection));
    out
}

/// Runs one command. Returns the text to display, or None to stop.
pub fn run_command(projector: &mut Projector, command: &Command) -> Option<String> {
    match command {
        Command::Quit => None,
        Command::Help => Some(format!("{}\n", HELP)),
        Command::Show => Some(render_fields(projector)),
        Command::Warnings => Some(render_warnings(projector)),
        Command::Update => {
            let projection = projector.project();
            Some(render_projection(projector, &projection))
        }
        Command::Edit(event) => {
            let mut out = String::new();
            match projector.apply(event) {
                SyncOutcome::Updated(field, v) => {
                    let name = &projector.table().candidates[field.candidate.0].name;
                    let _ = write!(out, "{}:", name);
                    render_field(&mut out, projector, field, v);
                    out.push('\n');
                }
                SyncOutcome::ResetAll => {
                    out.push_str("All parameters reset to their defaults.\n");
                    out.push_str(&render_fields(projector));
                }
                SyncOutcome::UnknownField(field) => {
                    let _ = writeln!(out, "No such field: {:?}", field);
                }
            }
            // The warnings follow every change.
            let warnings = projector.warnings();
            for w in warnings.iter() {
                let _ = writeln!(out, "{}", w);
            }
            Some(out)
        }
    }
}

/// Reads commands until the end of the input or `quit`.
pub fn run_session<R: BufRead, W: Write>(
    projector: &mut Projector,
    input: R,
    output: &mut W,
) -> BSurveyResult<()> {
    let intro = format!("{}\n{}", render_fields(projector), render_warnings(projector));
    write_out(output, &intro)?;
    write_out(output, "> ")?;
    for line_r in input.lines() {
        let line = line_r.context(ReadingInputSnafu {})?;
        debug!("run_session: line: {:?}", line);
        let text = match parse_command(&line, projector.table()) {
            Ok(command) => match run_command(projector, &command) {
                Some(text) => text,
                None => return Ok(()),
            },
            Err(e) => format!("{}\n", e),
        };
        write_out(output, &text)?;
        write_out(output, "> ")?;
    }
    Ok(())
}

fn write_out<W: Write>(output: &mut W, text: &str) -> SurveyResult<()> {
    output
        .write_all(text.as_bytes())
        .and_then(|_| output.flush())
        .context(WritingOutputSnafu { path: "stdout" })
}
