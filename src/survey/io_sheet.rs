// Reading the survey table from a spreadsheet.

use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::survey::{
    io_common::{get_col_index_mapping, parse_number},
    *,
};

pub fn read_survey_table(path: &str, source: &SurveySource) -> BSurveyResult<Vec<RawRow>> {
    let wrange = get_range(path, source)?;
    let res = read_rows(&wrange, path, source)?;
    info!("read_survey_table: read {} rows from {:?}", res.len(), path);
    Ok(res)
}

/// Reads the rows below the header. Rows without a name are skipped.
fn read_rows(
    wrange: &Range<DataType>,
    path: &str,
    source: &SurveySource,
) -> SurveyResult<Vec<RawRow>> {
    let mut iter = wrange.rows();
    let header = iter.next().context(EmptySheetSnafu { path })?;
    debug!("read_survey_table: header: {:?}", header);
    let col_indexes = get_col_index(&source.column_names(), header)?;
    debug!("read_survey_table: col_indexes: {:?}", col_indexes);

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        debug!("read_survey_table: lineno: {:?} row: {:?}", lineno, row);
        let name = match row.get(col_indexes[0]) {
            Some(DataType::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(DataType::Int(i)) => i.to_string(),
            _ => {
                debug!("read_survey_table: lineno: {:?}: no name, skipping", lineno);
                continue;
            }
        };
        let mut values: Vec<f64> = Vec::new();
        for col_idx in col_indexes[1..].iter() {
            values.push(read_number(row.get(*col_idx), lineno)?);
        }
        res.push(RawRow {
            name,
            vote_count: values[0],
            to_a: values[1],
            to_b: values[2],
            abstain: values[3],
            unsure: values[4],
        });
    }
    Ok(res)
}

fn read_number(cell: Option<&DataType>, lineno: usize) -> SurveyResult<f64> {
    match cell {
        Some(DataType::Float(f)) => Ok(*f),
        Some(DataType::Int(i)) => Ok(*i as f64),
        // Blank cells count as zero.
        None | Some(DataType::Empty) => Ok(0.0),
        Some(DataType::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(DataType::String(s)) => parse_number(s).context(WrongCellTypeSnafu {
            lineno,
            content: s.clone(),
        }),
        Some(x) => WrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

fn get_col_index(req_col_names: &[String], header: &[DataType]) -> SurveyResult<Vec<usize>> {
    let remapped: Vec<Option<String>> = header
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect();
    get_col_index_mapping(req_col_names, &remapped)
}

fn get_range(path: &str, source: &SurveySource) -> BSurveyResult<Range<DataType>> {
    let worksheet_name_o = source.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook = open_workbook_auto(path).context(OpeningSheetSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(worksheet_name) = worksheet_name_o {
        workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
            })?
            .context(OpeningSheetSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptySheetSnafu { path })?
            .context(OpeningSheetSnafu { path })?
    };
    Ok(wrange)
}
