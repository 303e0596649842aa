use std::collections::HashMap;

use crate::survey::*;

/// Given the header of a file (names of each of the columns) and the names of
/// the required columns, finds the index of each required column.
pub fn get_col_index_mapping(
    req_col_names: &[String],
    header: &[Option<String>],
) -> SurveyResult<Vec<usize>> {
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, x)| x.as_ref().map(|s| (s.trim().to_string(), idx)))
        .collect();

    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<usize> = Vec::new();
    for cname in req_col_names {
        let idx = col_names
            .get(cname.trim())
            .context(MissingColumnSnafu {
                column_name: cname.clone(),
            })?;
        col_indexes.push(*idx);
    }
    Ok(col_indexes)
}

/// Reads a number typed as text. Accepts a decimal comma and a trailing `%`,
/// in which case the value is divided by 100.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim().replace(',', ".");
    if let Some(p) = t.strip_suffix('%') {
        p.trim().parse::<f64>().ok().map(|x| x / 100.0)
    } else {
        t.parse::<f64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_columns_by_name() {
        let header = vec![
            Some("Imie".to_string()),
            None,
            Some(" Liczba glosow ".to_string()),
        ];
        let idx = get_col_index_mapping(&["Liczba glosow".to_string(), "Imie".to_string()], &header)
            .unwrap();
        assert_eq!(idx, vec![2, 0]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let header = vec![Some("Imie".to_string())];
        let err = get_col_index_mapping(&["Nie wie".to_string()], &header).unwrap_err();
        assert!(err.to_string().contains("Nie wie"));
    }

    #[test]
    fn parses_numbers_typed_as_text() {
        assert_eq!(parse_number("0,25"), Some(0.25));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("40%"), Some(0.4));
        assert_eq!(parse_number("abc"), None);
    }
}
