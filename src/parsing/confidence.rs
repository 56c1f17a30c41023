use std::path::Path;

use crate::parsing::ParseError;

/// Maximum number of values read from a confidence file (DOS protection)
pub const MAX_VALUES: usize = 500_000_000;

/// Parse a confidence file: one probability per reference position.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_confidence_file(path: &Path) -> Result<Vec<f64>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_confidence_text(&content)
}

/// Parse confidence values separated by whitespace or commas.
///
/// Blank lines and lines starting with `#` are skipped. Values are not range
/// checked here; the model rejects anything outside [0, 1].
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a token is not a number or no values
/// are found, or `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_confidence_text(text: &str) -> Result<Vec<f64>, ParseError> {
    let mut values = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "Invalid confidence value on line {line_num}: '{token}'"
                ))
            })?;

            if values.len() >= MAX_VALUES {
                return Err(ParseError::TooManyRecords(values.len()));
            }
            values.push(value);
        }
    }

    if values.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No confidence values found".to_string(),
        ));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_one_per_line() {
        let values = parse_confidence_text("1.0\n0.9\n0.25\n").unwrap();
        assert_eq!(values, vec![1.0, 0.9, 0.25]);
    }

    #[test]
    fn test_parse_mixed_separators_and_comments() {
        let text = r"# confidence for chrT
0.99 0.98,0.97

# second block
1 0.5
";
        let values = parse_confidence_text(text).unwrap();
        assert_eq!(values, vec![0.99, 0.98, 0.97, 1.0, 0.5]);
    }

    #[test]
    fn test_out_of_range_values_are_kept() {
        // Range checking happens when the model is built
        let values = parse_confidence_text("1.5 -0.1").unwrap();
        assert_eq!(values, vec![1.5, -0.1]);
    }

    #[test]
    fn test_bad_token_reports_line() {
        let err = parse_confidence_text("0.9\n0.8\nhigh\n").unwrap_err();
        match err {
            ParseError::InvalidFormat(msg) => {
                assert!(msg.contains("line 3"), "{msg}");
                assert!(msg.contains("high"), "{msg}");
            }
            other => panic!("Expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_confidence_text("# nothing here\n\n").is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut temp = NamedTempFile::with_suffix(".prob").unwrap();
        writeln!(temp, "0.1 0.2 0.3").unwrap();
        temp.flush().unwrap();

        assert_eq!(parse_confidence_file(temp.path()).unwrap().len(), 3);
    }
}
