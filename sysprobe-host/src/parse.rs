//! Text micro-parsers for scraped command output
//!
//! Pure functions, compiled on every platform so they can be tested anywhere.

use crate::units::kb_to_mb;

/// Splits one CSV line on commas that are outside double-quoted spans.
///
/// Quote characters are kept in the returned fields; callers strip them.
/// A line ending in a bare comma yields a trailing empty field, an empty
/// line yields no fields.
pub fn split_quoted_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    if line.is_empty() {
        return fields;
    }

    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}

/// Removes one pair of surrounding double quotes, if present
pub fn strip_quotes(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parses a kilobyte count such as `"12,345 K"` and returns megabytes.
///
/// Invalid input yields 0.0.
pub fn parse_memory_kb_to_mb(value: &str) -> f64 {
    let value = value.trim();
    let value = value.strip_suffix(" K").unwrap_or(value);
    let digits: String = value.chars().filter(|c| *c != ',').collect();

    match digits.parse::<f64>() {
        Ok(kb) if kb.is_finite() && kb >= 0.0 => kb_to_mb(kb),
        _ => 0.0,
    }
}

/// Returns the trimmed text after the first `sep` when `line` contains `label`
pub fn label_value<'a>(line: &'a str, label: &str, sep: char) -> Option<&'a str> {
    if !line.contains(label) {
        return None;
    }
    line.split_once(sep).map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() / expected.abs() <= 0.001
    }

    #[test]
    fn test_split_tasklist_line() {
        let fields = split_quoted_csv(r#""sysinfo.exe","1234","Console","1","12,345 K""#);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], r#""sysinfo.exe""#);
        assert_eq!(fields[4], r#""12,345 K""#);
    }

    #[test]
    fn test_split_names_with_spaces_and_commas() {
        let fields = split_quoted_csv(r#""Name with spaces.exe","512","Console","0","5,432 K""#);
        assert_eq!(fields.len(), 5);
        assert_eq!(strip_quotes(&fields[0]), "Name with spaces.exe");

        let fields = split_quoted_csv(r#""a,b","1""#);
        assert_eq!(fields, vec![r#""a,b""#.to_string(), r#""1""#.to_string()]);
    }

    #[test]
    fn test_split_unquoted_and_trailing_separator() {
        assert_eq!(split_quoted_csv("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_quoted_csv("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_quoted_csv(",a"), vec!["", "a"]);
        assert!(split_quoted_csv("").is_empty());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""explorer.exe""#), "explorer.exe");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes(r#"""#), r#"""#);
    }

    #[test]
    fn test_parse_memory_string() {
        assert!(close(parse_memory_kb_to_mb("12,345 K"), 12.0459));
        assert_eq!(parse_memory_kb_to_mb("12,345 K"), 12345.0 / 1024.0);
        assert_eq!(parse_memory_kb_to_mb("1,234,567 K"), 1234567.0 / 1024.0);
        assert_eq!(parse_memory_kb_to_mb("512 K"), 0.5);
        assert_eq!(parse_memory_kb_to_mb("  2048  "), 2.0);
        assert_eq!(parse_memory_kb_to_mb("0 K"), 0.0);
    }

    #[test]
    fn test_parse_memory_string_invalid() {
        assert_eq!(parse_memory_kb_to_mb("invalid"), 0.0);
        assert_eq!(parse_memory_kb_to_mb(""), 0.0);
        assert_eq!(parse_memory_kb_to_mb("ABC K"), 0.0);
        assert_eq!(parse_memory_kb_to_mb("-5 K"), 0.0);
        assert_eq!(parse_memory_kb_to_mb("NaN"), 0.0);
    }

    #[test]
    fn test_label_value() {
        assert_eq!(
            label_value("model name\t: Intel(R) Xeon(R) CPU", "model name", ':'),
            Some("Intel(R) Xeon(R) CPU")
        );
        assert_eq!(label_value("cpu MHz\t\t: 2400.000", "model name", ':'), None);
        assert_eq!(label_value("model name", "model name", ':'), None);
    }
}
