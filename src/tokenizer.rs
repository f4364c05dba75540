//! Line tokenizer for event files.
//!
//! Splits one text line into its record-type tag and the ordered list of
//! raw field strings. Quoted segments may contain the delimiter and are
//! returned as a single field with the quotes removed. Tokenizing never
//! fails; short or odd lines are left for the decoders to judge.

use crate::constants::{FIELD_DELIMITER, QUOTE_CHAR};
use crate::models::{EventSource, RawRecord};

/// Split a line into `(record_type, fields)`.
///
/// Returns `None` for blank lines. A line with no delimiter yields an empty
/// field list. A trailing `\r` from CRLF files is ignored.
pub fn tokenize(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }

    let mut segments = split_segments(line).into_iter();
    let record_type = segments.next().unwrap_or_default();
    Some((record_type, segments.collect()))
}

/// Tokenize a whole file, numbering lines from 1 in source order.
pub fn tokenize_file(content: &str, source: EventSource) -> Vec<RawRecord> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            tokenize(line).map(|(record_type, fields)| {
                RawRecord::new(index + 1, record_type, fields, source)
            })
        })
        .collect()
}

fn split_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE_CHAR => in_quotes = !in_quotes,
            FIELD_DELIMITER if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    // An unterminated quote keeps whatever followed it in the last field.
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    fn fields(line: &str) -> Vec<String> {
        tokenize(line).unwrap().1
    }

    #[test]
    fn test_basic_split() {
        let (record_type, fields) = tokenize("play,1,0,jeted001,32,BCFBX,S7").unwrap();
        assert_eq!(record_type, "play");
        assert_eq!(fields, vec!["1", "0", "jeted001", "32", "BCFBX", "S7"]);
    }

    #[test]
    fn test_quoted_field_keeps_delimiters() {
        let (record_type, fields) = tokenize(r#"start,jeted001,"Jeter, Derek",0,1,6"#).unwrap();
        assert_eq!(record_type, "start");
        assert_eq!(fields, vec!["jeted001", "Jeter, Derek", "0", "1", "6"]);
    }

    #[test]
    fn test_quotes_removed_without_delimiter() {
        assert_eq!(
            fields(r#"info,site,"NYC21""#),
            vec!["site".to_string(), "NYC21".to_string()]
        );
    }

    #[test]
    fn test_tag_only_line() {
        let (record_type, fields) = tokenize("version").unwrap();
        assert_eq!(record_type, "version");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_blank_lines_filtered() {
        assert_eq!(tokenize(""), None);
        assert_eq!(tokenize("   "), None);
        assert_eq!(tokenize("\r"), None);
    }

    #[test]
    fn test_trailing_empty_field_counted() {
        assert_eq!(fields("info,umphome,"), vec!["umphome", ""]);
        assert_eq!(fields("data,,"), vec!["", ""]);
    }

    #[test]
    fn test_crlf_stripped() {
        assert_eq!(fields("play,1,0,x,??,,NP\r"), vec!["1", "0", "x", "??", "", "NP"]);
    }

    #[test]
    fn test_unterminated_quote_is_total() {
        assert_eq!(fields(r#"com,"unclosed, still one"#), vec!["unclosed, still one"]);
    }

    #[test]
    fn test_field_count_matches_segments() {
        for line in ["a,b,c", "a", "a,", ",", "a,b,,d", r#"a,"x,y",z"#] {
            let (_, fields) = tokenize(line).unwrap();
            let unquoted_commas = line.replace(r#""x,y""#, "xy").matches(',').count();
            assert_eq!(fields.len(), unquoted_commas, "line: {}", line);
        }
    }

    #[test]
    fn test_tokenize_file_numbers_lines() {
        let source = EventSource::new(2023, SourceType::Season);
        let records = tokenize_file("id,NYA202304070\n\nversion,2\n", source);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[1].line_number, 3);
        assert_eq!(records[1].record_type, "version");
        assert!(records.iter().all(|r| r.game_id.is_none()));
    }
}
