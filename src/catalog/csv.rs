//! Minimal CSV record splitter for published spreadsheet exports
//!
//! Handles the dialect spreadsheet tools emit: a delimiter that may be `,`,
//! `;` or tab (detected from the header line), double-quoted fields with `""`
//! escapes and embedded newlines, CRLF line endings and a leading BOM.
//! Fields are trimmed and blank lines are skipped.

const CANDIDATE_DELIMITERS: [char; 3] = [',', ';', '\t'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvError {
    #[error("quoted field opened on line {line} is never closed")]
    UnterminatedQuote { line: usize },
}

/// Split CSV text into records (header included).
///
/// A `"` opens a quoted field only at the start of a field; anywhere else it
/// is kept as a literal character.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);

    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => {
                    if ch == '\n' {
                        line += 1;
                    }
                    field.push(ch);
                }
            }
            continue;
        }

        match ch {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quote_line = line;
            }
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(take_field(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(take_field(&mut field)),
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: quote_line });
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(take_field(&mut field));
        push_record(&mut records, record);
    }

    Ok(records)
}

/// Pick the candidate delimiter that occurs most often in the first line
fn detect_delimiter(text: &str) -> char {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }

        if ch == '\n' {
            break;
        }
        if ch == '"' && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else if let Some(idx) = CANDIDATE_DELIMITERS.iter().position(|d| *d == ch) {
            counts[idx] += 1;
            at_field_start = true;
        } else if !ch.is_whitespace() {
            at_field_start = false;
        }
    }

    // Ties keep the earlier candidate, so comma wins by default
    let mut best = 0;
    for idx in 1..counts.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }
    CANDIDATE_DELIMITERS[best]
}

fn take_field(field: &mut String) -> String {
    let value = field.trim().to_string();
    field.clear();
    value
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().any(|f| !f.is_empty()) {
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_comma_records() {
        let records = parse_records("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn detects_semicolon_delimiter() {
        let records = parse_records("#;Název;Sociální sítě\n1;Stream, long;10 XP\r\n").unwrap();
        assert_eq!(records[1], vec!["1", "Stream, long", "10 XP"]);
    }

    #[test]
    fn detects_tab_delimiter() {
        let records = parse_records("a\tb\n1\t2").unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn handles_quotes_escapes_and_embedded_newlines() {
        let records = parse_records("id,title\n7,\"Say \"\"hi\"\"\nto all\"\n").unwrap();
        assert_eq!(records[1], vec!["7", "Say \"hi\"\nto all"]);
    }

    #[test]
    fn strips_bom_and_skips_blank_lines() {
        let records = parse_records("\u{feff}id,title\n\n , \n3,Talk\n").unwrap();
        assert_eq!(records, vec![vec!["id", "title"], vec!["3", "Talk"]]);
    }

    #[test]
    fn empty_text_has_no_records() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn quote_inside_a_field_is_literal() {
        let text = "#,Title,S,K,G,Z\n1,Buy a 24\" monitor,5,,,\n2,Stream,10,,,\n3,Talk,,,,3\n";
        let records = parse_records(text).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[1], vec!["1", "Buy a 24\" monitor", "5", "", "", ""]);
        assert_eq!(records[3], vec!["3", "Talk", "", "", "", "3"]);
    }

    #[test]
    fn quote_after_leading_space_still_opens_a_field() {
        let records = parse_records("id,title\n4, \"Quiz, hard\" \n").unwrap();
        assert_eq!(records[1], vec!["4", "Quiz, hard"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_records("id,title\n1,ok\n2,\"never closed\n3,Talk\n").unwrap_err();
        assert_eq!(err, CsvError::UnterminatedQuote { line: 3 });
    }
}
