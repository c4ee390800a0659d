/// One tokenized line of the statement file. Purely positional; roles are
/// assigned later by schema inference.
pub type RawRow = Vec<String>;

/// Splits raw statement text into rows of fields.
///
/// Single left-to-right scan. A `"` toggles quote mode; a doubled `""` inside
/// a quoted field emits a literal quote. Commas and CR/LF only terminate
/// fields/rows outside quotes, and a `\r\n` pair counts as one line break.
/// Rows whose fields are all blank are dropped, so trailing newlines and
/// separator lines in bank exports cost nothing.
///
/// A quote left open at end of input is treated as implicitly closed: the
/// remainder of the file becomes the final field of the final row. Nothing is
/// lost, and the preview screen makes the mistake visible to the user.
pub fn tokenize(text: &str) -> Vec<RawRow> {
    let mut rows: Vec<RawRow> = Vec::new();
    let mut row: RawRow = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut field));
            }
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Flush a final row that wasn't newline-terminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows.retain(|r| r.iter().any(|f| !f.trim().is_empty()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_plain_fields_on_commas() {
        assert_eq!(
            tokenize("a,b,c\nd,e,f"),
            vec![row(&["a", "b", "c"]), row(&["d", "e", "f"])]
        );
    }

    #[test]
    fn quoted_field_keeps_comma_and_escaped_quote() {
        assert_eq!(tokenize(r#""a, ""b""""#), vec![row(&[r#"a, "b""#])]);
    }

    #[test]
    fn quoted_field_spans_line_break() {
        assert_eq!(tokenize("\"a\nb\",c"), vec![row(&["a\nb", "c"])]);
    }

    #[test]
    fn all_line_ending_styles_separate_rows() {
        for text in ["1,2\n3,4", "1,2\r3,4", "1,2\r\n3,4"] {
            assert_eq!(tokenize(text), vec![row(&["1", "2"]), row(&["3", "4"])]);
        }
    }

    #[test]
    fn crlf_is_one_line_break() {
        assert_eq!(tokenize("a\r\nb\r\n"), vec![row(&["a"]), row(&["b"])]);
    }

    #[test]
    fn blank_and_whitespace_rows_are_dropped() {
        assert_eq!(
            tokenize("a,b\n\n   , \nc,d\n"),
            vec![row(&["a", "b"]), row(&["c", "d"])]
        );
    }

    #[test]
    fn matches_naive_split_when_unquoted() {
        let text = "one,two\nthree,four\r\nfive,six";
        let expected: Vec<RawRow> = text
            .lines()
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect();
        assert_eq!(tokenize(text), expected);
    }

    #[test]
    fn final_row_without_newline_is_flushed() {
        assert_eq!(tokenize("a,b\nc,d"), vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\r\n").is_empty());
    }

    #[test]
    fn unterminated_quote_absorbs_rest_of_input() {
        assert_eq!(
            tokenize("a,\"b\nc,d"),
            vec![row(&["a", "b\nc,d"])]
        );
    }

    #[test]
    fn empty_quoted_field_is_kept_when_row_has_content() {
        assert_eq!(tokenize("a,\"\",b"), vec![row(&["a", "", "b"])]);
    }
}
