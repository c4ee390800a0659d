//! Column-role inference for tokenized statement rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::{is_valid_iso_date, normalize_amount, normalize_date};
use crate::tokenize::RawRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("CSV needs columns for date, description, and amount.")]
pub struct SchemaError;

/// Semantic role → zero-based column index, resolved once per import.
/// `category` is optional; rows without one start uncategorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub category: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferredLayout {
    pub mapping: ColumnMapping,
    pub data_rows: Vec<RawRow>,
}

// Keyword lists are ordered: earlier entries outrank later ones, and an exact
// cell match outranks any substring hit. "amt" appears because several card
// exports abbreviate the amount header.
const DATE_KEYWORDS: &[&str] = &["date"];
const DESCRIPTION_KEYWORDS: &[&str] = &["description", "merchant", "memo"];
const AMOUNT_KEYWORDS: &[&str] = &["amount", "amt"];
const CATEGORY_KEYWORDS: &[&str] = &["category"];

/// Resolves which column holds which role.
///
/// The first row is tried as a header; if date, description and amount all
/// resolve, the remaining rows are data. Otherwise the file may simply have
/// no header: when the first row has at least three columns with a parseable
/// date in column 0 and a parseable amount in column 2, the fixed
/// date/description/amount layout is adopted and every row (including the
/// first) is data. Only row 0 is probed, keeping the fallback O(1) in the
/// row count.
pub fn infer_schema(rows: Vec<RawRow>) -> Result<InferredLayout, SchemaError> {
    let Some(first) = rows.first() else {
        return Err(SchemaError);
    };

    let header: Vec<String> = first.iter().map(|cell| cell.trim().to_lowercase()).collect();
    let date = find_column(&header, DATE_KEYWORDS);
    let description = find_column(&header, DESCRIPTION_KEYWORDS);
    let amount = find_column(&header, AMOUNT_KEYWORDS);
    let category = find_column(&header, CATEGORY_KEYWORDS);

    if let (Some(date), Some(description), Some(amount)) = (date, description, amount) {
        let mapping = ColumnMapping {
            date,
            description,
            amount,
            category,
        };
        let mut rows = rows;
        rows.remove(0);
        return Ok(InferredLayout {
            mapping,
            data_rows: rows,
        });
    }

    if first.len() >= 3
        && is_valid_iso_date(&normalize_date(&first[0]))
        && normalize_amount(&first[2]).is_some()
    {
        let mapping = ColumnMapping {
            date: 0,
            description: 1,
            amount: 2,
            category: None,
        };
        return Ok(InferredLayout {
            mapping,
            data_rows: rows,
        });
    }

    Err(SchemaError)
}

fn find_column(header: &[String], keywords: &[&str]) -> Option<usize> {
    for keyword in keywords {
        if let Some(index) = header.iter().position(|cell| cell == keyword) {
            return Some(index);
        }
    }
    for keyword in keywords {
        if let Some(index) = header.iter().position(|cell| cell.contains(keyword)) {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<RawRow> {
        lines
            .iter()
            .map(|line| line.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn exact_headers_resolve_in_any_order() {
        let layout = infer_schema(rows(&[
            &["Amount", "Date", "Category", "Description"],
            &["-4.50", "2024-01-05", "Dining", "Coffee Shop"],
        ]))
        .unwrap();
        assert_eq!(
            layout.mapping,
            ColumnMapping {
                date: 1,
                description: 3,
                amount: 0,
                category: Some(2),
            }
        );
        assert_eq!(layout.data_rows.len(), 1);
    }

    #[test]
    fn substring_and_abbreviated_headers_resolve() {
        let layout = infer_schema(rows(&[
            &["Txn Date", "Merchant", "Amt", "Category"],
            &["01/06/2024", "Paycheck", "1,000.00", ""],
        ]))
        .unwrap();
        assert_eq!(
            layout.mapping,
            ColumnMapping {
                date: 0,
                description: 1,
                amount: 2,
                category: Some(3),
            }
        );
    }

    #[test]
    fn memo_counts_as_description() {
        let layout = infer_schema(rows(&[
            &["Date", "Memo", "Amount"],
            &["2024-01-05", "Coffee", "-4.50"],
        ]))
        .unwrap();
        assert_eq!(layout.mapping.description, 1);
        assert_eq!(layout.mapping.category, None);
    }

    #[test]
    fn exact_match_beats_earlier_substring_column() {
        // "posting date time" contains "date", but a later exact "date" wins.
        let layout = infer_schema(rows(&[
            &["posting date time", "description", "amount", "date"],
            &["x", "y", "1", "2024-01-05"],
        ]))
        .unwrap();
        assert_eq!(layout.mapping.date, 3);
    }

    #[test]
    fn headerless_file_adopts_fixed_layout() {
        let layout = infer_schema(rows(&[
            &["2024-01-05", "Coffee Shop", "-4.50"],
            &["2024-01-06", "Grocer", "-20.00"],
        ]))
        .unwrap();
        assert_eq!(
            layout.mapping,
            ColumnMapping {
                date: 0,
                description: 1,
                amount: 2,
                category: None,
            }
        );
        // Row 0 is data, not a header.
        assert_eq!(layout.data_rows.len(), 2);
    }

    #[test]
    fn headerless_fallback_accepts_us_dates() {
        let layout = infer_schema(rows(&[&["01/06/2024", "Paycheck", "1,000.00"]])).unwrap();
        assert_eq!(layout.data_rows.len(), 1);
    }

    #[test]
    fn fallback_requires_three_columns() {
        assert_eq!(
            infer_schema(rows(&[&["2024-01-05", "-4.50"]])),
            Err(SchemaError)
        );
    }

    #[test]
    fn unrecognizable_first_row_is_a_schema_error() {
        let err = infer_schema(rows(&[&["foo", "bar", "baz"]])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV needs columns for date, description, and amount."
        );
    }

    #[test]
    fn empty_input_is_a_schema_error() {
        assert_eq!(infer_schema(Vec::new()), Err(SchemaError));
    }

    #[test]
    fn partial_header_without_fallback_data_fails() {
        // "date" resolves but description/amount do not, and row 0 is not data.
        assert_eq!(
            infer_schema(rows(&[&["Date", "Stuff", "Things"]])),
            Err(SchemaError)
        );
    }
}
