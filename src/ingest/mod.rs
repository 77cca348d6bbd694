pub mod columns;

use thiserror::Error;

use crate::error::ScanError;

use self::columns::{resolve_message_column, ColumnMatcher};

const STRUCTURED_CHAIN: [ColumnMatcher; 2] =
    [ColumnMatcher::ExactCandidates, ColumnMatcher::FirstNonLabel];
const RAW_CHAIN: [ColumnMatcher; 2] =
    [ColumnMatcher::CaseInsensitive, ColumnMatcher::FirstNonLabel];

const DIAGNOSTIC_PREVIEW_CHARS: usize = 100;

/// Turns uploaded bytes plus filename into an ordered list of non-empty
/// messages. Deterministic for identical bytes and filename.
pub fn parse(content: &[u8], filename: &str) -> Result<Vec<String>, ScanError> {
    let extension = file_extension(filename);
    let text = std::str::from_utf8(content).map_err(|_| ScanError::Decode)?;

    let raw_values = match extension.as_str() {
        "txt" => parse_txt(text),
        "csv" => parse_csv(text)?,
        _ => return Err(ScanError::UnsupportedFileType { extension }),
    };

    let messages: Vec<String> = raw_values
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect();

    if messages.is_empty() {
        return Err(ScanError::EmptyInput {
            extension,
            content_length: content.len(),
            preview: text.chars().take(DIAGNOSTIC_PREVIEW_CHARS).collect(),
        });
    }

    tracing::debug!(
        target: "ingest",
        filename,
        messages = messages.len(),
        "upload normalized"
    );
    Ok(messages)
}

fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

fn parse_txt(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_csv(text: &str) -> Result<Vec<String>, ScanError> {
    match parse_csv_structured(text) {
        Ok(values) => Ok(values),
        Err(err) => {
            tracing::debug!(
                target: "ingest",
                error = %err,
                "structured CSV parse failed; falling back to raw rows"
            );
            parse_csv_raw(text)
        }
    }
}

/// Why the strict reader gave up. Never surfaces to callers; every case
/// hands the upload to the raw reader.
#[derive(Debug, Error)]
enum StructuredCsvError {
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("no message column: {0}")]
    NoColumn(ScanError),
}

/// Strict parse: header row plus equal-length records. Any ragged record
/// aborts the whole attempt so the raw reader can take over.
fn parse_csv_structured(text: &str) -> Result<Vec<String>, StructuredCsvError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let column =
        resolve_message_column(&headers, &STRUCTURED_CHAIN).map_err(StructuredCsvError::NoColumn)?;

    let mut values = Vec::new();
    for record in reader.records() {
        values.push(record?.get(column).unwrap_or_default().to_string());
    }
    Ok(values)
}

/// Lenient row-by-row reader: first record is treated as the header, rows
/// shorter than the chosen column are skipped.
fn parse_csv_raw(text: &str) -> Result<Vec<String>, ScanError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records().filter_map(Result::ok);
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(str::to_string).collect();
    let column = resolve_message_column(&headers, &RAW_CHAIN)?;

    Ok(records
        .filter_map(|record| record.get(column).map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_splits_lines_and_drops_blanks() {
        let content = b"WIN CASH NOW!!!\n\n  lunch at noon?  \n\t\n";
        let messages = parse(content, "emails.txt").unwrap();
        assert_eq!(messages, vec!["WIN CASH NOW!!!", "lunch at noon?"]);
    }

    #[test]
    fn whitespace_only_txt_is_empty_input() {
        let content = b"  \n\t\n   \n";
        let err = parse(content, "blank.txt").unwrap_err();
        match err {
            ScanError::EmptyInput {
                extension,
                content_length,
                ..
            } => {
                assert_eq!(extension, "txt");
                assert_eq!(content_length, content.len());
            }
            other => panic!("expected EmptyInput, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse(b"hello", "emails.pdf").unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnsupportedFileType { extension } if extension == "pdf"
        ));
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = parse(&[0xff, 0xfe, 0x00], "emails.txt").unwrap_err();
        assert!(matches!(err, ScanError::Decode));
    }

    #[test]
    fn csv_extracts_known_column_case_sensitively() {
        let content = b"label,Content\nspam,WIN CASH NOW!!!\nham,lunch at noon?\n";
        let messages = parse(content, "data.csv").unwrap();
        assert_eq!(messages, vec!["WIN CASH NOW!!!", "lunch at noon?"]);
    }

    #[test]
    fn csv_without_known_names_uses_first_non_label_column() {
        let content = b"label,foo\nspam,first body\nham,second body\n";
        let messages = parse(content, "data.csv").unwrap();
        assert_eq!(messages, vec!["first body", "second body"]);
    }

    #[test]
    fn ragged_csv_falls_back_to_raw_rows() {
        // Second record has an extra field, which the strict reader rejects.
        let content = b"label,text\nspam,buy pills,extra\nham,see you at 5\n";
        let messages = parse(content, "data.csv").unwrap();
        assert_eq!(messages, vec!["buy pills", "see you at 5"]);
    }

    #[test]
    fn csv_with_only_label_columns_reports_column_not_found() {
        let content = b"label\nspam\nham\n";
        let err = parse(content, "data.csv").unwrap_err();
        assert!(matches!(err, ScanError::ColumnNotFound { .. }));
    }

    #[test]
    fn csv_parse_failures_never_surface_as_storage_errors() {
        // Ragged rows and a label-only header: both readers fail, and the
        // caller sees the column diagnostic rather than a wrapped reader
        // error.
        let content = b"label\nspam,extra\nham\n";
        let err = parse(content, "data.csv").unwrap_err();
        assert!(matches!(err, ScanError::ColumnNotFound { .. }));
    }

    #[test]
    fn csv_blank_cells_are_filtered_out() {
        let content = b"message\nhello there\n   \n\nlast one\n";
        let messages = parse(content, "data.csv").unwrap();
        assert_eq!(messages, vec!["hello there", "last one"]);
    }
}
