//! Parsing uploaded CSV text into an in-memory table.

use crate::Error;

/// The contents of one uploaded CSV file.
///
/// Cells are kept as the raw text from the file. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvBatch {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Parse `text` as a CSV file with a header row.
///
/// Header names are used verbatim. Rows with fewer fields than the header are
/// padded with empty cells, and blank lines are skipped. A file with no header
/// row produces a batch with no columns.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the CSV is malformed or a row has more
/// fields than the header.
pub fn parse_csv(file_name: &str, text: &str) -> Result<CsvBatch, Error> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;

        if record.len() > columns.len() {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();

            return Err(Error::InvalidCSV(format!(
                "line {line} has {} fields but the header has {}",
                record.len(),
                columns.len()
            )));
        }

        let row = (0..columns.len())
            .map(|index| {
                record
                    .get(index)
                    .filter(|cell| !cell.is_empty())
                    .map(str::to_owned)
            })
            .collect();

        rows.push(row);
    }

    tracing::debug!(
        "Parsed {} rows with columns {:?} from '{}'",
        rows.len(),
        columns,
        file_name
    );

    Ok(CsvBatch {
        file_name: file_name.to_owned(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::parse_csv;

    fn cell(text: &str) -> Option<String> {
        Some(text.to_owned())
    }

    #[test]
    fn parses_header_and_rows() {
        let batch = parse_csv(
            "card.csv",
            "date,amount,merchant\n2024-01-05,10.50,Coffee Co\n2024-01-20,-3,\"Books, Inc\"",
        )
        .unwrap();

        assert_eq!(batch.file_name, "card.csv");
        assert_eq!(batch.columns, vec!["date", "amount", "merchant"]);
        assert_eq!(
            batch.rows,
            vec![
                vec![cell("2024-01-05"), cell("10.50"), cell("Coffee Co")],
                vec![cell("2024-01-20"), cell("-3"), cell("Books, Inc")],
            ]
        );
    }

    #[test]
    fn empty_cells_are_none() {
        let batch = parse_csv("card.csv", "date,amount,category\n2024-01-05,,Food").unwrap();

        assert_eq!(batch.rows, vec![vec![cell("2024-01-05"), None, cell("Food")]]);
    }

    #[test]
    fn short_rows_are_padded() {
        let batch = parse_csv("card.csv", "date,amount,merchant\n2024-01-05,10").unwrap();

        assert_eq!(batch.rows, vec![vec![cell("2024-01-05"), cell("10"), None]]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let result = parse_csv("card.csv", "date,amount\n2024-01-05,10\n2024-01-06,11,extra");

        match result {
            Err(Error::InvalidCSV(message)) => {
                assert!(message.contains("line 3"), "got {message}")
            }
            other => panic!("want invalid CSV error, got {other:?}"),
        }
    }

    #[test]
    fn header_names_are_not_trimmed_or_lowercased() {
        let batch = parse_csv("card.csv", "Date, amount\n2024-01-05,10").unwrap();

        assert_eq!(batch.columns, vec!["Date", " amount"]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let batch = parse_csv("card.csv", "\u{feff}date,amount\n2024-01-05,10").unwrap();

        assert_eq!(batch.columns, vec!["date", "amount"]);
    }

    #[test]
    fn empty_file_has_no_columns() {
        let batch = parse_csv("empty.csv", "").unwrap();

        assert!(batch.columns.is_empty());
        assert!(batch.rows.is_empty());
    }
}
