//! Trimming uploaded tables down to the columns of a transaction.

use std::fmt::Display;

use crate::{Error, upload::batch::CsvBatch};

/// A column of the `transactions` table.
///
/// These are the only columns that are saved from uploaded files, and the
/// only names that are ever used as SQL identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionColumn {
    Date,
    Amount,
    Merchant,
    Category,
}

impl TransactionColumn {
    /// Every transaction column in the order they are saved in.
    pub const ALL: [TransactionColumn; 4] = [
        TransactionColumn::Date,
        TransactionColumn::Amount,
        TransactionColumn::Merchant,
        TransactionColumn::Category,
    ];

    /// The column name as it appears in CSV headers and in the database.
    pub fn name(self) -> &'static str {
        match self {
            TransactionColumn::Date => "date",
            TransactionColumn::Amount => "amount",
            TransactionColumn::Merchant => "merchant",
            TransactionColumn::Category => "category",
        }
    }
}

impl Display for TransactionColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An uploaded table that only contains transaction columns.
///
/// A projected batch always has at least one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedBatch {
    file_name: String,
    columns: Vec<TransactionColumn>,
    rows: Vec<Vec<Option<String>>>,
}

impl ProjectedBatch {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn columns(&self) -> &[TransactionColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A copy of the batch with only the first `count` rows.
    pub fn head(&self, count: usize) -> ProjectedBatch {
        ProjectedBatch {
            file_name: self.file_name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().take(count).cloned().collect(),
        }
    }
}

/// Keep only the transaction columns of `batch`.
///
/// The result has the columns of [TransactionColumn::ALL] that appear in the
/// batch's header, in that order. Rows keep their order and cells are not
/// modified. If a header name is repeated, the first column with that name is
/// used.
///
/// # Errors
/// Returns [Error::EmptyProjection] if none of the transaction columns are in
/// the batch.
pub fn project_columns(batch: CsvBatch) -> Result<ProjectedBatch, Error> {
    let selected: Vec<(TransactionColumn, usize)> = TransactionColumn::ALL
        .into_iter()
        .filter_map(|column| {
            batch
                .columns
                .iter()
                .position(|name| name == column.name())
                .map(|index| (column, index))
        })
        .collect();

    if selected.is_empty() {
        tracing::debug!(
            "No transaction columns in '{}', found {:?}",
            batch.file_name,
            batch.columns
        );
        return Err(Error::EmptyProjection);
    }

    let rows = batch
        .rows
        .into_iter()
        .map(|mut row| {
            selected
                .iter()
                .map(|&(_, index)| row.get_mut(index).and_then(Option::take))
                .collect()
        })
        .collect();

    Ok(ProjectedBatch {
        file_name: batch.file_name,
        columns: selected.into_iter().map(|(column, _)| column).collect(),
        rows,
    })
}

#[cfg(test)]
pub(crate) fn projected_batch(
    file_name: &str,
    columns: &[TransactionColumn],
    rows: &[&[Option<&str>]],
) -> ProjectedBatch {
    ProjectedBatch {
        file_name: file_name.to_owned(),
        columns: columns.to_vec(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(str::to_owned)).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        upload::{
            batch::{CsvBatch, parse_csv},
            projection::{TransactionColumn, project_columns},
        },
    };

    fn cell(text: &str) -> Option<String> {
        Some(text.to_owned())
    }

    #[test]
    fn keeps_only_transaction_columns() {
        let batch = parse_csv("card.csv", "date,amount,extra\n2024-01-05,10,x\n2024-02-01,-3,y")
            .unwrap();

        let projected = project_columns(batch).unwrap();

        assert_eq!(
            projected.columns(),
            &[TransactionColumn::Date, TransactionColumn::Amount]
        );
        assert_eq!(
            projected.rows(),
            &[
                vec![cell("2024-01-05"), cell("10")],
                vec![cell("2024-02-01"), cell("-3")],
            ]
        );
    }

    #[test]
    fn columns_follow_transaction_column_order() {
        let batch = parse_csv(
            "card.csv",
            "category,notes,amount,merchant,date\nFood,n,12.5,Cafe,2024-03-01",
        )
        .unwrap();

        let projected = project_columns(batch).unwrap();

        assert_eq!(projected.columns(), &TransactionColumn::ALL);
        assert_eq!(
            projected.rows(),
            &[vec![
                cell("2024-03-01"),
                cell("12.5"),
                cell("Cafe"),
                cell("Food")
            ]]
        );
    }

    #[test]
    fn values_are_not_modified() {
        let batch =
            parse_csv("card.csv", "amount,merchant\n not a number ,  Spaces  \n,").unwrap();

        let projected = project_columns(batch).unwrap();

        assert_eq!(
            projected.rows(),
            &[
                vec![cell(" not a number "), cell("  Spaces  ")],
                vec![None, None],
            ]
        );
    }

    #[test]
    fn no_transaction_columns_is_empty_projection() {
        let batch = parse_csv("other.csv", "foo,bar\n1,2").unwrap();

        assert_eq!(project_columns(batch), Err(Error::EmptyProjection));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let batch = parse_csv("other.csv", "Date,AMOUNT\n2024-01-01,1").unwrap();

        assert_eq!(project_columns(batch), Err(Error::EmptyProjection));
    }

    #[test]
    fn header_only_file_projects_to_no_rows() {
        let batch = parse_csv("card.csv", "date,amount").unwrap();

        let projected = project_columns(batch).unwrap();

        assert_eq!(projected.row_count(), 0);
        assert_eq!(projected.columns().len(), 2);
    }

    #[test]
    fn repeated_header_uses_first_column() {
        let batch = CsvBatch {
            file_name: "dupe.csv".to_owned(),
            columns: vec!["amount".to_owned(), "amount".to_owned()],
            rows: vec![vec![cell("1"), cell("2")]],
        };

        let projected = project_columns(batch).unwrap();

        assert_eq!(projected.rows(), &[vec![cell("1")]]);
    }

    #[test]
    fn head_takes_first_rows() {
        let batch = parse_csv("card.csv", "amount\n1\n2\n3").unwrap();
        let projected = project_columns(batch).unwrap();

        let head = projected.head(2);

        assert_eq!(head.rows(), &[vec![cell("1")], vec![cell("2")]]);
        assert_eq!(projected.row_count(), 3);
    }
}
