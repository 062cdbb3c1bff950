//! Appending uploaded transactions to the database.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    db::{TRANSACTIONS_TABLE, table_exists},
    upload::projection::{ProjectedBatch, TransactionColumn},
};

/// The SQL type of a column, inferred from the values in an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Infer the type of a column from its cells, ignoring empty cells.
    ///
    /// A column without any values is treated as text.
    fn infer<'a>(mut cells: impl Iterator<Item = &'a str> + Clone) -> Self {
        if cells.clone().next().is_none() {
            return ColumnType::Text;
        }

        if cells.clone().all(|cell| cell.parse::<i64>().is_ok()) {
            ColumnType::Integer
        } else if cells.all(|cell| parse_finite_float(cell).is_some()) {
            ColumnType::Real
        } else {
            ColumnType::Text
        }
    }

    fn to_value(self, cell: Option<&str>) -> Value {
        let Some(cell) = cell else {
            return Value::Null;
        };

        match self {
            ColumnType::Integer => cell
                .parse()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(cell.to_owned())),
            ColumnType::Real => parse_finite_float(cell)
                .map(Value::Real)
                .unwrap_or_else(|| Value::Text(cell.to_owned())),
            ColumnType::Text => Value::Text(cell.to_owned()),
        }
    }
}

fn parse_finite_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn infer_column_types(batch: &ProjectedBatch) -> Vec<ColumnType> {
    (0..batch.columns().len())
        .map(|index| {
            ColumnType::infer(
                batch
                    .rows()
                    .iter()
                    .filter_map(move |row| row.get(index).and_then(|cell| cell.as_deref())),
            )
        })
        .collect()
}

fn create_transactions_table(
    columns: &[TransactionColumn],
    column_types: &[ColumnType],
    connection: &Connection,
) -> Result<(), rusqlite::Error> {
    let column_definitions = columns
        .iter()
        .zip(column_types)
        .map(|(column, column_type)| format!("\"{column}\" {}", column_type.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");

    connection.execute(
        &format!("CREATE TABLE IF NOT EXISTS \"{TRANSACTIONS_TABLE}\" ({column_definitions})"),
        (),
    )?;

    Ok(())
}

/// Append the rows of `batch` to the transactions table.
///
/// The table is created with the batch's columns if it does not exist yet,
/// with column types inferred from the batch's values. Existing rows are
/// never modified and duplicate rows are not detected.
///
/// The rows are inserted in a single SQL transaction, so either every row is
/// saved or none are.
///
/// Returns the number of rows added.
///
/// # Errors
/// Returns [Error::SqlError] if the rows could not be inserted, for example
/// if the existing table does not have one of the batch's columns.
pub fn append_batch(batch: &ProjectedBatch, connection: &Connection) -> Result<usize, Error> {
    let column_types = infer_column_types(batch);

    let tx = connection.unchecked_transaction()?;

    create_transactions_table(batch.columns(), &column_types, &tx)?;

    let column_list = batch
        .columns()
        .iter()
        .map(|column| format!("\"{column}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=batch.columns().len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");

    {
        // Prepare the insert statement once for reuse
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{TRANSACTIONS_TABLE}\" ({column_list}) VALUES ({placeholders})"
        ))?;

        for row in batch.rows() {
            let values = column_types
                .iter()
                .zip(row)
                .map(|(column_type, cell)| column_type.to_value(cell.as_deref()));

            stmt.execute(params_from_iter(values))?;
        }
    }

    tx.commit()?;

    tracing::debug!(
        "Appended {} rows from '{}' to {TRANSACTIONS_TABLE}",
        batch.row_count(),
        batch.file_name()
    );

    Ok(batch.row_count())
}

/// Count the rows in the transactions table.
///
/// Returns zero if nothing has been uploaded yet.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    if !table_exists(TRANSACTIONS_TABLE, connection)? {
        return Ok(0);
    }

    let count: i64 = connection.query_row(
        &format!("SELECT COUNT(*) FROM \"{TRANSACTIONS_TABLE}\""),
        [],
        |row| row.get(0),
    )?;

    usize::try_from(count).map_err(|_| {
        Error::SqlError(rusqlite::Error::IntegralValueOutOfRange(0, count))
    })
}
