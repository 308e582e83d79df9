use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("A row needs between 1 and 6 columns, got {0}")]
    ColumnCount(usize),

    #[error("Rows cannot be placed inside a column")]
    RowInColumn,
}
