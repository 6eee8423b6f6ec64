//! Sample dataset storage and query execution.

pub mod seed;
pub mod store;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use store::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection lock poisoned")]
    Poisoned,

    #[error("Only single statements can be executed")]
    MultipleStatements,

    #[error("SQL query is empty")]
    EmptyQuery,
}

/// One result row, keyed by column name in select order.
pub type Row = IndexMap<String, Value>;

/// Outcome of executing a statement; failures are carried in `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub success: bool,
    pub data: Vec<Row>,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub error: Option<String>,
}

impl QueryResult {
    pub fn ok(columns: Vec<String>, data: Vec<Row>) -> Self {
        Self {
            success: true,
            row_count: data.len(),
            data,
            columns,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaInfo {
    pub tables: Vec<TableInfo>,
}
