//! Shared DTOs for JSON requests and responses.

use serde::{Deserialize, Serialize};

use crate::{
    data::{QueryResult, Row, SchemaInfo},
    nlp::corpus::IntentLabel,
};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqlRequest {
    pub sql: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub message: &'static str,
}

/// Rows and execution status shared by every query-running endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSetDto {
    pub results: Vec<Row>,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub error: Option<String>,
}

impl From<QueryResult> for ResultSetDto {
    fn from(value: QueryResult) -> Self {
        ResultSetDto {
            results: value.data,
            columns: value.columns,
            row_count: value.row_count,
            error: value.error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryDto {
    pub success: bool,
    pub original_query: String,
    pub sql_query: String,
    pub intent: IntentLabel,
    #[serde(flatten)]
    pub result: ResultSetDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceDto {
    pub success: bool,
    pub transcribed_text: String,
    pub sql_query: String,
    pub intent: IntentLabel,
    #[serde(flatten)]
    pub result: ResultSetDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct SqlDto {
    pub success: bool,
    pub sql_query: String,
    #[serde(flatten)]
    pub result: ResultSetDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDto {
    pub success: bool,
    pub schema: SchemaInfo,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleDto {
    pub text: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamplesDto {
    pub success: bool,
    pub examples: Vec<ExampleDto>,
}
