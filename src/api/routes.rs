//! HTTP route handlers for Axum.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    api::types::{
        ErrorBody, ExampleDto, ExamplesDto, HealthDto, QueryDto, QueryRequest, SchemaDto,
        SqlDto, SqlRequest, VoiceDto,
    },
    data::{QueryResult, SchemaInfo, SqliteStore},
    sql::guard,
};

use super::AppState;

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

const EXAMPLES: &[(&str, &str)] = &[
    ("Show all employees", "Display all employees with their department information"),
    ("How many employees work in IT?", "Count employees in the IT department"),
    ("Show employees with salary greater than 70000", "Filter employees by salary threshold"),
    ("What is the average salary?", "Calculate average salary across all employees"),
    ("List employees hired after 2020", "Show recently hired employees"),
    ("Show all projects", "Display all projects in the database"),
    ("Count employees in each department", "Group employees by department"),
    ("Show highest paid employee", "Find the employee with maximum salary"),
];

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message)))
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    error!(%err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(format!("Internal server error: {err}"))),
    )
}

/// Run a statement on the blocking pool.
async fn execute(store: Arc<SqliteStore>, sql: String) -> Result<QueryResult, ApiError> {
    tokio::task::spawn_blocking(move || store.execute(&sql))
        .await
        .map_err(internal)
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy",
        message: "AI Query Assistant API is running",
    })
}

pub async fn process_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<QueryDto> {
    let Some(raw) = payload.ok().and_then(|Json(body)| body.query) else {
        return Err(bad_request("Query text is required"));
    };
    let text = raw.trim();
    if text.is_empty() {
        return Err(bad_request("Query text cannot be empty"));
    }

    let translation = state.engine.translate(text);
    info!(intent = %translation.intent, sql = %translation.sql, "translated question");
    let result = execute(state.store.clone(), translation.sql.clone()).await?;
    Ok(Json(QueryDto {
        success: true,
        original_query: text.to_string(),
        sql_query: translation.sql,
        intent: translation.intent,
        result: result.into(),
    }))
}

pub async fn process_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<VoiceDto> {
    let mut audio: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "malformed multipart body");
                return Err(bad_request("Audio file is required"));
            }
        };
        if field.name() != Some("audio") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|err| {
            warn!(%err, "failed to read audio upload");
            bad_request("Failed to read audio data")
        })?;
        audio = Some((filename, bytes.to_vec()));
    }

    let Some((filename, bytes)) = audio else {
        return Err(bad_request("Audio file is required"));
    };
    if filename.is_empty() || bytes.is_empty() {
        return Err(bad_request("No audio file selected"));
    }

    let transcription = state.transcriber.transcribe(&bytes).await;
    let text = match transcription.text {
        Some(text) if transcription.success => text,
        _ => {
            let message = transcription
                .error
                .unwrap_or_else(|| "Could not understand the audio".to_string());
            return Err(bad_request(message));
        }
    };

    let translation = state.engine.translate(&text);
    info!(intent = %translation.intent, sql = %translation.sql, "translated transcript");
    let result = execute(state.store.clone(), translation.sql.clone()).await?;
    Ok(Json(VoiceDto {
        success: true,
        transcribed_text: text,
        sql_query: translation.sql,
        intent: translation.intent,
        result: result.into(),
    }))
}

pub async fn get_schema(State(state): State<AppState>) -> ApiResult<SchemaDto> {
    let store = state.store.clone();
    let schema = tokio::task::spawn_blocking(move || store.schema())
        .await
        .map_err(internal)?;
    let dto = match schema {
        Ok(schema) => SchemaDto {
            success: true,
            schema,
            error: None,
        },
        Err(err) => {
            warn!(%err, "schema introspection failed");
            SchemaDto {
                success: false,
                schema: SchemaInfo::default(),
                error: Some(err.to_string()),
            }
        }
    };
    Ok(Json(dto))
}

pub async fn execute_sql(
    State(state): State<AppState>,
    payload: Result<Json<SqlRequest>, JsonRejection>,
) -> ApiResult<SqlDto> {
    let Some(raw) = payload.ok().and_then(|Json(body)| body.sql) else {
        return Err(bad_request("SQL query is required"));
    };
    let sql = raw.trim();
    if sql.is_empty() {
        return Err(bad_request("SQL query cannot be empty"));
    }
    if let Some(keyword) = guard::find_forbidden_keyword(sql) {
        warn!(keyword, "rejected direct sql");
        return Err(bad_request(format!(
            "Dangerous SQL operation detected: {keyword}. Only SELECT queries are allowed."
        )));
    }

    let result = execute(state.store.clone(), sql.to_string()).await?;
    Ok(Json(SqlDto {
        success: true,
        sql_query: sql.to_string(),
        result: result.into(),
    }))
}

pub async fn examples() -> Json<ExamplesDto> {
    Json(ExamplesDto {
        success: true,
        examples: EXAMPLES
            .iter()
            .map(|(text, description)| ExampleDto { text, description })
            .collect(),
    })
}

pub async fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Endpoint not found")))
}
