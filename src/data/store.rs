//! SQLite-backed storage for the sample employee dataset.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rusqlite::{params, types::ValueRef, Connection};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{seed, ColumnInfo, QueryResult, Row, SchemaInfo, StoreError, TableInfo};

/// Wrapper around a SQLite connection holding the sample dataset.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating and seeding tables as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self::init(conn, Some(path.to_path_buf()))?;
        info!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// In-memory store with the same schema and seed data.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, db_path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch(seed::CREATE_TABLES_SQL)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        store.seed_if_empty()?;
        Ok(store)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert the sample rows unless departments already exist.
    /// Returns whether anything was written.
    pub fn seed_if_empty(&self) -> Result<bool, StoreError> {
        let mut conn = self.lock()?;
        let existing: i64 =
            conn.query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        for (name, description) in seed::DEPARTMENTS {
            tx.execute(
                "INSERT INTO departments (name, description) VALUES (?1, ?2)",
                params![name, description],
            )?;
        }
        for emp in seed::EMPLOYEES {
            tx.execute(
                "INSERT INTO employees (first_name, last_name, email, department_id, salary, hire_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    emp.first_name,
                    emp.last_name,
                    emp.email,
                    emp.department_id,
                    emp.salary,
                    emp.hire_date
                ],
            )?;
        }
        for project in seed::PROJECTS {
            tx.execute(
                "INSERT INTO projects (name, description, start_date, end_date, budget, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    project.name,
                    project.description,
                    project.start_date,
                    project.end_date,
                    project.budget,
                    project.status
                ],
            )?;
        }
        tx.commit()?;
        info!(
            departments = seed::DEPARTMENTS.len(),
            employees = seed::EMPLOYEES.len(),
            projects = seed::PROJECTS.len(),
            "seeded sample data"
        );
        Ok(true)
    }

    /// Run one statement and collect its rows. Errors are reported in the
    /// result rather than returned.
    pub fn execute(&self, sql: &str) -> QueryResult {
        match self.try_execute(sql) {
            Ok(result) => {
                debug!(rows = result.row_count, "executed query");
                result
            }
            Err(err) => {
                warn!(%err, sql, "query failed");
                QueryResult::failed(err)
            }
        }
    }

    fn try_execute(&self, sql: &str) -> Result<QueryResult, StoreError> {
        if sql.trim().is_empty() {
            return Err(StoreError::EmptyQuery);
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(|err| match err {
            rusqlite::Error::MultipleStatement => StoreError::MultipleStatements,
            other => StoreError::Sqlite(other),
        })?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([])?;
        let mut data = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), json_value(row.get_ref(idx)?));
            }
            data.push(record);
        }
        Ok(QueryResult::ok(columns, data))
    }

    /// Column metadata for the dataset tables.
    pub fn schema(&self) -> Result<SchemaInfo, StoreError> {
        let conn = self.lock()?;
        let mut tables = Vec::with_capacity(seed::TABLES.len());
        for table in seed::TABLES {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
            let columns = stmt
                .query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        data_type: row.get(2)?,
                        nullable: row.get::<_, i64>(3)? == 0,
                        primary_key: row.get::<_, i64>(5)? != 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            tables.push(TableInfo {
                name: (*table).to_string(),
                columns,
            });
        }
        Ok(SchemaInfo { tables })
    }
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(BASE64.encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_once() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.seed_if_empty().unwrap());
        let result = store.execute("SELECT COUNT(*) AS n FROM employees");
        assert_eq!(result.data[0]["n"], Value::from(10));
    }

    #[test]
    fn reopening_a_file_does_not_duplicate_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.db");
        drop(SqliteStore::open(&path).unwrap());
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.db_path(), Some(path.as_path()));
        let result = store.execute("SELECT COUNT(*) AS n FROM departments");
        assert_eq!(result.data[0]["n"], Value::from(5));
    }

    #[test]
    fn rows_keep_column_order_and_types() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result =
            store.execute("SELECT first_name, salary, hire_date FROM employees WHERE id = 1");
        assert!(result.success);
        assert_eq!(result.columns, vec!["first_name", "salary", "hire_date"]);
        let row = &result.data[0];
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, result.columns);
        assert_eq!(row["first_name"], Value::from("John"));
        assert_eq!(row["salary"], Value::from(75000.0));
    }

    #[test]
    fn errors_become_failed_results() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store.execute("SELECT * FROM salaries");
        assert!(!result.success);
        assert_eq!(result.row_count, 0);
        assert!(result.error.unwrap().contains("no such table"));

        let result = store.execute("   ");
        assert_eq!(result.error.as_deref(), Some("SQL query is empty"));
    }

    #[test]
    fn null_end_date_is_json_null() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store.execute("SELECT end_date FROM projects WHERE status = 'active' ORDER BY id");
        assert_eq!(result.row_count, 2);
        assert_eq!(result.data[1]["end_date"], Value::Null);
    }
}
