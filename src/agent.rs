use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::db::{run_query, Records};

/// Statement keywords the bundled agent executes directly.
const SQL_KEYWORDS: [&str; 4] = ["SELECT", "WITH", "PRAGMA", "EXPLAIN"];

/// Queries shown on the chat screen as starting points.
pub const EXAMPLE_QUERIES: [&str; 5] = [
    "SELECT diagnosis, COUNT(*) AS count FROM medical_records GROUP BY diagnosis",
    "SELECT m.name, COUNT(*) AS prescribed FROM prescriptions p JOIN medications m ON p.medication_id = m.medication_id GROUP BY m.name",
    "SELECT d.last_name, COUNT(DISTINCT r.patient_id) AS patients FROM medical_records r JOIN doctors d ON r.doctor_id = d.doctor_id GROUP BY d.last_name",
    "SELECT first_name, last_name FROM patients p JOIN medical_records r ON p.patient_id = r.patient_id WHERE r.diagnosis = 'Essential hypertension'",
    "SELECT gender, COUNT(*) AS count FROM patients GROUP BY gender",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub sql: Option<String>,
    pub records: Option<Records>,
}

/// Turns a question about the store into an answer.
pub trait QueryAgent: Send + Sync {
    fn answer(&self, question: &str) -> Result<Answer>;
}

/// Executes questions written as SQL against a read-only connection.
#[derive(Debug, Clone)]
pub struct SqlAgent {
    db_path: PathBuf,
    row_limit: usize,
}

impl SqlAgent {
    pub fn new(db_path: impl Into<PathBuf>, row_limit: usize) -> Self {
        Self {
            db_path: db_path.into(),
            row_limit,
        }
    }
}

pub fn looks_like_sql(input: &str) -> bool {
    let first = input
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_start_matches('(')
        .to_ascii_uppercase();
    SQL_KEYWORDS.contains(&first.as_str())
}

impl QueryAgent for SqlAgent {
    fn answer(&self, question: &str) -> Result<Answer> {
        let question = question.trim();
        if !looks_like_sql(question) {
            return Err(anyhow!(
                "no language model is configured; ask with a SQL query (e.g. SELECT ...)"
            ));
        }
        info!("agent: running query");
        let records = run_query(&self.db_path, question, self.row_limit)?;
        let text = match records.rows.len() {
            0 => "The query returned no rows.".to_string(),
            1 => "The query returned 1 row.".to_string(),
            n => format!("The query returned {n} rows."),
        };
        Ok(Answer {
            text,
            sql: Some(question.to_string()),
            records: Some(records),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sql_statements() {
        assert!(looks_like_sql("select * from patients"));
        assert!(looks_like_sql("  WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(looks_like_sql("(SELECT 1)"));
        assert!(!looks_like_sql("How many patients have hypertension?"));
        assert!(!looks_like_sql(""));
    }

    #[test]
    fn prose_is_refused() {
        let agent = SqlAgent::new("unused.db", 10);
        let err = agent.answer("Which doctor has seen the most patients?").unwrap_err();
        assert!(err.to_string().contains("no language model"));
    }

    #[test]
    fn sql_is_executed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.db");
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2);")
            .unwrap();
        let answer = SqlAgent::new(&path, 10).answer("SELECT x FROM t").unwrap();
        assert_eq!(answer.text, "The query returned 2 rows.");
        assert_eq!(answer.records.unwrap().rows.len(), 2);
    }
}
