use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Statement};
use tracing::debug;

use super::{ColumnInfo, ForeignKey, Records, Stats, TableProperties};

/// Rows of sample data appended to each table in the schema description.
const SAMPLE_ROWS: usize = 3;

/// Open the store for reading only. The file must already exist.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    debug!("sqlite: opening {} read-only", path.display());
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags)
        .with_context(|| format!("failed to open {} read-only", path.display()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn stringify(cell: ValueRef<'_>) -> String {
    match cell {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn collect_rows(stmt: &mut Statement<'_>, limit: Option<usize>) -> rusqlite::Result<Records> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let col_count = columns.len();
    let mut rows_vec = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        if limit.is_some_and(|l| rows_vec.len() >= l) {
            break;
        }
        let mut v = Vec::with_capacity(col_count);
        for i in 0..col_count {
            v.push(stringify(row.get_ref(i)?));
        }
        rows_vec.push(v);
    }
    Ok(Records { columns, rows: rows_vec })
}

/// Run `sql` and stringify every cell of the result.
pub fn query_records(conn: &Connection, sql: &str) -> rusqlite::Result<Records> {
    let mut stmt = conn.prepare(sql)?;
    collect_rows(&mut stmt, None)
}

fn table_names(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

pub fn fetch_tables(path: &Path) -> Result<Vec<String>> {
    let conn = open_read_only(path)?;
    Ok(table_names(&conn)?)
}

pub fn fetch_records(path: &Path, table: &str, limit: usize, offset: usize) -> Result<Records> {
    let conn = open_read_only(path)?;
    let q = format!(
        "SELECT * FROM {} LIMIT {} OFFSET {}",
        quote_ident(table),
        limit,
        offset
    );
    query_records(&conn, &q).with_context(|| format!("failed to read table {table}"))
}

pub fn fetch_properties(path: &Path, table: &str) -> Result<TableProperties> {
    let conn = open_read_only(path)?;

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", quote_ident(table)))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                data_type: row.get(2)?,
                nullable: row.get::<_, i64>(3)? == 0,
                default: row.get(4)?,
                primary_key: row.get::<_, i64>(5)? > 0,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if columns.is_empty() {
        bail!("no such table: {table}");
    }

    let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({});", quote_ident(table)))?;
    let foreign_keys = stmt
        .query_map([], |row| {
            Ok(ForeignKey {
                references_table: row.get(2)?,
                column: row.get(3)?,
                references_column: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(TableProperties { columns, foreign_keys })
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)), [], |r| r.get(0))
}

fn distribution(conn: &Connection, column: &str) -> rusqlite::Result<Vec<(String, u64)>> {
    let col = quote_ident(column);
    let mut stmt = conn.prepare(&format!(
        "SELECT {col}, COUNT(*) AS count FROM patients GROUP BY {col} ORDER BY {col}"
    ))?;
    let rows = stmt.query_map([], |row| {
        let label: Option<String> = row.get(0)?;
        let n: i64 = row.get(1)?;
        Ok((label.unwrap_or_default(), n.max(0) as u64))
    })?;
    rows.collect()
}

pub fn fetch_stats(path: &Path) -> Result<Stats> {
    let conn = open_read_only(path)?;
    Ok(Stats {
        patients: count(&conn, "patients")?,
        records: count(&conn, "medical_records")?,
        prescriptions: count(&conn, "prescriptions")?,
        genders: distribution(&conn, "gender")?,
        blood_types: distribution(&conn, "blood_type")?,
    })
}

/// Execute an ad hoc read-only statement, keeping at most `limit` rows.
pub fn run_query(path: &Path, sql: &str, limit: usize) -> Result<Records> {
    let conn = open_read_only(path)?;
    let mut stmt = conn.prepare(sql.trim()).context("failed to prepare query")?;
    if !stmt.readonly() {
        bail!("only read-only statements are allowed");
    }
    Ok(collect_rows(&mut stmt, Some(limit))?)
}

/// Each table's DDL followed by a few sample rows.
pub fn schema_description(path: &Path) -> Result<String> {
    let conn = open_read_only(path)?;
    let mut stmt = conn.prepare(
        "SELECT name, sql FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
    )?;
    let tables = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut out = String::new();
    for (name, ddl) in tables {
        let sample = query_records(
            &conn,
            &format!("SELECT * FROM {} LIMIT {SAMPLE_ROWS}", quote_ident(&name)),
        )?;
        out.push_str(ddl.trim());
        out.push_str(&format!(
            "\n\n/*\n{SAMPLE_ROWS} rows from {name} table:\n{sample}*/\n\n"
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE patients (patient_id INTEGER PRIMARY KEY, gender TEXT, blood_type TEXT);
            CREATE TABLE medical_records (record_id INTEGER PRIMARY KEY,
                patient_id INTEGER REFERENCES patients (patient_id));
            CREATE TABLE prescriptions (prescription_id INTEGER PRIMARY KEY, note BLOB);
            INSERT INTO patients (gender, blood_type) VALUES
              ('Male', 'A+'), ('Female', 'O-'), ('Male', 'A+');
            INSERT INTO medical_records (patient_id) VALUES (1), (2);
            INSERT INTO prescriptions (note) VALUES (x'0102'), (NULL);
            "#,
        )
        .unwrap();
        (dir, path)
    }

    #[test]
    fn stats_count_and_group() {
        let (_dir, path) = store();
        let stats = fetch_stats(&path).unwrap();
        assert_eq!((stats.patients, stats.records, stats.prescriptions), (3, 2, 2));
        assert_eq!(
            stats.genders,
            vec![("Female".to_string(), 1), ("Male".to_string(), 2)]
        );
        assert_eq!(stats.blood_types[0], ("A+".to_string(), 2));
    }

    #[test]
    fn cells_are_stringified() {
        let (_dir, path) = store();
        let recs = fetch_records(&path, "prescriptions", 10, 0).unwrap();
        assert_eq!(recs.columns, vec!["prescription_id", "note"]);
        assert_eq!(recs.rows[0][1], "<blob 2 bytes>");
        assert_eq!(recs.rows[1][1], "");
    }

    #[test]
    fn paging_applies_limit_and_offset() {
        let (_dir, path) = store();
        let recs = fetch_records(&path, "patients", 1, 1).unwrap();
        assert_eq!(recs.rows, vec![vec!["2", "Female", "O-"]]);
    }

    #[test]
    fn writes_are_refused() {
        let (_dir, path) = store();
        assert!(run_query(&path, "DELETE FROM patients", 10).is_err());
        assert_eq!(fetch_stats(&path).unwrap().patients, 3);
    }

    #[test]
    fn query_result_is_truncated() {
        let (_dir, path) = store();
        let recs = run_query(&path, "SELECT * FROM patients", 2).unwrap();
        assert_eq!(recs.rows.len(), 2);
    }

    #[test]
    fn properties_include_foreign_keys() {
        let (_dir, path) = store();
        let props = fetch_properties(&path, "medical_records").unwrap();
        assert!(props.columns[0].primary_key);
        assert_eq!(
            props.foreign_keys,
            vec![ForeignKey {
                column: "patient_id".into(),
                references_table: "patients".into(),
                references_column: "patient_id".into(),
            }]
        );
        assert!(fetch_properties(&path, "nope").is_err());
    }

    #[test]
    fn schema_description_lists_tables_with_samples() {
        let (_dir, path) = store();
        let text = schema_description(&path).unwrap();
        assert!(text.contains("CREATE TABLE patients"));
        assert!(text.contains("3 rows from medical_records table:"));
    }

    #[test]
    fn missing_file_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(open_read_only(&path).is_err());
        assert!(!path.exists());
    }
}
