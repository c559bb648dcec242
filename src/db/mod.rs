mod sqlite;

use std::fmt;

pub use sqlite::{
    fetch_properties, fetch_records, fetch_stats, fetch_tables, open_read_only, query_records,
    run_query, schema_description,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>, // each inner Vec is a row of stringified values
}

impl Records {
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for Records {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:<w$}"))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())
        };
        line(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            line(f, row)?;
        }
        if self.rows.is_empty() {
            writeln!(f, "(no rows)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableProperties {
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// Figures shown on the overview screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub patients: i64,
    pub records: i64,
    pub prescriptions: i64,
    pub genders: Vec<(String, u64)>,
    pub blood_types: Vec<(String, u64)>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Patients:   {}", self.patients)?;
        writeln!(f, "Medical Records:  {}", self.records)?;
        writeln!(f, "Prescriptions:    {}", self.prescriptions)?;
        writeln!(f, "\nGender Distribution:")?;
        for (g, n) in &self.genders {
            writeln!(f, "  {g:<8} {n}")?;
        }
        writeln!(f, "\nBlood Type Distribution:")?;
        for (b, n) in &self.blood_types {
            writeln!(f, "  {b:<8} {n}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_render_as_aligned_table() {
        let recs = Records {
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec!["1".into(), "Lisinopril".into()]],
        };
        let text = recs.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "---+-----------");
        assert_eq!(lines[2], "1  | Lisinopril");
    }

    #[test]
    fn empty_records_say_so() {
        let recs = Records {
            columns: vec!["count".into()],
            rows: vec![],
        };
        assert!(recs.to_string().contains("(no rows)"));
    }
}
