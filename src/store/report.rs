use std::fmt;

use rusqlite::Connection;

use super::DiagnosticError;
use crate::db::{query_records, Records};

const SAMPLE_PATIENTS: &str =
    "SELECT patient_id, first_name, last_name, gender, blood_type FROM patients LIMIT 5";

const SAMPLE_RECORDS: &str = "SELECT r.record_id, p.first_name || ' ' || p.last_name AS patient,
        d.first_name || ' ' || d.last_name AS doctor, r.diagnosis, r.visit_date
    FROM medical_records r
    JOIN patients p ON r.patient_id = p.patient_id
    JOIN doctors d ON r.doctor_id = d.doctor_id
    LIMIT 5";

const SAMPLE_PRESCRIPTIONS: &str = "SELECT pr.prescription_id, p.first_name || ' ' || p.last_name AS patient,
        m.name AS medication, pr.dosage, pr.frequency
    FROM prescriptions pr
    JOIN medical_records r ON pr.record_id = r.record_id
    JOIN patients p ON r.patient_id = p.patient_id
    JOIN medications m ON pr.medication_id = m.medication_id
    LIMIT 5";

/// Joined samples printed after seeding, for a human to eyeball.
#[derive(Debug, Clone)]
pub struct SampleReport {
    pub patients: Records,
    pub records: Records,
    pub prescriptions: Records,
}

fn run(conn: &Connection, query: &'static str) -> Result<Records, DiagnosticError> {
    query_records(conn, query).map_err(|source| DiagnosticError { query, source })
}

/// Run the sample queries. Read-only.
pub fn sample_report(conn: &Connection) -> Result<SampleReport, DiagnosticError> {
    Ok(SampleReport {
        patients: run(conn, SAMPLE_PATIENTS)?,
        records: run(conn, SAMPLE_RECORDS)?,
        prescriptions: run(conn, SAMPLE_PRESCRIPTIONS)?,
    })
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample Patients:")?;
        writeln!(f, "{}", self.patients)?;
        writeln!(f, "Sample Medical Records:")?;
        writeln!(f, "{}", self.records)?;
        writeln!(f, "Sample Prescriptions:")?;
        write!(f, "{}", self.prescriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tables_surface_the_failing_query() {
        let conn = Connection::open_in_memory().unwrap();
        let err = sample_report(&conn).unwrap_err();
        assert_eq!(err.query, SAMPLE_PATIENTS);
    }
}
