use rusqlite::Connection;
use tracing::debug;

use super::StoreError;

pub const PATIENTS: &str = "patients";
pub const DOCTORS: &str = "doctors";
pub const MEDICATIONS: &str = "medications";
pub const MEDICAL_RECORDS: &str = "medical_records";
pub const PRESCRIPTIONS: &str = "prescriptions";

/// Tables in creation order. Referenced tables come before the tables that
/// reference them.
pub const TABLES: [(&str, &str); 5] = [
    (
        PATIENTS,
        "CREATE TABLE patients (
            patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name VARCHAR(50),
            last_name VARCHAR(50),
            date_of_birth DATE,
            gender VARCHAR(10),
            blood_type VARCHAR(5),
            contact_number VARCHAR(15),
            email VARCHAR(100) UNIQUE,
            address TEXT,
            registration_date DATE
        )",
    ),
    (
        DOCTORS,
        "CREATE TABLE doctors (
            doctor_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name VARCHAR(50),
            last_name VARCHAR(50),
            specialization VARCHAR(100),
            license_number VARCHAR(20) UNIQUE,
            contact_number VARCHAR(15),
            email VARCHAR(100)
        )",
    ),
    (
        MEDICATIONS,
        "CREATE TABLE medications (
            medication_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100),
            manufacturer VARCHAR(100),
            category VARCHAR(50),
            description TEXT,
            standard_dosage VARCHAR(50),
            side_effects TEXT
        )",
    ),
    (
        MEDICAL_RECORDS,
        "CREATE TABLE medical_records (
            record_id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER NOT NULL,
            doctor_id INTEGER NOT NULL,
            diagnosis TEXT,
            treatment_plan TEXT,
            visit_date DATE NOT NULL,
            follow_up_date DATE NOT NULL,
            notes TEXT,
            FOREIGN KEY (patient_id) REFERENCES patients (patient_id),
            FOREIGN KEY (doctor_id) REFERENCES doctors (doctor_id),
            CHECK (follow_up_date > visit_date)
        )",
    ),
    (
        PRESCRIPTIONS,
        "CREATE TABLE prescriptions (
            prescription_id INTEGER PRIMARY KEY AUTOINCREMENT,
            record_id INTEGER NOT NULL,
            medication_id INTEGER NOT NULL,
            dosage VARCHAR(50),
            frequency VARCHAR(50),
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            instructions TEXT,
            FOREIGN KEY (record_id) REFERENCES medical_records (record_id),
            FOREIGN KEY (medication_id) REFERENCES medications (medication_id),
            CHECK (end_date > start_date)
        )",
    ),
];

/// Turn on foreign-key enforcement for this connection.
pub fn configure_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    for (name, ddl) in TABLES {
        debug!("creating table {name}");
        conn.execute_batch(ddl)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn creates_tables_in_dependency_order() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        assert_eq!(
            table_names(&conn),
            vec![PATIENTS, DOCTORS, MEDICATIONS, MEDICAL_RECORDS, PRESCRIPTIONS]
        );
    }

    #[test]
    fn dangling_doctor_reference_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        configure_pragmas(&conn).unwrap();
        create_schema(&conn).unwrap();
        conn.execute("INSERT INTO patients (first_name) VALUES ('A')", []).unwrap();
        let err = conn
            .execute(
                "INSERT INTO medical_records (patient_id, doctor_id, visit_date, follow_up_date)
                 VALUES (1, 42, '2024-01-01', '2024-02-01')",
                [],
            )
            .unwrap_err();
        assert_eq!(err.sqlite_error_code(), Some(rusqlite::ErrorCode::ConstraintViolation));
    }

    #[test]
    fn follow_up_must_post_date_visit() {
        let conn = Connection::open_in_memory().unwrap();
        configure_pragmas(&conn).unwrap();
        create_schema(&conn).unwrap();
        conn.execute("INSERT INTO patients (first_name) VALUES ('A')", []).unwrap();
        conn.execute("INSERT INTO doctors (first_name) VALUES ('B')", []).unwrap();
        let same_day = conn.execute(
            "INSERT INTO medical_records (patient_id, doctor_id, visit_date, follow_up_date)
             VALUES (1, 1, '2024-01-01', '2024-01-01')",
            [],
        );
        assert!(same_day.is_err());
    }
}
