use rusqlite::{params, Transaction};
use tracing::debug;

use super::schema::{DOCTORS, MEDICATIONS, PATIENTS};
use super::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub date_of_birth: &'static str,
    pub gender: &'static str,
    pub blood_type: &'static str,
    pub contact_number: &'static str,
    pub email: &'static str,
    pub address: &'static str,
    pub registration_date: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub specialization: &'static str,
    pub license_number: &'static str,
    pub contact_number: &'static str,
    pub email: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Medication {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub standard_dosage: &'static str,
    pub side_effects: &'static str,
}

/// Row `i` of each list receives id `i + 1`; the encounter generator relies on it.
pub const PATIENT_ROWS: [Patient; 5] = [
    Patient {
        first_name: "John",
        last_name: "Smith",
        date_of_birth: "1985-03-20",
        gender: "Male",
        blood_type: "A+",
        contact_number: "555-123-4567",
        email: "john.smith@email.com",
        address: "123 Main St, Anytown",
        registration_date: "2023-01-15",
    },
    Patient {
        first_name: "Sarah",
        last_name: "Johnson",
        date_of_birth: "1990-07-12",
        gender: "Female",
        blood_type: "O-",
        contact_number: "555-234-5678",
        email: "sarah.j@email.com",
        address: "456 Oak Ave, Somewhere",
        registration_date: "2023-02-20",
    },
    Patient {
        first_name: "Michael",
        last_name: "Williams",
        date_of_birth: "1978-11-30",
        gender: "Male",
        blood_type: "B+",
        contact_number: "555-345-6789",
        email: "michael.w@email.com",
        address: "789 Pine Rd, Elsewhere",
        registration_date: "2023-03-05",
    },
    Patient {
        first_name: "Emily",
        last_name: "Brown",
        date_of_birth: "1995-04-25",
        gender: "Female",
        blood_type: "AB+",
        contact_number: "555-456-7890",
        email: "emily.b@email.com",
        address: "101 Cedar Ln, Nowhere",
        registration_date: "2023-01-30",
    },
    Patient {
        first_name: "Robert",
        last_name: "Jones",
        date_of_birth: "1965-09-18",
        gender: "Male",
        blood_type: "A-",
        contact_number: "555-567-8901",
        email: "robert.j@email.com",
        address: "202 Maple Dr, Anywhere",
        registration_date: "2023-02-10",
    },
];

pub const DOCTOR_ROWS: [Doctor; 5] = [
    Doctor {
        first_name: "Elizabeth",
        last_name: "Taylor",
        specialization: "Cardiology",
        license_number: "MD12345",
        contact_number: "555-987-6543",
        email: "dr.taylor@hospital.com",
    },
    Doctor {
        first_name: "James",
        last_name: "Anderson",
        specialization: "Neurology",
        license_number: "MD23456",
        contact_number: "555-876-5432",
        email: "dr.anderson@hospital.com",
    },
    Doctor {
        first_name: "Patricia",
        last_name: "Martinez",
        specialization: "Pediatrics",
        license_number: "MD34567",
        contact_number: "555-765-4321",
        email: "dr.martinez@hospital.com",
    },
    Doctor {
        first_name: "William",
        last_name: "Garcia",
        specialization: "Orthopedics",
        license_number: "MD45678",
        contact_number: "555-654-3210",
        email: "dr.garcia@hospital.com",
    },
    Doctor {
        first_name: "Jennifer",
        last_name: "Lopez",
        specialization: "Dermatology",
        license_number: "MD56789",
        contact_number: "555-543-2109",
        email: "dr.lopez@hospital.com",
    },
];

pub const MEDICATION_ROWS: [Medication; 5] = [
    Medication {
        name: "Lisinopril",
        manufacturer: "Merck",
        category: "ACE Inhibitor",
        description: "Used to treat high blood pressure and heart failure",
        standard_dosage: "10mg once daily",
        side_effects: "Dry cough, dizziness, headache",
    },
    Medication {
        name: "Atorvastatin",
        manufacturer: "Pfizer",
        category: "Statin",
        description: "Used to lower cholesterol levels",
        standard_dosage: "20mg once daily",
        side_effects: "Muscle pain, joint pain, digestive issues",
    },
    Medication {
        name: "Amoxicillin",
        manufacturer: "GlaxoSmithKline",
        category: "Antibiotic",
        description: "Used to treat bacterial infections",
        standard_dosage: "500mg every 8 hours",
        side_effects: "Diarrhea, rash, nausea",
    },
    Medication {
        name: "Sertraline",
        manufacturer: "Pfizer",
        category: "SSRI",
        description: "Used to treat depression and anxiety disorders",
        standard_dosage: "50mg once daily",
        side_effects: "Nausea, insomnia, dizziness",
    },
    Medication {
        name: "Prednisone",
        manufacturer: "Novartis",
        category: "Corticosteroid",
        description: "Used to treat inflammation and autoimmune conditions",
        standard_dosage: "20mg daily, tapering",
        side_effects: "Weight gain, mood changes, increased blood sugar",
    },
];

/// Insert the fixed patients, doctors and medications.
pub fn load_reference_data(tx: &Transaction<'_>) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(
        "INSERT INTO patients (first_name, last_name, date_of_birth, gender, blood_type,
                               contact_number, email, address, registration_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for p in &PATIENT_ROWS {
        stmt.execute(params![
            p.first_name,
            p.last_name,
            p.date_of_birth,
            p.gender,
            p.blood_type,
            p.contact_number,
            p.email,
            p.address,
            p.registration_date,
        ])
        .map_err(StoreError::on_insert(PATIENTS))?;
    }

    let mut stmt = tx.prepare(
        "INSERT INTO doctors (first_name, last_name, specialization, license_number,
                              contact_number, email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for d in &DOCTOR_ROWS {
        stmt.execute(params![
            d.first_name,
            d.last_name,
            d.specialization,
            d.license_number,
            d.contact_number,
            d.email,
        ])
        .map_err(StoreError::on_insert(DOCTORS))?;
    }

    let mut stmt = tx.prepare(
        "INSERT INTO medications (name, manufacturer, category, description,
                                  standard_dosage, side_effects)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for m in &MEDICATION_ROWS {
        stmt.execute(params![
            m.name,
            m.manufacturer,
            m.category,
            m.description,
            m.standard_dosage,
            m.side_effects,
        ])
        .map_err(StoreError::on_insert(MEDICATIONS))?;
    }

    debug!(
        "reference data loaded: {} patients, {} doctors, {} medications",
        PATIENT_ROWS.len(),
        DOCTOR_ROWS.len(),
        MEDICATION_ROWS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::create_schema;
    use rusqlite::Connection;

    #[test]
    fn insertion_order_assigns_ids() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        load_reference_data(&tx).unwrap();
        tx.commit().unwrap();

        let name: String = conn
            .query_row("SELECT last_name FROM doctors WHERE doctor_id = 5", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, DOCTOR_ROWS[4].last_name);
        let med: String = conn
            .query_row("SELECT name FROM medications WHERE medication_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(med, "Lisinopril");
    }

    #[test]
    fn loading_twice_is_a_constraint_violation() {
        let mut conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        load_reference_data(&tx).unwrap();
        let err = load_reference_data(&tx).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ConstraintViolation { table: PATIENTS, .. }
        ));
    }
}
