use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use rand::Rng;
use rusqlite::{params, Transaction};
use tracing::debug;

use super::catalog::{DIAGNOSES, DOSAGES, FREQUENCIES, INSTRUCTIONS, NOTES, TREATMENT_PLANS};
use super::schema::{MEDICAL_RECORDS, PRESCRIPTIONS};
use super::seed::{DOCTOR_ROWS, MEDICATION_ROWS, PATIENT_ROWS};
use super::StoreError;

pub const RECORDS_PER_PATIENT: RangeInclusive<usize> = 1..=3;
pub const PRESCRIPTIONS_PER_RECORD: RangeInclusive<usize> = 1..=3;
/// Days before the generation date a visit may fall on.
pub const VISIT_LOOKBACK_DAYS: RangeInclusive<u64> = 1..=365;
pub const FOLLOW_UP_OFFSET_DAYS: RangeInclusive<u64> = 14..=90;
pub const COURSE_LENGTH_DAYS: RangeInclusive<u64> = 7..=30;
pub const PRESCRIPTION_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPrescription {
    pub medication_id: i64,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub instructions: &'static str,
}

/// A medical record together with the prescriptions written at that visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encounter {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub diagnosis: &'static str,
    pub treatment_plan: &'static str,
    pub visit_date: NaiveDate,
    pub follow_up_date: NaiveDate,
    pub notes: &'static str,
    pub prescriptions: Vec<PlannedPrescription>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertedCounts {
    pub records: usize,
    pub prescriptions: usize,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, set: &[&'static str]) -> &'static str {
    set[rng.gen_range(0..set.len())]
}

fn pick_id<R: Rng + ?Sized>(rng: &mut R, rows: usize) -> i64 {
    rng.gen_range(1..=rows as i64)
}

fn plus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

fn plan_prescriptions<R: Rng + ?Sized>(rng: &mut R, visit_date: NaiveDate) -> Vec<PlannedPrescription> {
    if !rng.gen_bool(PRESCRIPTION_PROBABILITY) {
        return Vec::new();
    }
    let count = rng.gen_range(PRESCRIPTIONS_PER_RECORD);
    (0..count)
        .map(|_| {
            let medication_id = pick_id(rng, MEDICATION_ROWS.len());
            let dosage = pick(rng, &DOSAGES);
            let frequency = pick(rng, &FREQUENCIES);
            let end_date = plus_days(visit_date, rng.gen_range(COURSE_LENGTH_DAYS));
            PlannedPrescription {
                medication_id,
                dosage,
                frequency,
                start_date: visit_date,
                end_date,
                instructions: pick(rng, &INSTRUCTIONS),
            }
        })
        .collect()
}

/// Plan the encounters of every seeded patient relative to `today`.
pub fn plan_encounters<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Vec<Encounter> {
    let mut encounters = Vec::new();
    for patient_id in 1..=PATIENT_ROWS.len() as i64 {
        for _ in 0..rng.gen_range(RECORDS_PER_PATIENT) {
            let lookback = rng.gen_range(VISIT_LOOKBACK_DAYS);
            let visit_date = today
                .checked_sub_days(Days::new(lookback))
                .unwrap_or(NaiveDate::MIN);
            let follow_up_date = plus_days(visit_date, rng.gen_range(FOLLOW_UP_OFFSET_DAYS));
            let doctor_id = pick_id(rng, DOCTOR_ROWS.len());
            let diagnosis = pick(rng, &DIAGNOSES);
            let treatment_plan = pick(rng, &TREATMENT_PLANS);
            let notes = pick(rng, &NOTES);
            let prescriptions = plan_prescriptions(rng, visit_date);
            encounters.push(Encounter {
                patient_id,
                doctor_id,
                diagnosis,
                treatment_plan,
                visit_date,
                follow_up_date,
                notes,
                prescriptions,
            });
        }
    }
    encounters
}

/// Write planned encounters. Prescriptions are attached to the record id
/// SQLite assigned to their parent.
pub fn insert_encounters(tx: &Transaction<'_>, encounters: &[Encounter]) -> Result<InsertedCounts, StoreError> {
    let mut record_stmt = tx.prepare(
        "INSERT INTO medical_records (patient_id, doctor_id, diagnosis, treatment_plan,
                                      visit_date, follow_up_date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let mut prescription_stmt = tx.prepare(
        "INSERT INTO prescriptions (record_id, medication_id, dosage, frequency,
                                    start_date, end_date, instructions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    let mut counts = InsertedCounts::default();
    for e in encounters {
        let record_id = record_stmt
            .insert(params![
                e.patient_id,
                e.doctor_id,
                e.diagnosis,
                e.treatment_plan,
                e.visit_date,
                e.follow_up_date,
                e.notes,
            ])
            .map_err(StoreError::on_insert(MEDICAL_RECORDS))?;
        counts.records += 1;

        for p in &e.prescriptions {
            prescription_stmt
                .execute(params![
                    record_id,
                    p.medication_id,
                    p.dosage,
                    p.frequency,
                    p.start_date,
                    p.end_date,
                    p.instructions,
                ])
                .map_err(StoreError::on_insert(PRESCRIPTIONS))?;
            counts.prescriptions += 1;
        }
    }
    debug!(
        "inserted {} records and {} prescriptions",
        counts.records, counts.prescriptions
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{configure_pragmas, create_schema};
    use crate::store::seed::load_reference_data;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rusqlite::Connection;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn plans(seed: u64) -> Vec<Encounter> {
        let mut rng = StdRng::seed_from_u64(seed);
        plan_encounters(&mut rng, today())
    }

    #[test]
    fn every_patient_gets_one_to_three_records() {
        for seed in 0..50 {
            let encounters = plans(seed);
            for patient_id in 1..=5 {
                let n = encounters.iter().filter(|e| e.patient_id == patient_id).count();
                assert!(RECORDS_PER_PATIENT.contains(&n), "seed {seed}: patient {patient_id} has {n}");
            }
        }
    }

    #[test]
    fn dates_respect_ordering() {
        for seed in 0..50 {
            for e in plans(seed) {
                assert!(e.visit_date < today());
                assert!(e.visit_date >= today() - Days::new(365));
                assert!(e.follow_up_date > e.visit_date);
                let gap = (e.follow_up_date - e.visit_date).num_days();
                assert!((14..=90).contains(&gap));
                for p in &e.prescriptions {
                    assert_eq!(p.start_date, e.visit_date);
                    assert!(p.end_date > p.start_date);
                    assert!((7..=30).contains(&(p.end_date - p.start_date).num_days()));
                }
            }
        }
    }

    #[test]
    fn references_stay_within_seeded_ids() {
        for seed in 0..50 {
            for e in plans(seed) {
                assert!((1..=5).contains(&e.doctor_id));
                assert!(e.prescriptions.len() <= 3);
                assert!(e.prescriptions.iter().all(|p| (1..=5).contains(&p.medication_id)));
            }
        }
    }

    #[test]
    fn values_come_from_catalog() {
        for e in plans(7) {
            assert!(DIAGNOSES.contains(&e.diagnosis));
            assert!(TREATMENT_PLANS.contains(&e.treatment_plan));
            assert!(NOTES.contains(&e.notes));
            for p in &e.prescriptions {
                assert!(DOSAGES.contains(&p.dosage));
                assert!(FREQUENCIES.contains(&p.frequency));
                assert!(INSTRUCTIONS.contains(&p.instructions));
            }
        }
    }

    #[test]
    fn same_seed_same_plan() {
        assert_eq!(plans(42), plans(42));
    }

    #[test]
    fn some_records_have_no_prescriptions() {
        let all: Vec<Encounter> = (0..20).flat_map(plans).collect();
        assert!(all.iter().any(|e| e.prescriptions.is_empty()));
        assert!(all.iter().any(|e| !e.prescriptions.is_empty()));
    }

    #[test]
    fn inserted_prescriptions_point_at_their_record() {
        let mut conn = Connection::open_in_memory().unwrap();
        configure_pragmas(&conn).unwrap();
        create_schema(&conn).unwrap();
        let encounters = plans(3);
        let tx = conn.transaction().unwrap();
        load_reference_data(&tx).unwrap();
        let counts = insert_encounters(&tx, &encounters).unwrap();
        tx.commit().unwrap();

        assert_eq!(counts.records, encounters.len());
        let mismatched: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM prescriptions p
                 JOIN medical_records r ON p.record_id = r.record_id
                 WHERE p.start_date <> r.visit_date",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(mismatched, 0);
    }

    #[test]
    fn unknown_doctor_is_a_constraint_violation() {
        let mut conn = Connection::open_in_memory().unwrap();
        configure_pragmas(&conn).unwrap();
        create_schema(&conn).unwrap();
        let mut encounters = plans(1);
        encounters[0].doctor_id = 99;
        let tx = conn.transaction().unwrap();
        load_reference_data(&tx).unwrap();
        let err = insert_encounters(&tx, &encounters).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ConstraintViolation { table: MEDICAL_RECORDS, .. }
        ));
    }
}
