//! Creation and seeding of the medical store.
//!
//! The store is always rebuilt from scratch: any existing file is removed,
//! the five tables are created, the fixed reference rows are loaded and a
//! random set of encounters is generated on top of them, all inside a single
//! transaction.

mod catalog;
mod error;
mod generator;
mod report;
mod schema;
mod seed;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rand::Rng;
use rusqlite::Connection;
use tracing::{info, warn};

pub use catalog::*;
pub use error::{DiagnosticError, StoreError};
pub use generator::{
    insert_encounters, plan_encounters, Encounter, InsertedCounts, PlannedPrescription,
    COURSE_LENGTH_DAYS, FOLLOW_UP_OFFSET_DAYS, PRESCRIPTIONS_PER_RECORD, PRESCRIPTION_PROBABILITY,
    RECORDS_PER_PATIENT, VISIT_LOOKBACK_DAYS,
};
pub use report::{sample_report, SampleReport};
pub use schema::{
    configure_pragmas, create_schema, DOCTORS, MEDICAL_RECORDS, MEDICATIONS, PATIENTS,
    PRESCRIPTIONS, TABLES,
};
pub use seed::{
    load_reference_data, Doctor, Medication, Patient, DOCTOR_ROWS, MEDICATION_ROWS, PATIENT_ROWS,
};

pub const DEFAULT_STORE_FILE: &str = "medical.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub patients: usize,
    pub doctors: usize,
    pub medications: usize,
    pub records: usize,
    pub prescriptions: usize,
}

#[derive(Debug)]
pub struct Initialized {
    pub summary: SeedSummary,
    /// `None` when a sample query failed; the seeded data is unaffected.
    pub report: Option<SampleReport>,
}

fn journal_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("-journal");
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::StoreState {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove the store file and any leftover rollback journal.
pub fn reset_store(path: &Path) -> Result<(), StoreError> {
    remove_if_present(path)?;
    remove_if_present(&journal_path(path))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::StoreState {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn populate(path: &Path, encounters: &[Encounter]) -> Result<(Connection, SeedSummary), StoreError> {
    let mut conn = Connection::open(path)?;
    configure_pragmas(&conn)?;

    let summary = {
        let tx = conn.transaction()?;
        create_schema(&tx)?;
        load_reference_data(&tx)?;
        let counts = insert_encounters(&tx, encounters)?;
        tx.commit()?;
        SeedSummary {
            patients: PATIENT_ROWS.len(),
            doctors: DOCTOR_ROWS.len(),
            medications: MEDICATION_ROWS.len(),
            records: counts.records,
            prescriptions: counts.prescriptions,
        }
    };
    Ok((conn, summary))
}

/// Rebuild the store at `path`, drawing encounters from `rng` relative to `today`.
///
/// On failure the partially written file is removed before the error is
/// returned. Sample-report failures are logged and leave `report` empty.
pub fn initialize_store<R: Rng + ?Sized>(
    path: &Path,
    rng: &mut R,
    today: NaiveDate,
) -> Result<Initialized, StoreError> {
    let encounters = plan_encounters(rng, today);
    initialize_with(path, &encounters)
}

fn initialize_with(path: &Path, encounters: &[Encounter]) -> Result<Initialized, StoreError> {
    reset_store(path)?;

    let (conn, summary) = match populate(path, encounters) {
        Ok(v) => v,
        Err(e) => {
            warn!("store initialization failed, discarding {}: {e}", path.display());
            if let Err(cleanup) = reset_store(path) {
                warn!("could not discard {}: {cleanup}", path.display());
            }
            return Err(e);
        }
    };
    info!(
        "store initialized at {}: {} records, {} prescriptions",
        path.display(),
        summary.records,
        summary.prescriptions
    );

    let report = match sample_report(&conn) {
        Ok(r) => Some(r),
        Err(e) => {
            warn!("{e}");
            None
        }
    };
    Ok(Initialized { summary, report })
}

/// Rebuild the store with an unseeded generator dated today.
pub fn initialize_default(path: &Path) -> Result<Initialized, StoreError> {
    initialize_store(path, &mut rand::thread_rng(), Local::now().date_naive())
}

/// Seed the store only when no regular file exists at `path`.
pub fn ensure_store(path: &Path) -> Result<Option<Initialized>, StoreError> {
    if path.is_file() {
        return Ok(None);
    }
    info!("no store at {}, initializing with sample data", path.display());
    initialize_default(path).map(Some)
}
