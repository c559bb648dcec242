use std::path::PathBuf;

use anyhow::Result;
use medichat::store::{initialize_default, DEFAULT_STORE_FILE};

fn main() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
    let init = initialize_default(&path)?;
    println!(
        "Seeded SQLite at {} ({} records, {} prescriptions)",
        path.display(),
        init.summary.records,
        init.summary.prescriptions
    );
    if let Some(report) = init.report {
        println!("\n{report}");
    }
    Ok(())
}
