use chrono::Utc;
use log::info;
use rusqlite::Connection;

use crate::ledger::record::ProvenanceLedger;

/// Append one run's ledger to the database, preserving submission order
pub fn save_ledger(conn: &Connection, ledger: &ProvenanceLedger) -> rusqlite::Result<()> {
    let submitted_at = Utc::now().to_rfc3339();
    for record in ledger.records() {
        conn.execute(
            "INSERT INTO submission (material_id, formula, job_kind, task_range, submitted_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.material_id.as_str(),
                record.formula.as_deref(),
                record.kind.as_str(),
                record.range.to_string(),
                submitted_at,
            ],
        )?;
    }
    info!("Saved {} ledger records", ledger.len());
    Ok(())
}
