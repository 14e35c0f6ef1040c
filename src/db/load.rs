use log::info;
use rusqlite::Connection;
use thiserror::Error;

use crate::collab::lookup::{MaterialId, MaterialIdError};
use crate::kind::{JobKind, UnknownJobKind};
use crate::ledger::record::{LedgerRecord, ProvenanceLedger};
use crate::range::{RangeError, TaskRange};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
    #[error("ledger database holds a bad task range: {0}")]
    Range(#[from] RangeError),
    #[error("ledger database holds a bad job kind: {0}")]
    Kind(#[from] UnknownJobKind),
    #[error("ledger database holds a bad material id: {0}")]
    Material(#[from] MaterialIdError),
}

/// Rebuild the persisted ledger in submission order
pub fn load_ledger(conn: &Connection) -> Result<ProvenanceLedger, LoadError> {
    let mut stmt = conn.prepare(
        "SELECT material_id, formula, job_kind, task_range FROM submission ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut ledger = ProvenanceLedger::new();
    for row in rows {
        let (material_id, formula, job_kind, task_range) = row?;
        ledger.push(LedgerRecord::new(
            material_id.parse::<MaterialId>()?,
            formula,
            job_kind.parse::<JobKind>()?,
            task_range.parse::<TaskRange>()?,
        ));
    }

    info!("Loaded {} ledger records", ledger.len());
    Ok(ledger)
}
