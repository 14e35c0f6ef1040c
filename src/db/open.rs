use log::info;

use crate::WorkingDirectory;

pub fn open_db(wd: &WorkingDirectory) -> rusqlite::Result<rusqlite::Connection> {
    let path = &wd.path.join("matbatch.db");
    if !path.exists() {
        info!("Creating new ledger database {}", path.display())
    }
    let conn = rusqlite::Connection::open(path)?;

    static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/db/schema.sql"));
    conn.execute_batch(SCHEMA)?;

    Ok(conn)
}
