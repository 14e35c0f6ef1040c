use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::info;
use thiserror::Error;

use crate::collab::graph::JobGraph;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job store rejected the graph: {reason}")]
    Rejected { reason: String },
    #[error("can't reach the job store: {0}")]
    Io(#[from] std::io::Error),
    #[error("job store returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The external job store / scheduler
///
/// `submit` is atomic: either the whole allocated id set comes back or the
/// submission failed. `report_failed` returns the sub-task ids the store has
/// marked as terminally failed, independently of any submission run.
pub trait JobStore {
    fn submit(&self, graph: &JobGraph) -> Result<BTreeSet<u64>, StoreError>;
    fn report_failed(&self) -> Result<Vec<u64>, StoreError>;
}

/// Submits graphs through a launchpad-style command line tool
///
/// `<program> add <graph file> -o json` prints a JSON object mapping
/// provisional node ids to the allocated sub-task ids;
/// `<program> get_fws -s FIZZLED -d ids` prints a JSON array of failed ids.
pub struct LaunchpadCli {
    program: PathBuf,
}

impl LaunchpadCli {
    pub fn new(program: impl Into<PathBuf>) -> LaunchpadCli {
        LaunchpadCli {
            program: program.into(),
        }
    }

    fn run(&self, cmd: &mut Command) -> Result<Vec<u8>, StoreError> {
        info!("Running launchpad process {:?}", cmd);
        let output = cmd.output()?;
        if !output.status.success() {
            let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(StoreError::Rejected { reason });
        }
        Ok(output.stdout)
    }
}

impl JobStore for LaunchpadCli {
    fn submit(&self, graph: &JobGraph) -> Result<BTreeSet<u64>, StoreError> {
        let dir = tempfile::tempdir()?;
        let graph_path = dir.path().join("graph.json");
        fs::write(&graph_path, serde_json::to_vec(graph.payload())?)?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("add").arg(&graph_path).args(["-o", "json"]);
        let stdout = self.run(&mut cmd)?;

        // provisional id -> allocated id, only the values matter here
        let id_map: BTreeMap<String, u64> = serde_json::from_slice(&stdout)?;
        Ok(id_map.into_values().collect())
    }

    fn report_failed(&self) -> Result<Vec<u64>, StoreError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["get_fws", "-s", "FIZZLED", "-d", "ids"]);
        let stdout = self.run(&mut cmd)?;
        let ids: Vec<u64> = serde_json::from_slice(&stdout)?;
        Ok(ids)
    }
}
