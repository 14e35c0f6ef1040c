use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;
use serde::Deserialize;
use serde_json::Value;

use crate::collab::graph::JobGraph;
use crate::collab::lookup::{LookupError, MaterialId, MaterialsLookup, Structure};
use crate::collab::store::{JobStore, StoreError};

/// Offline stand-in for the materials lookup service, loaded from a JSON
/// file of the form `{"materials": [{"material_id": ..., "formula": ...,
/// "num_sites": ...}, ...]}`
#[derive(Debug, Deserialize)]
pub struct FixtureBook {
    materials: Vec<FixtureMaterial>,
}

#[derive(Debug, Deserialize)]
struct FixtureMaterial {
    material_id: MaterialId,
    formula: String,
    num_sites: u32,
    #[serde(default)]
    lattice: Value,
}

impl FixtureBook {
    pub fn from_path(path: &Path) -> anyhow::Result<FixtureBook> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("can't read fixture book at {}", path.display()))?;
        let book: FixtureBook = serde_json::from_str(&content)
            .with_context(|| format!("fixture book at {} is not valid", path.display()))?;
        info!(
            "Loaded fixture book with {} materials from {}",
            book.materials.len(),
            path.display()
        );
        Ok(book)
    }

    pub fn from_value(value: Value) -> serde_json::Result<FixtureBook> {
        serde_json::from_value(value)
    }
}

impl MaterialsLookup for FixtureBook {
    fn expand(&self, formula: &str) -> Result<Vec<MaterialId>, LookupError> {
        Ok(self
            .materials
            .iter()
            .filter(|m| m.formula == formula)
            .map(|m| m.material_id.clone())
            .collect())
    }

    fn fetch_structure(&self, material_id: &MaterialId) -> Result<Structure, LookupError> {
        self.materials
            .iter()
            .find(|m| &m.material_id == material_id)
            .map(|m| Structure {
                material_id: m.material_id.clone(),
                formula: m.formula.clone(),
                num_sites: m.num_sites,
                lattice: m.lattice.clone(),
            })
            .ok_or_else(|| LookupError::UnknownMaterial(material_id.clone()))
    }
}

/// Offline job store that allocates monotonically increasing id blocks, one
/// contiguous block per submitted graph
pub struct SequentialStore {
    next: Cell<u64>,
}

impl SequentialStore {
    pub fn new(first_id: u64) -> SequentialStore {
        SequentialStore {
            next: Cell::new(first_id),
        }
    }
}

impl JobStore for SequentialStore {
    fn submit(&self, graph: &JobGraph) -> Result<BTreeSet<u64>, StoreError> {
        let low = self.next.get();
        let high = low + graph.task_count() as u64;
        self.next.set(high);
        Ok((low..high).collect())
    }

    fn report_failed(&self) -> Result<Vec<u64>, StoreError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book() -> FixtureBook {
        FixtureBook::from_value(json!({
            "materials": [
                { "material_id": "mp-594", "formula": "NiS", "num_sites": 4 },
                { "material_id": "mp-1547", "formula": "NiS", "num_sites": 8 },
            ]
        }))
        .unwrap()
    }

    #[test]
    fn expansion_matches_formula() {
        let ids = book().expand("NiS").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(book().expand("MgO").unwrap().is_empty());
    }

    #[test]
    fn unknown_material_is_an_error() {
        let id: MaterialId = "mp-9999".parse().unwrap();
        assert!(matches!(
            book().fetch_structure(&id),
            Err(LookupError::UnknownMaterial(_))
        ));
    }

    #[test]
    fn store_allocates_contiguous_ascending_blocks() {
        let store = SequentialStore::new(100);
        let graph = JobGraph::new("a", 3, Value::Null);
        let first = store.submit(&graph).unwrap();
        let second = store.submit(&graph).unwrap();
        assert_eq!(first, (100..103).collect::<BTreeSet<u64>>());
        assert_eq!(second, (103..106).collect::<BTreeSet<u64>>());
    }
}
