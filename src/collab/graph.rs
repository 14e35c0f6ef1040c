use serde_json::{json, Value};
use thiserror::Error;

use crate::collab::lookup::{MaterialId, Structure};
use crate::kind::JobKind;
use crate::policy::JobConfiguration;

/// An opaque job graph, ready for submission
///
/// The payload is whatever the builder produced; this layer never looks
/// inside it. `task_count` is builder-declared metadata: the number of units
/// of work the store will allocate sub-task ids for.
#[derive(Debug, Clone, PartialEq)]
pub struct JobGraph {
    name: String,
    task_count: usize,
    payload: Value,
}

impl JobGraph {
    pub fn new(name: impl Into<String>, task_count: usize, payload: Value) -> JobGraph {
        JobGraph {
            name: name.into(),
            task_count,
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("structure for {material_id} has no sites, can't build a workflow")]
    EmptyStructure { material_id: MaterialId },
}

/// The external workflow-construction library
pub trait GraphBuilder {
    fn build(
        &self,
        kind: JobKind,
        structure: &Structure,
        config: &JobConfiguration,
    ) -> Result<JobGraph, GraphError>;
}

/// Builds preset workflows, one fixed step chain per job kind
pub struct PresetBuilder;

fn preset_steps(kind: JobKind) -> &'static [&'static str] {
    match kind {
        JobKind::Dielectric => &["structure optimization", "static dielectric"],
        JobKind::Elastic => &["structure optimization", "elastic deformation"],
        JobKind::Gibbs => &["structure optimization", "phonon", "gibbs free energy"],
        JobKind::Bandstructure => &["structure optimization", "static", "nscf line"],
    }
}

impl GraphBuilder for PresetBuilder {
    fn build(
        &self,
        kind: JobKind,
        structure: &Structure,
        config: &JobConfiguration,
    ) -> Result<JobGraph, GraphError> {
        if structure.num_sites == 0 {
            return Err(GraphError::EmptyStructure {
                material_id: structure.material_id.clone(),
            });
        }
        let steps = preset_steps(kind);
        let name = format!("{}:{}", structure.formula, kind);
        let payload = json!({
            "name": name,
            "structure": structure.lattice,
            "spec": { "incar_update": config },
            "tasks": steps,
        });
        Ok(JobGraph::new(name, steps.len(), payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure(num_sites: u32) -> Structure {
        Structure {
            material_id: "mp-594".parse().unwrap(),
            formula: "NiS".to_string(),
            num_sites,
            lattice: Value::Null,
        }
    }

    #[test]
    fn preset_graph_carries_one_task_per_step() {
        let graph = PresetBuilder
            .build(JobKind::Gibbs, &structure(4), &JobConfiguration::new())
            .unwrap();
        assert_eq!(graph.task_count(), 3);
        assert_eq!(graph.name(), "NiS:gibbs");
    }

    #[test]
    fn empty_structure_is_rejected() {
        let err = PresetBuilder
            .build(JobKind::Dielectric, &structure(0), &JobConfiguration::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::EmptyStructure { .. }));
    }
}
