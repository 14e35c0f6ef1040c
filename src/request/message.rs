use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::collab::lookup::MaterialId;
use crate::kind::JobKind;
use crate::policy::{ConfigPolicy, JobConfiguration};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("can't read batch request at {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("batch request is not valid JSON: {0}")]
    Decode(serde_json::Error),
    #[error("batch request fails schema validation")]
    Validation,
    #[error("batch request can't be deserialised: {0}")]
    Deserialise(serde_json::Error),
}

/// Selects entities for submission: a formula to be expanded by the lookup
/// service, or a material id taken directly. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntitySelector {
    Material { material_id: MaterialId },
    Formula { formula: String },
}

impl EntitySelector {
    /// The formula this selector carries, if any; recorded in the ledger
    pub fn formula(&self) -> Option<&str> {
        match self {
            EntitySelector::Material { .. } => None,
            EntitySelector::Formula { formula } => Some(formula),
        }
    }
}

impl fmt::Display for EntitySelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntitySelector::Material { material_id } => write!(f, "material {material_id}"),
            EntitySelector::Formula { formula } => write!(f, "formula {formula}"),
        }
    }
}

/// One batch of selectors processed under a single admission cap
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRequest {
    pub cap: usize,
    pub job_kind: JobKind,
    pub selectors: Vec<EntitySelector>,
    #[serde(default)]
    pub base_config: JobConfiguration,
    #[serde(default)]
    pub policy: ConfigPolicy,
}

/// A batch request message on disk plus the schema it must satisfy
pub struct RequestFile {
    pub path: PathBuf,
    pub compiled_schema: JSONSchema,
}

impl RequestFile {
    pub fn read(&self) -> Result<BatchRequest, RequestError> {
        let json = self.parse_untyped_json()?;

        match self.validate(&json) {
            Ok(_) => {
                info!("Batch request is valid");
                parse_json(json)
            }
            Err(err) => {
                warn!("Batch request fails validation");
                Err(err)
            }
        }
    }

    fn validate(&self, json: &Value) -> Result<(), RequestError> {
        info!("Validating raw batch request against JSON schema");
        match self.compiled_schema.validate(json) {
            Ok(_) => Ok(()),
            Err(_) => Err(RequestError::Validation),
        }
    }

    fn read_file(&self) -> Result<String, RequestError> {
        let path: &Path = self.path.as_path();
        info!("Reading batch request at {}", path.display());
        fs::read_to_string(path).map_err(|source| RequestError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse_untyped_json(&self) -> Result<Value, RequestError> {
        let json_string = self.read_file()?;
        serde_json::from_str::<Value>(&json_string).map_err(RequestError::Decode)
    }
}

fn parse_json(value: Value) -> Result<BatchRequest, RequestError> {
    info!("Deserialising valid JSON into typed batch request");
    serde_json::from_value::<BatchRequest>(value).map_err(RequestError::Deserialise)
}
