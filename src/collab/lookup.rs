use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A stable, globally unique material identifier of the form `mp-<integer>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MaterialId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid material id {0:?}: expected the form mp-<integer>")]
pub struct MaterialIdError(pub String);

impl MaterialId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MaterialId {
    type Error = MaterialIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.strip_prefix("mp-") {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(MaterialId(value))
            }
            _ => Err(MaterialIdError(value)),
        }
    }
}

impl FromStr for MaterialId {
    type Err = MaterialIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaterialId::try_from(s.to_string())
    }
}

impl From<MaterialId> for String {
    fn from(id: MaterialId) -> String {
        id.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural input for one material, passed opaquely to the workflow
/// builder; `num_sites` feeds the configuration policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub material_id: MaterialId,
    pub formula: String,
    pub num_sites: u32,
    #[serde(default)]
    pub lattice: Value,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup service returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },
    #[error("lookup service has no record of {0}")]
    UnknownMaterial(MaterialId),
}

/// The external materials-data service
///
/// A formula may expand to zero materials; that is not an error.
pub trait MaterialsLookup {
    fn expand(&self, formula: &str) -> Result<Vec<MaterialId>, LookupError>;
    fn fetch_structure(&self, material_id: &MaterialId) -> Result<Structure, LookupError>;
}

/// Materials API key, passed explicitly rather than read from ambient state
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> ApiKey {
        ApiKey(key.into())
    }
}

// the key never appears in logs or error messages
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ApiKey(..)")
    }
}

/// Blocking HTTP client for the materials API summary endpoint
pub struct MpClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: ApiKey,
}

#[derive(Deserialize)]
struct SummaryPage {
    data: Vec<SummaryDoc>,
}

#[derive(Deserialize)]
struct SummaryDoc {
    material_id: MaterialId,
    #[serde(default)]
    formula_pretty: String,
    #[serde(default)]
    nsites: u32,
    #[serde(default)]
    structure: Value,
}

impl MpClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.materialsproject.org";

    pub fn new(base_url: &str, api_key: ApiKey) -> Result<MpClient, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(MpClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn get_summary(&self, query: &[(&str, &str)]) -> Result<Vec<SummaryDoc>, LookupError> {
        let endpoint = format!("{}/materials/summary/", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .header("X-API-KEY", self.api_key.0.as_str())
            .query(query)
            .send()?;
        if !response.status().is_success() {
            return Err(LookupError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }
        let page: SummaryPage = response.json()?;
        Ok(page.data)
    }
}

impl MaterialsLookup for MpClient {
    fn expand(&self, formula: &str) -> Result<Vec<MaterialId>, LookupError> {
        let docs = self.get_summary(&[("formula", formula), ("_fields", "material_id")])?;
        let ids: Vec<MaterialId> = docs.into_iter().map(|doc| doc.material_id).collect();
        info!("formula {} expands to {} materials", formula, ids.len());
        Ok(ids)
    }

    fn fetch_structure(&self, material_id: &MaterialId) -> Result<Structure, LookupError> {
        let docs = self.get_summary(&[
            ("material_ids", material_id.as_str()),
            ("_fields", "material_id,formula_pretty,nsites,structure"),
        ])?;
        let doc = docs
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::UnknownMaterial(material_id.clone()))?;
        Ok(Structure {
            material_id: doc.material_id,
            formula: doc.formula_pretty,
            num_sites: doc.nsites,
            lattice: doc.structure,
        })
    }
}
