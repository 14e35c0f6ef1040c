use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category of computation requested for a material
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Dielectric,
    Elastic,
    Gibbs,
    Bandstructure,
}

impl JobKind {
    /// The tag stored in the ledger database and printed in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Dielectric => "dielectric",
            JobKind::Elastic => "elastic",
            JobKind::Gibbs => "gibbs",
            JobKind::Bandstructure => "bandstructure",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown job kind {0:?}")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dielectric" => Ok(JobKind::Dielectric),
            "elastic" => Ok(JobKind::Elastic),
            "gibbs" => Ok(JobKind::Gibbs),
            "bandstructure" => Ok(JobKind::Bandstructure),
            other => Err(UnknownJobKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_from_str() {
        for kind in [
            JobKind::Dielectric,
            JobKind::Elastic,
            JobKind::Gibbs,
            JobKind::Bandstructure,
        ] {
            assert_eq!(kind.as_str().parse::<JobKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "phonon".parse::<JobKind>(),
            Err(UnknownJobKind("phonon".to_string()))
        );
    }
}
