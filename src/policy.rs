//! Configuration selection for one submission
//!
//! Small structures get an override applied on top of the base configuration:
//! by default the real-space projection optimisation (`LREAL`) is disabled,
//! because it is numerically unstable for small cells. Both the threshold and
//! the override entries are configuration, so new rules can be added without
//! touching the admission controller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Site count below which the small-structure override applies
pub const SMALL_SITE_THRESHOLD: u32 = 30;

/// Options passed opaquely to the workflow builder; lives only for the
/// duration of one submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobConfiguration(BTreeMap<String, Value>);

impl JobConfiguration {
    pub fn new() -> JobConfiguration {
        JobConfiguration::default()
    }

    pub fn set(&mut self, option: impl Into<String>, value: Value) {
        self.0.insert(option.into(), value);
    }

    pub fn get(&self, option: &str) -> Option<&Value> {
        self.0.get(option)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for JobConfiguration {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        JobConfiguration(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPolicy {
    pub small_site_threshold: u32,
    pub overrides: JobConfiguration,
}

impl Default for ConfigPolicy {
    fn default() -> ConfigPolicy {
        let mut overrides = JobConfiguration::new();
        overrides.set("LREAL", Value::Bool(false));
        ConfigPolicy {
            small_site_threshold: SMALL_SITE_THRESHOLD,
            overrides,
        }
    }
}

impl ConfigPolicy {
    /// Pure function: structures at or above the threshold pass the base
    /// configuration through unchanged, smaller ones get the override
    /// entries applied on top
    pub fn select_configuration(
        &self,
        num_sites: u32,
        base: &JobConfiguration,
    ) -> JobConfiguration {
        if num_sites >= self.small_site_threshold {
            return base.clone();
        }
        let mut config = base.clone();
        for (option, value) in self.overrides.iter() {
            config.set(option, value.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> JobConfiguration {
        let mut config = JobConfiguration::new();
        config.set("ENCUT", json!(520));
        config
    }

    #[test]
    fn threshold_boundary_is_non_override() {
        let policy = ConfigPolicy::default();
        assert_eq!(policy.select_configuration(30, &base()), base());
        assert_eq!(policy.select_configuration(31, &base()), base());
    }

    #[test]
    fn small_structures_are_overridden() {
        let policy = ConfigPolicy::default();
        let config = policy.select_configuration(29, &base());
        assert_eq!(config.get("LREAL"), Some(&json!(false)));
        // base entries survive the override
        assert_eq!(config.get("ENCUT"), Some(&json!(520)));
    }

    #[test]
    fn override_entries_win_over_base_entries() {
        let policy = ConfigPolicy::default();
        let mut config = base();
        config.set("LREAL", json!("Auto"));
        let selected = policy.select_configuration(2, &config);
        assert_eq!(selected.get("LREAL"), Some(&json!(false)));
    }

    #[test]
    fn threshold_and_overrides_are_configurable() {
        let mut overrides = JobConfiguration::new();
        overrides.set("ISPIN", json!(1));
        let policy = ConfigPolicy {
            small_site_threshold: 10,
            overrides,
        };
        assert_eq!(policy.select_configuration(10, &base()), base());
        let config = policy.select_configuration(9, &base());
        assert_eq!(config.get("ISPIN"), Some(&json!(1)));
        assert_eq!(config.get("LREAL"), None);
    }
}
