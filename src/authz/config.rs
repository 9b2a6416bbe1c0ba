use serde::{Deserialize, Serialize};

use super::access_list::{AccessList, CombinationStrategy};
use super::rule::{AccessListEntry, AccessRule};
use crate::errors::AclError;

/// Raw rule shape as it appears in configuration.
///
/// Conversion into an [`AccessRule`] funnels through the entry setters, so
/// a malformed field surfaces the same typed error the builder would raise
/// and never becomes a rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TryFrom<RuleConfig> for AccessRule {
    type Error = AclError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        let mut entry = AccessListEntry::new();
        entry.set_action(&config.action)?;
        entry.set_claim(&config.claim)?;
        entry.set_values(config.values)?;
        for method in &config.methods {
            entry.add_method(method)?;
        }
        if let Some(path) = &config.path {
            entry.set_path(path)?;
        }
        entry.build()
    }
}

/// Top-level access list configuration. The combination strategy is
/// required; a configuration that does not name one does not deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessListConfig {
    pub strategy: CombinationStrategy,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl TryFrom<AccessListConfig> for AccessList {
    type Error = AclError;

    fn try_from(config: AccessListConfig) -> Result<Self, Self::Error> {
        let mut list = AccessList::new(config.strategy);
        for rule in config.rules {
            list.push(AccessRule::try_from(rule)?);
        }
        Ok(list)
    }
}
