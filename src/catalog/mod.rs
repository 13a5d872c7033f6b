//! The command catalog: one immutable [`CommandSpec`] per command id.
//!
//! Built once from configuration and only read afterwards, so a single
//! catalog can back any number of detections.

/// Gate and condition-tree types.
pub mod condition;
/// Catalog records and their pattern parameters.
pub mod spec;

pub use condition::{Acceptance, Alternative, ConditionTree, Gate, SubCondition, Target};
pub use spec::{CommandSpec, Pattern, PatternFlags};

use std::collections::{BTreeMap, HashSet};

use crate::config::{CommandDef, Config};
use crate::error::CatalogError;
use crate::eval::CMDS_SEPARATOR;

#[derive(Debug, Clone, Default)]
pub struct CommandCatalog {
    specs: BTreeMap<u32, CommandSpec>,
}

impl CommandCatalog {
    /// Build the catalog from configuration.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        Self::from_defs(&config.commands)
    }

    /// Validate and index raw command definitions.
    pub fn from_defs(defs: &[CommandDef]) -> Result<Self, CatalogError> {
        let mut specs = BTreeMap::new();
        for def in defs {
            let spec = CommandSpec::try_from(def)?;
            let id = spec.id;
            if specs.insert(id, spec).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { specs })
    }

    pub fn get(&self, id: u32) -> Option<&CommandSpec> {
        self.specs.get(&id)
    }

    /// Highest catalog id, or 0 for an empty catalog.
    pub fn highest_id(&self) -> u32 {
        self.specs.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Every id in ascending order, formatted as an allowed-commands list.
    pub fn all_ids(&self) -> String {
        self.specs
            .keys()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(CMDS_SEPARATOR)
    }

    /// Every noun any command declares as an anaphora referent.
    pub fn referents(&self) -> HashSet<String> {
        self.specs
            .values()
            .flat_map(|spec| spec.referents.iter())
            .cloned()
            .collect()
    }
}
