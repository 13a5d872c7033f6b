//! Immutable catalog records.

use crate::catalog::condition::{ConditionTree, Gate};
use crate::config::CommandDef;
use crate::error::CatalogError;

/// Behaviour flags handed to the sub-verification oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// Never match the trigger position itself.
    pub exclude_trigger: bool,
    /// Keep only the last match of each role.
    pub last_match: bool,
    /// Clip the window at other occurrences of the same trigger token.
    pub ignore_repeated_triggers: bool,
    /// Clip the window at occurrences of any of this command's triggers.
    pub ignore_repeated_commands: bool,
    /// Each role must match after the previous matched role.
    pub ordered: bool,
    /// Leave every later role empty once one role fails to match.
    pub stop_at_first_unmatched: bool,
    /// Never match a token that is one of this command's triggers.
    pub exclude_trigger_words: bool,
    /// Roles after this one continue scanning past its match.
    pub continue_with_role: Option<usize>,
}

/// Everything the oracle needs to scan around one trigger occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub triggers: Vec<String>,
    /// One word list per role.
    pub vocabulary: Vec<Vec<String>>,
    pub left: usize,
    pub right: usize,
    /// Scan start per role, relative to the trigger. Shorter than
    /// `vocabulary` when trailing roles use the window start.
    pub starts: Vec<isize>,
    pub flags: PatternFlags,
}

impl Pattern {
    pub fn roles(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn start(&self, role: usize) -> Option<isize> {
        self.starts.get(role).copied()
    }

    pub fn is_trigger(&self, token: &str) -> bool {
        self.triggers.iter().any(|t| t == token)
    }
}

/// One catalog command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub id: u32,
    pub name: String,
    /// Nouns a later "it" may stand for.
    pub referents: Vec<String>,
    pub pattern: Pattern,
    /// Must hold for the tree to be consulted.
    pub continue_if: Gate,
    /// Must not hold for the tree to be consulted.
    pub skip_if: Gate,
    pub returns: ConditionTree,
}

impl TryFrom<&CommandDef> for CommandSpec {
    type Error = CatalogError;

    fn try_from(def: &CommandDef) -> Result<Self, Self::Error> {
        let id = u32::try_from(def.id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(CatalogError::ReservedId(def.id))?;
        let roles = def.vocabulary.len();

        if def.starts.len() > roles {
            return Err(CatalogError::TooManyStarts {
                id,
                starts: def.starts.len(),
                roles,
            });
        }
        if let Some(role) = def.continue_with_role
            && role >= roles
        {
            return Err(CatalogError::RoleOutOfRange { id, role, roles });
        }

        let pattern = Pattern {
            triggers: def.triggers.clone(),
            vocabulary: def.vocabulary.clone(),
            left: def.left,
            right: def.right,
            starts: def.starts.clone(),
            flags: PatternFlags {
                exclude_trigger: def.exclude_trigger,
                last_match: def.last_match,
                ignore_repeated_triggers: def.ignore_repeated_triggers,
                ignore_repeated_commands: def.ignore_repeated_commands,
                ordered: def.ordered,
                stop_at_first_unmatched: def.stop_at_first_unmatched,
                exclude_trigger_words: def.exclude_trigger_words,
                continue_with_role: def.continue_with_role,
            },
        };

        Ok(Self {
            id,
            name: def.name.clone(),
            referents: def.referents.clone(),
            pattern,
            continue_if: Gate::from_defs(id, roles, &def.continue_if)?,
            skip_if: Gate::from_defs(id, roles, &def.skip_if)?,
            returns: ConditionTree::from_defs(id, roles, &def.returns)?,
        })
    }
}
