//! Condition types: gates and the return-condition tree.

use crate::config::{AlternativeDef, SubConditionDef};
use crate::error::CatalogError;
use crate::eval::Code;

/// What a sub-condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The first token of a matched role.
    Role(usize),
    /// The token that triggered evaluation.
    Trigger,
}

/// What a sub-condition accepts for its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// Target equals any of these words.
    AnyOf(Vec<String>),
    /// Target holds any token at all.
    Present,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCondition {
    pub target: Target,
    pub accept: Acceptance,
}

/// A conjunction of sub-conditions guarding a result code.
/// An empty `when` makes the alternative unconditional.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pub when: Vec<SubCondition>,
    pub code: Code,
}

/// Ordered alternatives, first match wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionTree {
    pub alternatives: Vec<Alternative>,
}

/// A pre-filter: a disjunction of conjunctions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gate {
    pub alternatives: Vec<Vec<SubCondition>>,
}

impl SubCondition {
    /// Validate a TOML sub-condition against a command with `roles` roles.
    pub(crate) fn from_def(
        id: u32,
        roles: usize,
        def: &SubConditionDef,
    ) -> Result<Self, CatalogError> {
        let target = match (def.role, def.trigger) {
            (Some(role), false) if role < roles => Target::Role(role),
            (Some(role), false) => return Err(CatalogError::RoleOutOfRange { id, role, roles }),
            (None, true) => Target::Trigger,
            _ => return Err(CatalogError::AmbiguousTarget { id }),
        };
        let accept = if def.present {
            Acceptance::Present
        } else if !def.any_of.is_empty() {
            Acceptance::AnyOf(def.any_of.clone())
        } else {
            return Err(CatalogError::EmptyAcceptance { id });
        };
        Ok(Self { target, accept })
    }
}

fn conjunction(
    id: u32,
    roles: usize,
    defs: &[SubConditionDef],
) -> Result<Vec<SubCondition>, CatalogError> {
    defs.iter()
        .map(|d| SubCondition::from_def(id, roles, d))
        .collect()
}

impl Gate {
    pub(crate) fn from_defs(
        id: u32,
        roles: usize,
        defs: &[Vec<SubConditionDef>],
    ) -> Result<Self, CatalogError> {
        let alternatives = defs
            .iter()
            .map(|alt| conjunction(id, roles, alt))
            .collect::<Result<_, _>>()?;
        Ok(Self { alternatives })
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl ConditionTree {
    pub(crate) fn from_defs(
        id: u32,
        roles: usize,
        defs: &[AlternativeDef],
    ) -> Result<Self, CatalogError> {
        let mut alternatives = Vec::with_capacity(defs.len());
        for def in defs {
            let code = Code::new(def.code);
            if !code.is_command() {
                return Err(CatalogError::NonPositiveCode { id, code: def.code });
            }
            alternatives.push(Alternative {
                when: conjunction(id, roles, &def.when)?,
                code,
            });
        }
        Ok(Self { alternatives })
    }
}
