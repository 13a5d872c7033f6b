//! Condition evaluation over one oracle result.

use crate::catalog::{Acceptance, CommandSpec, ConditionTree, Gate, SubCondition, Target};
use crate::eval::Code;
use crate::oracle::MatchResult;

/// Check one sub-condition. An empty role never holds.
pub fn sub_condition_holds(cond: &SubCondition, result: &MatchResult, trigger: &str) -> bool {
    let value = match cond.target {
        Target::Trigger => Some(trigger),
        Target::Role(role) => result.first(role),
    };
    match (&cond.accept, value) {
        (_, None) => false,
        (Acceptance::Present, Some(_)) => true,
        (Acceptance::AnyOf(words), Some(v)) => words.iter().any(|w| w == v),
    }
}

fn all_hold(conds: &[SubCondition], result: &MatchResult, trigger: &str) -> bool {
    conds.iter().all(|c| sub_condition_holds(c, result, trigger))
}

/// True when any alternative of the gate holds in full.
fn gate_holds(gate: &Gate, result: &MatchResult, trigger: &str) -> bool {
    gate.alternatives
        .iter()
        .any(|alt| all_hold(alt, result, trigger))
}

/// Pre-filter: `continue_if` (empty means pass) holds and `skip_if` does not.
pub fn gates_pass(spec: &CommandSpec, result: &MatchResult, trigger: &str) -> bool {
    let proceed = spec.continue_if.is_empty() || gate_holds(&spec.continue_if, result, trigger);
    proceed && !gate_holds(&spec.skip_if, result, trigger)
}

/// Walk the tree in order and return the first alternative whose
/// sub-conditions all hold.
pub fn evaluate(result: &MatchResult, trigger: &str, tree: &ConditionTree) -> Option<Code> {
    tree.alternatives
        .iter()
        .find(|alt| all_hold(&alt.when, result, trigger))
        .map(|alt| alt.code)
}
