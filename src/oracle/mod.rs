//! Sub-verification: find the tokens around a trigger that fill a command's roles.
//!
//! The engine only relies on the shape of the result: one sub-slice per role,
//! in the command's role order. How the tokens are found is up to the
//! [`SubVerifier`] implementation; [`WindowVerifier`] is the default.

/// Default window-scanning verifier.
pub mod window;

pub use window::WindowVerifier;

use crate::catalog::Pattern;
use crate::error::DetectResult;

/// Matched tokens for one trigger occurrence, one sub-slice per role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    roles: Vec<Vec<String>>,
}

impl MatchResult {
    pub fn new(roles: Vec<Vec<String>>) -> Self {
        Self { roles }
    }

    /// A result with `roles` empty roles, used when the oracle found nothing.
    pub fn empty(roles: usize) -> Self {
        Self {
            roles: vec![Vec::new(); roles],
        }
    }

    pub fn role(&self, role: usize) -> &[String] {
        self.roles.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First token of a role, the value conditions compare against.
    pub fn first(&self, role: usize) -> Option<&str> {
        self.role(role).first().map(String::as_str)
    }

    pub fn roles(&self) -> &[Vec<String>] {
        &self.roles
    }

    pub fn is_empty(&self) -> bool {
        self.roles.iter().all(Vec::is_empty)
    }
}

/// Scans a sentence around a trigger occurrence.
pub trait SubVerifier: Send + Sync {
    /// Return the role sub-slices for the trigger at `position`, or `None`
    /// when no role matched.
    fn verify(
        &self,
        tokens: &[String],
        position: usize,
        pattern: &Pattern,
    ) -> DetectResult<Option<MatchResult>>;
}
