//! Error taxonomy for catalog construction and detection.

use thiserror::Error;

/// A catalog that cannot be used for detection.
///
/// Raised while building a [`CommandCatalog`](crate::catalog::CommandCatalog),
/// never during a detection call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("command id {0} is reserved (ids must be positive)")]
    ReservedId(i64),

    #[error("command id {0} is defined more than once")]
    DuplicateId(u32),

    #[error("command {id}: return code {code} is not positive")]
    NonPositiveCode { id: u32, code: f32 },

    #[error("command {id}: role {role} is out of range ({roles} role(s) in vocabulary)")]
    RoleOutOfRange { id: u32, role: usize, roles: usize },

    #[error("command {id}: {starts} start offset(s) for {roles} role(s)")]
    TooManyStarts { id: u32, starts: usize, roles: usize },

    #[error("command {id}: sub-condition must name exactly one of `role` or `trigger`")]
    AmbiguousTarget { id: u32 },

    #[error("command {id}: sub-condition needs `any_of` words or `present = true`")]
    EmptyAcceptance { id: u32 },
}

/// A failed detection call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// The caller asked for a reserved or unknown command id.
    #[error("requirements not met - faulty catalog usage: {reason} (id {id})")]
    FaultyCatalogUsage { id: i64, reason: &'static str },

    /// The catalog itself is malformed.
    #[error("requirements not met - bad catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// A collaborator (normalizer, oracle) failed.
    #[error("{0}")]
    Collaborator(String),
}

pub type DetectResult<T> = std::result::Result<T, DetectError>;
