//! Error types surfaced by this crate's fallible operations.
//!
//! Absence (no intersection) and lookup miss (unknown id on a plain read) are
//! ordinary `Option` values, not errors. `RigError` covers only failures that
//! stop a mutating or composing operation from proceeding.

use crate::region::RegionId;

/// Errors produced by region, region-set and graph operations.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// Two operands that must share a dimension did not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A region was added to a bounded `RegionSet` it doesn't fit inside.
    #[error("region {0} is not enclosed by the region set's bounds")]
    OutOfBounds(RegionId),

    /// An id that must be fresh within a collection was already present.
    #[error("duplicate region id: {0}")]
    DuplicateId(RegionId),

    /// An id referenced by a mutating or composing operation has no node/member.
    #[error("unknown region id: {0}")]
    UnknownRegion(RegionId),

    /// A JSON payload was missing a required field or had the wrong shape.
    #[error("failed to parse {field}: {reason}")]
    Parse { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RigError>;
