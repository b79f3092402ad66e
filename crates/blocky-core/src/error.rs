//! Core error types for blocky-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Every variant is
//! a precondition failure detected before any slot write, so an `Err` always
//! leaves the graph exactly as it was.

use thiserror::Error;

use crate::id::BlockId;
use crate::kind::{BlockKind, Port};

/// Errors produced by the blocky engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockyError {
    /// A block kind name did not match any known kind.
    #[error("invalid block kind: '{name}'")]
    InvalidKind { name: String },

    /// The compatibility table forbids linking these kinds on this port.
    #[error(
        "cannot link {kind} block {block} to {target_kind} block {target} on port '{port}'"
    )]
    IncompatibleLink {
        block: BlockId,
        kind: BlockKind,
        port: Port,
        target: BlockId,
        target_kind: BlockKind,
    },

    /// A configuration value was rejected.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// A port name outside `last`, `next`, `parent`, `child`.
    #[error("unsupported port: '{name}'")]
    UnsupportedPort { name: String },

    /// A block id does not refer to a live block.
    #[error("block not found: BlockId({id})", id = id.0)]
    BlockNotFound { id: BlockId },

    /// A caller-supplied id is already taken.
    #[error("duplicate block id: BlockId({id})", id = id.0)]
    DuplicateBlockId { id: BlockId },

    /// No id above the highest one handed out is free.
    #[error("block ids exhausted")]
    IdsExhausted,

    /// Linking would make a block its own ancestor.
    #[error("linking {block} to {target} would create a cycle")]
    LinkCycle { block: BlockId, target: BlockId },

    /// Content referenced a block that cannot be embedded.
    #[error("invalid content: {reason}")]
    InvalidContent { reason: String },

    /// A graph invariant does not hold.
    #[error("graph inconsistency: {reason}")]
    GraphInconsistency { reason: String },
}
