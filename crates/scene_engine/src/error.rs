//! Scene error types
//!
//! Dispatch runs on a per-frame hot path, so every failure here is a
//! programmer error surfaced as an explicit result rather than a recovered
//! runtime state. There is no retry or fallback logic.

use thiserror::Error;

/// Errors raised by scene-graph operations
#[derive(Error, Debug)]
pub enum SceneError {
    /// A node key did not resolve to a live node in the graph
    #[error("node key does not resolve to a live node")]
    UnknownNode,

    /// A skinned geometry's palette length and the node's bone list disagree
    #[error("skinned geometry expects {palette} bones but the node is bound to {bones}")]
    BoneCountMismatch {
        /// Number of bone handles bound to the node
        bones: usize,
        /// Length of the geometry's matrix palette
        palette: usize,
    },

    /// A bone handle points at a node that no longer exists
    ///
    /// Typically the result of cloning a skinned node without re-resolving
    /// its bones against the cloned skeleton.
    #[error("bone handle points at a node that no longer exists")]
    StaleBoneHandle,

    /// A joint name could not be resolved against the scene
    #[error("no node named '{0}' exists in the scene")]
    UnknownBone(String),

    /// Wireframe rendering was requested before wireframe data was generated
    #[error("wireframe rendering requested but no wireframe indices were generated")]
    WireframeUnavailable,
}
