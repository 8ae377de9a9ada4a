//! Draw command recording
//!
//! Geometry draw entry points record commands instead of touching a GPU;
//! the backend that owns submission drains them from the dispatch context
//! at the end of the frame.

use crate::foundation::math::Mat4;
use crate::scene::{NodeKey, RenderStyle};

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Node that was being dispatched when this command was recorded
    pub node: Option<NodeKey>,

    /// World transform to draw with
    pub world: Mat4,

    /// Render style the node requested
    pub style: RenderStyle,

    /// Number of indices to draw (triangle list or line list per `style`)
    pub index_count: u32,
}
