//! Per-frame dispatch context
//!
//! The context is an explicit value threaded through dispatch instead of a
//! process-wide "current node" global: collaborators invoked from a
//! geometry's draw entry point introspect the dispatching node through the
//! context they were handed, which keeps the design reentrant-safe by
//! construction.

use crate::render::DrawCommand;
use crate::scene::graph::NodeKey;

/// State scoped to one frame of dispatch calls
///
/// Created by the renderer, passed into every
/// [`SceneGraph::dispatch`](crate::scene::SceneGraph::dispatch) call, and
/// drained of draw commands once the traversal finishes.
#[derive(Debug, Default)]
pub struct DispatchContext {
    current: Option<NodeKey>,
    commands: Vec<DrawCommand>,
}

impl DispatchContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// The node currently being dispatched
    ///
    /// `Some` exactly for the duration of one node's dispatch call;
    /// `None` between dispatches and after a no-op exit.
    pub fn current_node(&self) -> Option<NodeKey> {
        self.current
    }

    /// Record a draw command for this frame
    pub fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Draw commands recorded so far this frame
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded draw commands, leaving the context empty
    pub fn drain_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Reset the context for a new frame
    pub fn clear(&mut self) {
        self.current = None;
        self.commands.clear();
    }

    pub(crate) fn begin_node(&mut self, key: NodeKey) {
        self.current = Some(key);
    }

    pub(crate) fn end_node(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::scene::node::RenderStyle;

    #[test]
    fn test_current_node_scoping() {
        let mut ctx = DispatchContext::new();
        assert!(ctx.current_node().is_none());

        let key = NodeKey::default();
        ctx.begin_node(key);
        assert_eq!(ctx.current_node(), Some(key));

        ctx.end_node();
        assert!(ctx.current_node().is_none());
    }

    #[test]
    fn test_drain_empties_commands() {
        let mut ctx = DispatchContext::new();
        ctx.submit(DrawCommand {
            node: None,
            world: Mat4::identity(),
            style: RenderStyle::Normal,
            index_count: 3,
        });

        assert_eq!(ctx.commands().len(), 1);
        let drained = ctx.drain_commands();
        assert_eq!(drained.len(), 1);
        assert!(ctx.commands().is_empty());
    }
}
