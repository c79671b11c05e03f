//! Control-flow graph nodes.
//!
//! Every function-like body, class property initializer and the file's
//! top-level statements get their own `Start` node. All graphs of a file share
//! one arena. Edges point backwards: each node lists the nodes control can
//! come from, which is the direction the checker walks when narrowing.

use smallvec::SmallVec;
use tyck_ast::types::NodeId;

/// Index of a node in a file's [`FlowGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FlowId(pub u32);

impl FlowId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FlowKind {
    /// Entry of a container. `node` is the function, or `None` for the file.
    Start,
    Unreachable,
    BranchLabel,
    /// Loop header. The first antecedent is the loop entry, the others are
    /// back edges.
    LoopLabel,
    /// `node` is a variable declaration or the target of an assignment,
    /// `++`/`--`, or a `for..in`/`for..of` head expression.
    Assignment,
    /// `node` is the condition expression.
    TrueCondition,
    FalseCondition,
    /// Clauses `[clause_start, clause_end)` of the switch in `node` matched.
    /// An empty range at 0 is the implicit default of a switch without one.
    SwitchClause { clause_start: u32, clause_end: u32 },
    /// A call in statement position.
    Call,
}

#[derive(Debug, Clone)]
pub struct FlowNode {
    pub kind: FlowKind,
    pub antecedents: SmallVec<[FlowId; 2]>,
    pub node: Option<NodeId>,
}

/// Flow nodes of one file.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    nodes: Vec<FlowNode>,
}

impl FlowGraph {
    /// The shared unreachable node.
    pub const UNREACHABLE: FlowId = FlowId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![FlowNode {
                kind: FlowKind::Unreachable,
                antecedents: SmallVec::new(),
                node: None,
            }],
        }
    }

    pub fn add(&mut self, kind: FlowKind, antecedents: SmallVec<[FlowId; 2]>, node: Option<NodeId>) -> FlowId {
        let id = FlowId(self.nodes.len() as u32);
        self.nodes.push(FlowNode { kind, antecedents, node });
        id
    }

    #[inline]
    pub fn node(&self, id: FlowId) -> &FlowNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: FlowId) -> &mut FlowNode {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: FlowId) -> FlowKind {
        self.nodes[id.index()].kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether some path from a `Start` node reaches `id`.
    pub fn is_reachable(&self, id: FlowId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if std::mem::replace(&mut visited[current.index()], true) {
                continue;
            }
            let node = self.node(current);
            match node.kind {
                FlowKind::Start => return true,
                FlowKind::Unreachable => {}
                _ => stack.extend(node.antecedents.iter().copied()),
            }
        }
        false
    }
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_reachability_through_labels() {
        let mut graph = FlowGraph::new();
        let start = graph.add(FlowKind::Start, SmallVec::new(), None);
        let label = graph.add(FlowKind::BranchLabel, smallvec![FlowGraph::UNREACHABLE, start], None);
        let dead = graph.add(FlowKind::BranchLabel, smallvec![FlowGraph::UNREACHABLE], None);
        assert!(graph.is_reachable(label));
        assert!(!graph.is_reachable(dead));
        assert!(!graph.is_reachable(FlowGraph::UNREACHABLE));
    }

    #[test]
    fn test_loop_cycle_terminates() {
        let mut graph = FlowGraph::new();
        let loop_label = graph.add(FlowKind::LoopLabel, SmallVec::new(), None);
        let body = graph.add(FlowKind::Assignment, smallvec![loop_label], Some(NodeId(3)));
        graph.node_mut(loop_label).antecedents.push(body);
        assert!(!graph.is_reachable(body));
    }
}
