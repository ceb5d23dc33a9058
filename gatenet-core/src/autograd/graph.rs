use crate::node::{Node, NodeId};
use crate::types::Scalar;

/// Builds the topological order of everything `sink` depends on.
///
/// Depth-first post-order over gate-input edges: inputs are expanded in
/// their declared order, each node is emitted once (deduplicated by id)
/// and only after all of its inputs, and `sink` comes last. An explicit
/// stack replaces recursion so long chains cannot overflow the call stack.
///
/// `sink` must be a valid index into `nodes`.
pub(crate) fn build_topo<T: Scalar>(nodes: &[Node<T>], sink: NodeId) -> Vec<NodeId> {
    let mut visited = vec![false; nodes.len()];
    let mut sorted_list = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(sink, 0)];
    visited[sink.0] = true;

    while let Some(frame) = stack.last_mut() {
        let (node_id, next_input) = *frame;
        let inputs = nodes[node_id.0].inputs();
        if next_input < inputs.len() {
            frame.1 += 1;
            let input_id = inputs[next_input];
            if !visited[input_id.0] {
                visited[input_id.0] = true;
                stack.push((input_id, 0));
            }
        } else {
            stack.pop();
            sorted_list.push(node_id);
        }
    }
    log::trace!(
        "[build_topo] sink {} depends on {} node(s)",
        sink,
        sorted_list.len()
    );
    sorted_list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::GateKind;

    fn leaf(kind: crate::node::NodeKind) -> Node<f64> {
        Node::leaf(kind, 0.0)
    }

    #[test]
    fn test_build_topo_single_leaf() {
        let nodes = vec![leaf(crate::node::NodeKind::Parameter)];
        assert_eq!(build_topo(&nodes, NodeId(0)), vec![NodeId(0)]);
    }

    #[test]
    fn test_build_topo_diamond_is_post_order_and_deduplicated() {
        // 0, 1 leaves; 2 = Add(0, 1); 3 = Mul(0, 2); 4 = Add(2, 3)
        let nodes = vec![
            leaf(crate::node::NodeKind::Parameter),
            leaf(crate::node::NodeKind::Placeholder),
            Node::gate(GateKind::Add, vec![NodeId(0), NodeId(1)]),
            Node::gate(GateKind::Mul, vec![NodeId(0), NodeId(2)]),
            Node::gate(GateKind::Add, vec![NodeId(2), NodeId(3)]),
        ];
        let order = build_topo(&nodes, NodeId(4));
        assert_eq!(
            order,
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
    }

    #[test]
    fn test_build_topo_skips_unrelated_nodes() {
        let nodes = vec![
            leaf(crate::node::NodeKind::Parameter),
            leaf(crate::node::NodeKind::Parameter),
            Node::gate(GateKind::Relu, vec![NodeId(1)]),
        ];
        assert_eq!(build_topo(&nodes, NodeId(2)), vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_build_topo_deep_chain() {
        let mut nodes = vec![leaf(crate::node::NodeKind::Parameter)];
        for i in 0..100_000 {
            nodes.push(Node::gate(GateKind::Relu, vec![NodeId(i)]));
        }
        let order = build_topo(&nodes, NodeId(100_000));
        assert_eq!(order.len(), 100_001);
        assert_eq!(order[0], NodeId(0));
        assert_eq!(order[100_000], NodeId(100_000));
    }
}
