//! Graph algorithms for the topic hierarchy.
//!
//! Pure traversal and cycle-check utilities over topic edge lists. Keeping
//! them free of storage concerns lets the services run them on whatever edge
//! snapshot they loaded.

use crate::models::TopicEdge;
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// One node reached by a descendant/ancestor traversal: the node id, its
/// depth relative to the start node, and the materialized path from the
/// start node (inclusive at both ends).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalRow {
    pub id: Uuid,
    pub level: u32,
    pub path: Vec<Uuid>,
}

fn child_map(edges: &[TopicEdge]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for edge in edges {
        map.entry(edge.parent_id).or_default().push(edge.child_id);
    }
    map
}

fn parent_map(edges: &[TopicEdge]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for edge in edges {
        map.entry(edge.child_id).or_default().push(edge.parent_id);
    }
    map
}

/// Breadth-first walk from `start` over the given adjacency, tracking a
/// visited set so the walk terminates even if the edge set accidentally
/// contains a cycle. A node reachable along several paths is reported once,
/// with the first (shortest) path found.
fn traverse(adjacency: &HashMap<Uuid, Vec<Uuid>>, start: Uuid) -> Vec<TraversalRow> {
    let mut visited: HashSet<Uuid> = HashSet::new();
    visited.insert(start);

    let mut queue: VecDeque<TraversalRow> = VecDeque::new();
    queue.push_back(TraversalRow {
        id: start,
        level: 0,
        path: vec![start],
    });

    let mut rows = Vec::new();
    while let Some(row) = queue.pop_front() {
        if let Some(nexts) = adjacency.get(&row.id) {
            for &next in nexts {
                if visited.insert(next) {
                    let mut path = row.path.clone();
                    path.push(next);
                    queue.push_back(TraversalRow {
                        id: next,
                        level: row.level + 1,
                        path,
                    });
                }
            }
        }
        rows.push(row);
    }

    // Drop the start node itself; callers want strict descendants/ancestors.
    rows.retain(|row| row.id != start);
    rows
}

/// Every node reachable from `node` via child edges, with level and path.
pub fn descendants(edges: &[TopicEdge], node: Uuid) -> Vec<TraversalRow> {
    traverse(&child_map(edges), node)
}

/// Descendant traversal projected to deduplicated ids.
pub fn descendant_ids(edges: &[TopicEdge], node: Uuid) -> Vec<Uuid> {
    descendants(edges, node).into_iter().map(|row| row.id).collect()
}

/// Every node reachable from `node` via parent edges, with level and path.
pub fn ancestors(edges: &[TopicEdge], node: Uuid) -> Vec<TraversalRow> {
    traverse(&parent_map(edges), node)
}

/// True iff `node` is reachable from `ancestor` via child edges.
pub fn is_ancestor_of(edges: &[TopicEdge], ancestor: Uuid, node: Uuid) -> bool {
    if ancestor == node {
        return false;
    }
    descendants(edges, ancestor).iter().any(|row| row.id == node)
}

pub fn has_parent(edges: &[TopicEdge], node: Uuid) -> bool {
    edges.iter().any(|edge| edge.child_id == node)
}

pub fn has_children(edges: &[TopicEdge], node: Uuid) -> bool {
    edges.iter().any(|edge| edge.parent_id == node)
}

/// Detect cycles in a topic edge set.
/// Uses petgraph for cycle detection.
pub fn detect_cycles(edges: &[TopicEdge]) -> bool {
    use petgraph::Graph;
    use petgraph::algo::is_cyclic_directed;

    let mut graph = Graph::<Uuid, ()>::new();
    let mut node_map = HashMap::new();

    for edge in edges {
        node_map
            .entry(edge.parent_id)
            .or_insert_with(|| graph.add_node(edge.parent_id));
        node_map
            .entry(edge.child_id)
            .or_insert_with(|| graph.add_node(edge.child_id));
    }

    for edge in edges {
        if let (Some(&parent), Some(&child)) =
            (node_map.get(&edge.parent_id), node_map.get(&edge.child_id))
        {
            graph.add_edge(parent, child, ());
        }
    }

    is_cyclic_directed(&graph)
}

/// Check if adding a parent → child edge would close a cycle.
pub fn would_create_cycle(edges: &[TopicEdge], parent: Uuid, child: Uuid) -> bool {
    let mut test_edges = edges.to_vec();
    test_edges.push(TopicEdge::new(parent, child, String::new()));
    detect_cycles(&test_edges)
}
