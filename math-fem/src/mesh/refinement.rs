//! Uniform mesh refinement
//!
//! Red refinement: every triangle and every quadrilateral is split into four
//! children through its edge midpoints. Midpoints are shared between
//! neighbouring cells so the refined mesh stays conforming.

use super::types::{Element, ElementType, Mesh, Point};
use std::collections::HashMap;

/// Edge represented by sorted node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }
}

/// Hands out one node per edge midpoint
#[derive(Default)]
struct MidpointManager {
    edge_midpoints: HashMap<Edge, usize>,
}

impl MidpointManager {
    fn get_midpoint(&mut self, mesh: &mut Mesh, a: usize, b: usize) -> usize {
        let edge = Edge::new(a, b);
        if let Some(&mid_idx) = self.edge_midpoints.get(&edge) {
            mid_idx
        } else {
            let mid = mesh.nodes[a].midpoint(&mesh.nodes[b]);
            let idx = mesh.add_node(mid);
            self.edge_midpoints.insert(edge, idx);
            idx
        }
    }
}

/// Refine every element once and rebuild the boundary
///
/// Parents are replaced by their children. Returns the number of nodes added.
pub fn uniform_refine(mesh: &mut Mesh) -> usize {
    let nodes_before = mesh.num_nodes();
    let parents = std::mem::take(&mut mesh.elements);
    let mut children = Vec::with_capacity(4 * parents.len());
    let mut midpoints = MidpointManager::default();

    for elem in &parents {
        let v = &elem.nodes;
        let child_nodes = match elem.element_type {
            ElementType::Triangle => {
                let m01 = midpoints.get_midpoint(mesh, v[0], v[1]);
                let m12 = midpoints.get_midpoint(mesh, v[1], v[2]);
                let m20 = midpoints.get_midpoint(mesh, v[2], v[0]);

                vec![
                    vec![v[0], m01, m20],
                    vec![m01, v[1], m12],
                    vec![m20, m12, v[2]],
                    vec![m01, m12, m20],
                ]
            }
            ElementType::Quadrilateral => {
                let m01 = midpoints.get_midpoint(mesh, v[0], v[1]);
                let m12 = midpoints.get_midpoint(mesh, v[1], v[2]);
                let m23 = midpoints.get_midpoint(mesh, v[2], v[3]);
                let m30 = midpoints.get_midpoint(mesh, v[3], v[0]);

                let (sx, sy) = v.iter().fold((0.0, 0.0), |(sx, sy), &n| {
                    (sx + mesh.nodes[n].x, sy + mesh.nodes[n].y)
                });
                let center = mesh.add_node(Point::new(sx / 4.0, sy / 4.0));

                vec![
                    vec![v[0], m01, center, m30],
                    vec![m01, v[1], m12, center],
                    vec![center, m12, v[2], m23],
                    vec![m30, center, m23, v[3]],
                ]
            }
        };

        for nodes in child_nodes {
            let mut child = Element::new(elem.element_type, nodes, mesh.next_element_id);
            mesh.next_element_id += 1;
            child.level = elem.level + 1;
            children.push(child);
        }
    }

    mesh.elements = children;
    mesh.detect_boundaries();
    mesh.num_nodes() - nodes_before
}

/// Apply `levels` rounds of uniform refinement
pub fn refine_global(mesh: &mut Mesh, levels: usize) {
    for level in 0..levels {
        let added = uniform_refine(mesh);
        log::debug!(
            "Refinement {}: {} cells, {} nodes (+{})",
            level + 1,
            mesh.num_elements(),
            mesh.num_nodes(),
            added
        );
    }
}
