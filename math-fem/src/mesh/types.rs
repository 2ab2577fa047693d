//! Mesh types for 2D finite element analysis
//!
//! Supports triangular and quadrilateral elements with boundary edges tagged
//! by an integer boundary id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Boundary indicator attached to boundary edges
pub type BoundaryId = u32;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: 0.5 * (self.x + other.x),
            y: 0.5 * (self.y + other.y),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point::new(p.0, p.1)
    }
}

/// Element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Linear triangle (P1)
    Triangle,
    /// Bilinear quadrilateral (Q1), vertices counter-clockwise
    Quadrilateral,
}

impl ElementType {
    /// Number of vertices (and degrees of freedom) for this element type
    pub fn num_vertices(&self) -> usize {
        match self {
            ElementType::Triangle => 3,
            ElementType::Quadrilateral => 4,
        }
    }
}

/// A finite element with node indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// Element type
    pub element_type: ElementType,
    /// Vertex indices, counter-clockwise
    pub nodes: Vec<usize>,
    /// Element ID
    pub id: usize,
    /// Refinement level
    pub level: usize,
}

impl Element {
    /// Create a new element
    pub fn new(element_type: ElementType, nodes: Vec<usize>, id: usize) -> Self {
        Self {
            element_type,
            nodes,
            id,
            level: 0,
        }
    }

    /// Edges as pairs of node indices, in local order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.nodes.len();
        (0..n)
            .map(|i| (self.nodes[i], self.nodes[(i + 1) % n]))
            .collect()
    }
}

/// A boundary edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryFace {
    /// End nodes of the edge, sorted
    pub nodes: [usize; 2],
    /// Boundary indicator
    pub marker: BoundaryId,
    /// Owning element index
    pub element_idx: usize,
    /// Local edge index within the element
    pub local_idx: usize,
}

/// A 2D finite element mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Node coordinates
    pub nodes: Vec<Point>,
    /// Active elements
    pub elements: Vec<Element>,
    /// Boundary edges
    pub boundaries: Vec<BoundaryFace>,
    /// Next element ID for refinement
    pub(crate) next_element_id: usize,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index
    pub fn add_node(&mut self, point: Point) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Add an element and return its index
    pub fn add_element(&mut self, element_type: ElementType, nodes: Vec<usize>) -> usize {
        assert_eq!(
            nodes.len(),
            element_type.num_vertices(),
            "Wrong vertex count for {:?}",
            element_type
        );
        let idx = self.elements.len();
        let id = self.next_element_id;
        self.next_element_id += 1;
        self.elements.push(Element::new(element_type, nodes, id));
        idx
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get node coordinates
    pub fn node(&self, idx: usize) -> &Point {
        &self.nodes[idx]
    }

    /// Get element
    pub fn element(&self, idx: usize) -> &Element {
        &self.elements[idx]
    }

    /// Vertex coordinates of an element
    pub fn element_coords(&self, elem: &Element) -> Vec<[f64; 2]> {
        elem.nodes
            .iter()
            .map(|&n| [self.nodes[n].x, self.nodes[n].y])
            .collect()
    }

    /// Find boundary edges automatically and tag them all with id 0
    ///
    /// An edge owned by exactly one element is a boundary edge. Edges are
    /// stored in element order so the result is deterministic.
    pub fn detect_boundaries(&mut self) {
        self.boundaries.clear();

        let mut edge_count: HashMap<[usize; 2], usize> = HashMap::new();
        for elem in &self.elements {
            for (a, b) in elem.edges() {
                *edge_count.entry(sorted_edge(a, b)).or_insert(0) += 1;
            }
        }

        for (elem_idx, elem) in self.elements.iter().enumerate() {
            for (local_idx, (a, b)) in elem.edges().into_iter().enumerate() {
                let key = sorted_edge(a, b);
                if edge_count.get(&key) == Some(&1) {
                    self.boundaries.push(BoundaryFace {
                        nodes: key,
                        marker: 0,
                        element_idx: elem_idx,
                        local_idx,
                    });
                }
            }
        }
    }

    /// Retag boundary edges whose end points satisfy `predicate`
    pub fn set_boundary_marker<F>(&mut self, marker: BoundaryId, predicate: F)
    where
        F: Fn(&[Point]) -> bool,
    {
        for face in &mut self.boundaries {
            let points = [self.nodes[face.nodes[0]], self.nodes[face.nodes[1]]];
            if predicate(&points) {
                face.marker = marker;
            }
        }
    }

    /// All nodes lying on boundary edges with the given marker, ascending
    pub fn boundary_nodes(&self, marker: BoundaryId) -> BTreeSet<usize> {
        self.boundaries
            .iter()
            .filter(|f| f.marker == marker)
            .flat_map(|f| f.nodes)
            .collect()
    }

    /// Smallest element diameter (shortest edge length)
    pub fn min_edge_length(&self) -> f64 {
        self.elements
            .iter()
            .flat_map(|e| e.edges())
            .map(|(a, b)| self.nodes[a].distance(&self.nodes[b]))
            .fold(f64::INFINITY, f64::min)
    }
}

fn sorted_edge(a: usize, b: usize) -> [usize; 2] {
    if a < b { [a, b] } else { [b, a] }
}
