//! Quadrature rule selection based on element type
//!
//! Rules are requested by the number of Gauss points per direction, so
//! `order = n` integrates polynomials of degree `2n - 1` exactly on
//! quadrilaterals. Triangles get a symmetric rule of matching exactness.

use super::gauss::{QuadraturePoint, gauss_quadrilateral, gauss_triangle};
use crate::mesh::ElementType;

/// Quadrature rule for a specific element type
#[derive(Debug, Clone)]
pub struct QuadratureRule {
    /// Element type this rule is for
    pub element_type: ElementType,
    /// Gauss points per direction
    pub order: usize,
    /// Quadrature points and weights
    pub points: Vec<QuadraturePoint>,
}

impl QuadratureRule {
    /// Create a quadrature rule for the given element type and order
    pub fn new(element_type: ElementType, order: usize) -> Self {
        let points = match element_type {
            ElementType::Triangle => gauss_triangle(2 * order.max(1) - 1),
            ElementType::Quadrilateral => gauss_quadrilateral(order.max(1)),
        };

        Self {
            element_type,
            order,
            points,
        }
    }

    /// Number of quadrature points
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Iterator over quadrature points
    pub fn iter(&self) -> impl Iterator<Item = &QuadraturePoint> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrature_rule_creation() {
        let rule = QuadratureRule::new(ElementType::Quadrilateral, 3);
        assert_eq!(rule.element_type, ElementType::Quadrilateral);
        assert_eq!(rule.order, 3);
        assert_eq!(rule.num_points(), 9);
    }

    #[test]
    fn test_triangle_rule_matches_exactness() {
        assert_eq!(QuadratureRule::new(ElementType::Triangle, 1).num_points(), 1);
        assert_eq!(QuadratureRule::new(ElementType::Triangle, 2).num_points(), 7);
    }
}
