//! Gauss quadrature points and weights
//!
//! Pre-computed points and weights on the interval, the reference triangle
//! and the reference square.

/// A single quadrature point with weight
#[derive(Debug, Clone, Copy)]
pub struct QuadraturePoint {
    /// Reference coordinates (xi, eta)
    pub coords: [f64; 2],
    /// Integration weight
    pub weight: f64,
}

impl QuadraturePoint {
    pub fn new_1d(xi: f64, weight: f64) -> Self {
        Self {
            coords: [xi, 0.0],
            weight,
        }
    }

    pub fn new_2d(xi: f64, eta: f64, weight: f64) -> Self {
        Self {
            coords: [xi, eta],
            weight,
        }
    }

    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }
}

/// 1D Gauss-Legendre quadrature on [-1, 1]
pub fn gauss_legendre_1d(order: usize) -> Vec<QuadraturePoint> {
    match order {
        1 => vec![QuadraturePoint::new_1d(0.0, 2.0)],
        2 => {
            let x = 1.0 / 3.0_f64.sqrt();
            vec![
                QuadraturePoint::new_1d(-x, 1.0),
                QuadraturePoint::new_1d(x, 1.0),
            ]
        }
        3 => {
            let x = (3.0 / 5.0_f64).sqrt();
            vec![
                QuadraturePoint::new_1d(-x, 5.0 / 9.0),
                QuadraturePoint::new_1d(0.0, 8.0 / 9.0),
                QuadraturePoint::new_1d(x, 5.0 / 9.0),
            ]
        }
        4 => {
            let a = (3.0 / 7.0 - 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let b = (3.0 / 7.0 + 2.0 / 7.0 * (6.0 / 5.0_f64).sqrt()).sqrt();
            let wa = (18.0 + 30.0_f64.sqrt()) / 36.0;
            let wb = (18.0 - 30.0_f64.sqrt()) / 36.0;
            vec![
                QuadraturePoint::new_1d(-b, wb),
                QuadraturePoint::new_1d(-a, wa),
                QuadraturePoint::new_1d(a, wa),
                QuadraturePoint::new_1d(b, wb),
            ]
        }
        5 => {
            let a = (5.0 - 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let b = (5.0 + 2.0 * (10.0 / 7.0_f64).sqrt()).sqrt() / 3.0;
            let wa = (322.0 + 13.0 * 70.0_f64.sqrt()) / 900.0;
            let wb = (322.0 - 13.0 * 70.0_f64.sqrt()) / 900.0;
            vec![
                QuadraturePoint::new_1d(-b, wb),
                QuadraturePoint::new_1d(-a, wa),
                QuadraturePoint::new_1d(0.0, 128.0 / 225.0),
                QuadraturePoint::new_1d(a, wa),
                QuadraturePoint::new_1d(b, wb),
            ]
        }
        _ => {
            // For higher orders, use order 5
            gauss_legendre_1d(5)
        }
    }
}

/// Symmetric quadrature on triangles, exact for polynomials of `degree`
/// (capped at 6)
/// Reference triangle: (0,0), (1,0), (0,1)
pub fn gauss_triangle(degree: usize) -> Vec<QuadraturePoint> {
    match degree {
        0 | 1 => {
            // 1-point rule (degree 1)
            vec![QuadraturePoint::new_2d(1.0 / 3.0, 1.0 / 3.0, 0.5)]
        }
        2 => {
            // 3-point rule (degree 2)
            let a = 1.0 / 6.0;
            let b = 2.0 / 3.0;
            let w = 1.0 / 6.0;
            vec![
                QuadraturePoint::new_2d(a, a, w),
                QuadraturePoint::new_2d(b, a, w),
                QuadraturePoint::new_2d(a, b, w),
            ]
        }
        3..=5 => {
            // 7-point rule (degree 5)
            let a1 = 1.0 / 3.0;
            let w1 = 9.0 / 80.0;

            let a2 = (6.0 - 15.0_f64.sqrt()) / 21.0;
            let b2 = (9.0 + 2.0 * 15.0_f64.sqrt()) / 21.0;
            let w2 = (155.0 - 15.0_f64.sqrt()) / 2400.0;

            let a3 = (6.0 + 15.0_f64.sqrt()) / 21.0;
            let b3 = (9.0 - 2.0 * 15.0_f64.sqrt()) / 21.0;
            let w3 = (155.0 + 15.0_f64.sqrt()) / 2400.0;

            vec![
                QuadraturePoint::new_2d(a1, a1, w1),
                QuadraturePoint::new_2d(a2, a2, w2),
                QuadraturePoint::new_2d(b2, a2, w2),
                QuadraturePoint::new_2d(a2, b2, w2),
                QuadraturePoint::new_2d(a3, a3, w3),
                QuadraturePoint::new_2d(b3, a3, w3),
                QuadraturePoint::new_2d(a3, b3, w3),
            ]
        }
        _ => {
            // 12-point rule (degree 6)
            let a1 = 0.063089014491502;
            let b1 = 0.873821971016996;
            let w1 = 0.025422453185103;

            let a2 = 0.249286745170910;
            let b2 = 0.501426509658179;
            let w2 = 0.058393137863189;

            let a3 = 0.310352451033785;
            let b3 = 0.053145049844816;
            let c3 = 0.636502499121399;
            let w3 = 0.041425537809187;

            vec![
                QuadraturePoint::new_2d(a1, a1, w1),
                QuadraturePoint::new_2d(b1, a1, w1),
                QuadraturePoint::new_2d(a1, b1, w1),
                QuadraturePoint::new_2d(a2, a2, w2),
                QuadraturePoint::new_2d(b2, a2, w2),
                QuadraturePoint::new_2d(a2, b2, w2),
                QuadraturePoint::new_2d(a3, b3, w3),
                QuadraturePoint::new_2d(b3, a3, w3),
                QuadraturePoint::new_2d(a3, c3, w3),
                QuadraturePoint::new_2d(c3, a3, w3),
                QuadraturePoint::new_2d(b3, c3, w3),
                QuadraturePoint::new_2d(c3, b3, w3),
            ]
        }
    }
}

/// Tensor-product Gauss rule with `order` points per direction
/// Reference quad: [-1,1] x [-1,1]
pub fn gauss_quadrilateral(order: usize) -> Vec<QuadraturePoint> {
    let pts_1d = gauss_legendre_1d(order);
    let mut result = Vec::with_capacity(pts_1d.len() * pts_1d.len());

    for pi in &pts_1d {
        for pj in &pts_1d {
            result.push(QuadraturePoint::new_2d(
                pi.xi(),
                pj.xi(),
                pi.weight * pj.weight,
            ));
        }
    }

    result
}
