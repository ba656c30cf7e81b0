//! Triangular membership functions
//!
//! Degree rises linearly from 0 at `a` to 1 at `b` and falls back to 0 at
//! `c`. Degenerate shapes (`a == b` or `b == c`) are ramps; the peak `b`
//! always has degree 1.

use serde::Serialize;

/// A triangular membership function `(a, b, c)` with `a <= b <= c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triangular {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangular {
    /// Returns `None` unless the points are finite and non-decreasing.
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();
        if finite && a <= b && b <= c {
            Some(Self { a, b, c })
        } else {
            None
        }
    }

    pub fn points(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// The point with degree 1
    pub fn peak(&self) -> f64 {
        self.b
    }

    /// Membership degree of `x`, always in [0, 1]
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() || x < self.a || x > self.c {
            return 0.0;
        }
        if x == self.b {
            return 1.0;
        }

        let degree = if x < self.b {
            (x - self.a) / (self.b - self.a)
        } else {
            (self.c - x) / (self.c - self.b)
        };

        degree.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unordered_points() {
        assert!(Triangular::new(10.0, 5.0, 20.0).is_none());
        assert!(Triangular::new(0.0, 50.0, 40.0).is_none());
        assert!(Triangular::new(0.0, f64::NAN, 40.0).is_none());
    }

    #[test]
    fn test_regular_triangle() {
        let mf = Triangular::new(20.0, 50.0, 80.0).unwrap();

        assert_eq!(mf.degree(20.0), 0.0);
        assert_eq!(mf.degree(35.0), 0.5);
        assert_eq!(mf.degree(50.0), 1.0);
        assert_eq!(mf.degree(65.0), 0.5);
        assert_eq!(mf.degree(80.0), 0.0);
        assert_eq!(mf.degree(5.0), 0.0);
        assert_eq!(mf.degree(95.0), 0.0);
    }

    #[test]
    fn test_left_ramp() {
        // a == b: full membership at the left edge, falling to c
        let mf = Triangular::new(0.0, 0.0, 50.0).unwrap();

        assert_eq!(mf.degree(0.0), 1.0);
        assert_eq!(mf.degree(25.0), 0.5);
        assert_eq!(mf.degree(50.0), 0.0);
    }

    #[test]
    fn test_right_ramp() {
        let mf = Triangular::new(50.0, 100.0, 100.0).unwrap();

        assert_eq!(mf.degree(50.0), 0.0);
        assert_eq!(mf.degree(95.0), 0.9);
        assert_eq!(mf.degree(100.0), 1.0);
    }

    #[test]
    fn test_singleton() {
        let mf = Triangular::new(30.0, 30.0, 30.0).unwrap();

        assert_eq!(mf.degree(30.0), 1.0);
        assert_eq!(mf.degree(29.0), 0.0);
        assert_eq!(mf.degree(31.0), 0.0);
    }

    #[test]
    fn test_nan_has_no_membership() {
        let mf = Triangular::new(0.0, 50.0, 100.0).unwrap();
        assert_eq!(mf.degree(f64::NAN), 0.0);
    }
}
