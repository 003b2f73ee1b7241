//! Geometria 3D mínima usada pela simulação

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Ponto (ou vetor) 3D em metros, no referencial do ambiente
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Origem do referencial
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Quadrado da distância euclidiana
    #[inline]
    pub fn distance_sqr(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distância euclidiana
    #[inline]
    pub fn distance(&self, other: &Point3) -> f64 {
        self.distance_sqr(other).sqrt()
    }

    /// Norma do vetor
    #[inline]
    pub fn norm(&self) -> f64 {
        self.distance(&Point3::ORIGIN)
    }

    /// Componentes como array `[x, y, z]`
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Interpolação linear entre `self` (t = 0) e `other` (t = 1)
    #[inline]
    pub fn lerp(&self, other: &Point3, t: f64) -> Point3 {
        Point3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    /// `n` pontos igualmente espaçados de `self` até `end`, incluindo ambos.
    ///
    /// Mesma aritmética de um `linspace` (`start + i * ((end - start) / (n - 1))`):
    /// o último ponto é exatamente `end` e `n == 1` produz apenas `self`.
    pub fn linspace(&self, end: &Point3, n: usize) -> impl Iterator<Item = Point3> + use<> {
        let start = *self;
        let end = *end;
        let last = n.saturating_sub(1);
        let div = last.max(1) as f64;
        let step = Point3::new(
            (end.x - start.x) / div,
            (end.y - start.y) / div,
            (end.z - start.z) / div,
        );
        (0..n).map(move |i| {
            if i == last && last > 0 {
                end
            } else {
                let k = i as f64;
                Point3::new(k * step.x + start.x, k * step.y + start.y, k * step.z + start.z)
            }
        })
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Point3::new(v[0], v[1], v[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(4.0, 6.0, 3.0);
        assert_eq!(a.distance_sqr(&b), 25.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.3, -0.7);
        let pts: Vec<_> = a.linspace(&b, 4).collect();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], a);
        assert_eq!(pts[3], b);
        assert!((pts[1].x - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_single_sample() {
        let a = Point3::new(2.0, 2.0, 2.0);
        let pts: Vec<_> = a.linspace(&Point3::ORIGIN, 1).collect();
        assert_eq!(pts, vec![a]);
        assert_eq!(a.linspace(&Point3::ORIGIN, 0).count(), 0);
    }

    #[test]
    fn test_ops() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::from([0.5, 0.0, 2.0]);
        assert_eq!(a + b, Point3::new(1.5, 1.0, 3.0));
        assert_eq!(a - b, Point3::new(0.5, 1.0, -1.0));
        assert_eq!(b * 2.0, Point3::new(1.0, 0.0, 4.0));
        assert_eq!(<[f64; 3]>::from(a), [1.0, 1.0, 1.0]);
    }
}
