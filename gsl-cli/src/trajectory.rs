//! Trajetória fixa: polilinha percorrida a velocidade constante

use anyhow::{Result, bail};
use gsl_core::Point3;

/// Polilinha com comprimento acumulado por vértice
#[derive(Debug, Clone)]
pub struct Polyline {
    waypoints: Vec<Point3>,
    /// `cumulative[i]` = distância percorrida ao chegar em `waypoints[i]`
    cumulative: Vec<f64>,
    speed: f64,
}

impl Polyline {
    pub fn new(waypoints: Vec<Point3>, speed: f64) -> Result<Self> {
        if waypoints.is_empty() {
            bail!("trajectory needs at least one waypoint");
        }
        if !(speed.is_finite() && speed >= 0.0) {
            bail!("trajectory speed must be non-negative, got {speed}");
        }

        let mut cumulative = Vec::with_capacity(waypoints.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in waypoints.windows(2) {
            total += pair[0].distance(&pair[1]);
            cumulative.push(total);
        }

        Ok(Self {
            waypoints,
            cumulative,
            speed,
        })
    }

    /// Comprimento total (m)
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Posição no instante `time`; para no último waypoint
    pub fn position_at(&self, time: f64) -> Point3 {
        let travelled = (self.speed * time).clamp(0.0, self.length());
        // primeiro segmento cujo fim alcança a distância percorrida
        let end = self
            .cumulative
            .iter()
            .position(|d| *d >= travelled)
            .unwrap_or(self.waypoints.len() - 1);
        if end == 0 {
            return self.waypoints[0];
        }

        let start = end - 1;
        let span = self.cumulative[end] - self.cumulative[start];
        if span <= 0.0 {
            return self.waypoints[end];
        }
        let t = (travelled - self.cumulative[start]) / span;
        self.waypoints[start].lerp(&self.waypoints[end], t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Polyline {
        Polyline::new(
            vec![
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(4.0, 0.0, 1.0),
                Point3::new(4.0, 3.0, 1.0),
            ],
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_length() {
        assert_eq!(l_shape().length(), 7.0);
    }

    #[test]
    fn test_position_along_segments() {
        let path = l_shape();
        assert_eq!(path.position_at(0.0), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(path.position_at(2.0), Point3::new(2.0, 0.0, 1.0));
        assert_eq!(path.position_at(4.0), Point3::new(4.0, 0.0, 1.0));
        assert_eq!(path.position_at(5.5), Point3::new(4.0, 1.5, 1.0));
    }

    #[test]
    fn test_stops_at_last_waypoint() {
        let path = l_shape();
        assert_eq!(path.position_at(100.0), Point3::new(4.0, 3.0, 1.0));
        assert_eq!(path.position_at(-1.0), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_single_waypoint_is_stationary() {
        let path = Polyline::new(vec![Point3::new(1.0, 2.0, 3.0)], 0.5).unwrap();
        assert_eq!(path.position_at(10.0), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_invalid_trajectories() {
        assert!(Polyline::new(vec![], 1.0).is_err());
        assert!(Polyline::new(vec![Point3::ORIGIN], -1.0).is_err());
    }
}
