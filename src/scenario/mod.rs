//! Scenario records supplied alongside a coverage container
//!
//! The simulator describes each satellite by a planar position, a speed
//! along a fixed heading and a coverage radius, and each UE by a position.
//! These records are parsed elsewhere; the only behavior kept here is the
//! single linear position update over a duration.

/// A satellite as described by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRecord {
    pub id: u32,
    /// Position, km
    pub x: f64,
    pub y: f64,
    /// Altitude, km
    pub h: f64,
    /// Ground speed, km/s
    pub v: f64,
    /// Coverage radius, km
    pub r: f64,
    /// Heading as sine / cosine
    pub sind: f64,
    pub cosd: f64,
    /// Trajectory group
    pub type_id: u32,
}

impl SatelliteRecord {
    /// Position after moving for `seconds` along the heading.
    pub fn position_after(&self, seconds: f64) -> (f64, f64) {
        let distance = self.v * seconds;
        (self.x + distance * self.cosd, self.y + distance * self.sind)
    }

    /// Moves the satellite along its heading for `seconds`.
    pub fn advance(&mut self, seconds: f64) {
        let (x, y) = self.position_after(seconds);
        self.x = x;
        self.y = y;
    }
}

/// A ground user equipment position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UeRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

/// Advances every satellite by the same duration.
pub fn advance_all(satellites: &mut [SatelliteRecord], seconds: f64) {
    for sat in satellites {
        sat.advance(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eastbound() -> SatelliteRecord {
        SatelliteRecord {
            id: 0,
            x: 0.0,
            y: 100.0,
            h: 300.0,
            v: 7.5,
            r: 200.0,
            sind: 0.0,
            cosd: 1.0,
            type_id: 1,
        }
    }

    #[test]
    fn test_linear_update() {
        let mut sat = eastbound();
        sat.advance(10.0);
        assert!((sat.x - 75.0).abs() < 1e-9);
        assert!((sat.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_heading() {
        let mut sat = eastbound();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        sat.sind = s;
        sat.cosd = s;
        let (x, y) = sat.position_after(2.0);
        assert!((x - 15.0 * s).abs() < 1e-9);
        assert!((y - (100.0 + 15.0 * s)).abs() < 1e-9);
    }

    #[test]
    fn test_advance_all_zero_duration_is_identity() {
        let mut sats = vec![eastbound(), eastbound()];
        let before = sats.clone();
        advance_all(&mut sats, 0.0);
        assert_eq!(sats, before);
    }
}
