use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Map scale: image pixels per mile.
pub const PIXELS_PER_MILE: f64 = 2.38;

/// Travel speeds in miles per day at a normal pace.
pub const FOOT_MILES_PER_DAY: f64 = 24.0;
pub const HORSE_MILES_PER_DAY: f64 = 48.0;
pub const CARAVAN_MILES_PER_DAY: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    Foot,
    Horse,
    Caravan,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Foot, TravelMode::Horse, TravelMode::Caravan];

    pub fn speed_miles_per_day(self) -> f64 {
        match self {
            TravelMode::Foot => FOOT_MILES_PER_DAY,
            TravelMode::Horse => HORSE_MILES_PER_DAY,
            TravelMode::Caravan => CARAVAN_MILES_PER_DAY,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelMode::Foot => write!(f, "On foot"),
            TravelMode::Horse => write!(f, "On horseback"),
            TravelMode::Caravan => write!(f, "By caravan"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub mode: TravelMode,
    pub hours: f64,
    pub label: String,
}

/// Total polyline length in image pixels.
pub fn polyline_pixels(points: &[Position]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(w[1])).sum()
}

/// Road length in miles over the full point sequence (start, waypoints, end).
pub fn distance(points: &[Position]) -> f64 {
    polyline_pixels(points) / PIXELS_PER_MILE
}

/// Hours needed to cover `distance_miles` at `speed_miles_per_day`.
/// A non-positive speed never arrives.
pub fn travel_time(distance_miles: f64, speed_miles_per_day: f64) -> f64 {
    if speed_miles_per_day <= 0.0 {
        return f64::INFINITY;
    }
    distance_miles / speed_miles_per_day * 24.0
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Human-readable duration, e.g. "45 minutes", "5 hours", "4 days and 4 hours".
pub fn format_duration(hours: f64) -> String {
    if !hours.is_finite() {
        return "never".to_string();
    }
    let hours = hours.max(0.0);

    // Under an hour is always whole minutes, even when that rounds to 60
    if hours < 1.0 {
        return plural((hours * 60.0).round() as u64, "minute");
    }

    let mut days = (hours / 24.0).floor() as u64;
    let mut rem = (hours - days as f64 * 24.0).round() as u64;
    if rem == 24 {
        days += 1;
        rem = 0;
    }

    match (days, rem) {
        (0, r) => plural(r.max(1), "hour"),
        (d, 0) => plural(d, "day"),
        (d, r) => format!("{} and {}", plural(d, "day"), plural(r, "hour")),
    }
}

/// Travel estimates for every mode over the given road points.
pub fn travel_estimates(points: &[Position]) -> Vec<TravelEstimate> {
    let miles = distance(points);
    TravelMode::ALL
        .into_iter()
        .map(|mode| {
            let hours = travel_time(miles, mode.speed_miles_per_day());
            TravelEstimate {
                mode,
                hours,
                label: format_duration(hours),
            }
        })
        .collect()
}

/// Format a mileage for display.
pub fn format_miles(miles: f64) -> String {
    if miles < 10.0 {
        format!("{:.1} miles", miles)
    } else {
        format!("{:.0} miles", miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Position> {
        raw.iter().map(|&p| Position::from(p)).collect()
    }

    #[test]
    fn test_distance_straight_line() {
        let p = pts(&[(0.0, 0.0), (238.0, 0.0)]);
        assert!((distance(&p) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_sums_segments() {
        let p = pts(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert!((polyline_pixels(&p) - 11.0).abs() < 1e-9);
        assert!((distance(&p) - 11.0 / 2.38).abs() < 1e-9);
    }

    #[test]
    fn test_distance_degenerate_inputs() {
        assert_eq!(distance(&[]), 0.0);
        assert_eq!(distance(&pts(&[(5.0, 5.0)])), 0.0);
    }

    #[test]
    fn test_distance_symmetric_under_reversal() {
        let p = pts(&[(10.0, 10.0), (20.0, 15.0), (47.5, 3.25), (30.0, 10.0), (0.0, 99.0)]);
        let mut r = p.clone();
        r.reverse();
        assert!((distance(&p) - distance(&r)).abs() < 1e-9);
    }

    #[test]
    fn test_travel_time_modes() {
        assert!((travel_time(100.0, FOOT_MILES_PER_DAY) - 100.0).abs() < 1e-9);
        assert!((travel_time(100.0, HORSE_MILES_PER_DAY) - 50.0).abs() < 1e-9);
        assert!((travel_time(100.0, CARAVAN_MILES_PER_DAY) - 150.0).abs() < 1e-9);
        assert!(travel_time(100.0, 0.0).is_infinite());
    }

    #[test]
    fn test_format_duration_hundred_miles() {
        assert_eq!(format_duration(travel_time(100.0, 24.0)), "4 days and 4 hours");
        assert_eq!(format_duration(travel_time(100.0, 48.0)), "2 days and 2 hours");
        assert_eq!(format_duration(travel_time(100.0, 16.0)), "6 days and 6 hours");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(0.5), "30 minutes");
        assert_eq!(format_duration(1.0 / 60.0), "1 minute");
        assert_eq!(format_duration(0.0), "0 minutes");
        assert_eq!(format_duration(0.99), "59 minutes");
        assert_eq!(format_duration(0.999), "60 minutes");
    }

    #[test]
    fn test_format_duration_hours_and_days() {
        assert_eq!(format_duration(1.0), "1 hour");
        assert_eq!(format_duration(5.4), "5 hours");
        assert_eq!(format_duration(24.0), "1 day");
        assert_eq!(format_duration(48.2), "2 days");
        assert_eq!(format_duration(25.0), "1 day and 1 hour");
        assert_eq!(format_duration(47.7), "2 days");
        assert_eq!(format_duration(f64::INFINITY), "never");
    }

    #[test]
    fn test_travel_estimates_all_modes() {
        let p = pts(&[(0.0, 0.0), (238.0, 0.0)]);
        let est = travel_estimates(&p);
        assert_eq!(est.len(), 3);
        assert_eq!(est[0].mode, TravelMode::Foot);
        assert_eq!(est[0].label, "4 days and 4 hours");
        assert_eq!(est[2].label, "6 days and 6 hours");
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(4.31), "4.3 miles");
        assert_eq!(format_miles(100.4), "100 miles");
    }
}
