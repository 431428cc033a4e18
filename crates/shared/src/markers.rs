//! Per-type marker presentation and pointer hit-testing.

use crate::geometry::Position;
use crate::models::{Location, LocationType};

/// Hit boxes are this much larger than the drawn marker.
pub const HIT_BOX_SCALE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Square marker edge in pixels.
    pub size: f64,
    pub icon: &'static str,
}

const DEFAULT_MARKER_SIZE: f64 = 32.0;

// Indexed by `LocationType::index()`, same order as `LocationType::ALL`.
const MARKER_TABLE: [MarkerStyle; 10] = [
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "city" },
    MarkerStyle { size: 48.0, icon: "castle" },
    MarkerStyle { size: 24.0, icon: "home" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "landmark" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "ruins" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "stronghold" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "fort" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "pin" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "shop" },
    MarkerStyle { size: DEFAULT_MARKER_SIZE, icon: "marker" },
];

pub fn marker_style(location_type: LocationType) -> MarkerStyle {
    MARKER_TABLE[location_type.index()]
}

pub fn hit_box_size(location_type: LocationType) -> f64 {
    marker_style(location_type).size * HIT_BOX_SCALE
}

/// Set of location types currently shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeFilter(u16);

impl Default for TypeFilter {
    fn default() -> Self {
        TypeFilter::all()
    }
}

impl TypeFilter {
    pub const fn all() -> Self {
        TypeFilter((1 << LocationType::ALL.len()) - 1)
    }

    pub const fn none() -> Self {
        TypeFilter(0)
    }

    pub const fn contains(self, t: LocationType) -> bool {
        self.0 & (1 << t.index()) != 0
    }

    pub const fn with(self, t: LocationType) -> Self {
        TypeFilter(self.0 | (1 << t.index()))
    }

    pub const fn without(self, t: LocationType) -> Self {
        TypeFilter(self.0 & !(1 << t.index()))
    }

    pub fn toggle(&mut self, t: LocationType) {
        self.0 ^= 1 << t.index();
    }

    pub fn types(self) -> impl Iterator<Item = LocationType> {
        LocationType::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<LocationType> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = LocationType>>(iter: I) -> Self {
        iter.into_iter().fold(TypeFilter::none(), TypeFilter::with)
    }
}

/// True when `pos` falls inside the marker's scaled square hit box, measured
/// in image pixels.
pub fn marker_contains(location: &Location, pos: Position) -> bool {
    let half = hit_box_size(location.location_type) / 2.0;
    (location.coordinates.x - pos.x).abs() <= half && (location.coordinates.y - pos.y).abs() <= half
}

/// Find the topmost visible marker under an image-space position.
///
/// Markers are drawn in iteration order, so the last one is on top and wins
/// when hit boxes overlap.
pub fn hit_test<'a, I>(pos: Position, markers: I, visible: TypeFilter) -> Option<&'a Location>
where
    I: IntoIterator<Item = &'a Location>,
    I::IntoIter: DoubleEndedIterator,
{
    markers
        .into_iter()
        .rev()
        .filter(|m| visible.contains(m.location_type))
        .find(|m| marker_contains(m, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn marker(t: LocationType, x: f64, y: f64) -> Location {
        Location::new(Uuid::nil(), format!("{t}"), t, Position::new(x, y))
    }

    #[test]
    fn test_marker_table_sizes() {
        assert_eq!(marker_style(LocationType::LargeCity).size, 48.0);
        assert_eq!(marker_style(LocationType::Village).size, 24.0);
        assert_eq!(marker_style(LocationType::Ruins).size, 32.0);
        assert_eq!(hit_box_size(LocationType::LargeCity), 72.0);
        assert_eq!(hit_box_size(LocationType::Village), 36.0);
    }

    #[test]
    fn test_hit_center_and_miss() {
        let markers = vec![marker(LocationType::City, 100.0, 100.0)];
        let hit = hit_test(Position::new(100.0, 100.0), &markers, TypeFilter::all());
        assert_eq!(hit.map(|m| m.id), Some(markers[0].id));
        assert!(hit_test(Position::new(200.0, 100.0), &markers, TypeFilter::all()).is_none());
    }

    #[test]
    fn test_hit_box_edge_is_inclusive() {
        // City hit box is 48 wide, half = 24
        let markers = vec![marker(LocationType::City, 100.0, 100.0)];
        assert!(hit_test(Position::new(124.0, 76.0), &markers, TypeFilter::all()).is_some());
        assert!(hit_test(Position::new(124.01, 100.0), &markers, TypeFilter::all()).is_none());
    }

    #[test]
    fn test_hit_box_scaling_large_city_vs_village() {
        let large = vec![marker(LocationType::LargeCity, 500.0, 500.0)];
        let village = vec![marker(LocationType::Village, 500.0, 500.0)];

        let last_hit = |markers: &[Location]| {
            (0..100)
                .map(|offset| offset as f64)
                .take_while(|&o| {
                    hit_test(Position::new(500.0 + o, 500.0), markers, TypeFilter::all()).is_some()
                })
                .last()
                .unwrap()
        };

        let large_reach = last_hit(&large);
        let village_reach = last_hit(&village);
        assert_eq!(large_reach, 36.0);
        assert_eq!(village_reach, 18.0);
        assert!(large_reach > village_reach);

        // An offset inside the large city's box but outside the village's
        let edge = Position::new(500.0, 530.0);
        assert!(hit_test(edge, &large, TypeFilter::all()).is_some());
        assert!(hit_test(edge, &village, TypeFilter::all()).is_none());
    }

    #[test]
    fn test_overlap_last_marker_wins() {
        let markers = vec![
            marker(LocationType::City, 100.0, 100.0),
            marker(LocationType::Fort, 110.0, 105.0),
        ];
        let hit = hit_test(Position::new(105.0, 102.0), &markers, TypeFilter::all()).unwrap();
        assert_eq!(hit.id, markers[1].id);
    }

    #[test]
    fn test_hidden_types_are_skipped() {
        let markers = vec![
            marker(LocationType::City, 100.0, 100.0),
            marker(LocationType::Shop, 100.0, 100.0),
        ];
        let filter = TypeFilter::all().without(LocationType::Shop);
        let hit = hit_test(Position::new(100.0, 100.0), &markers, filter).unwrap();
        assert_eq!(hit.location_type, LocationType::City);
        assert!(hit_test(Position::new(100.0, 100.0), &markers, TypeFilter::none()).is_none());
    }

    #[test]
    fn test_type_filter_ops() {
        let mut f = TypeFilter::none().with(LocationType::Ruins);
        assert!(f.contains(LocationType::Ruins));
        assert!(!f.contains(LocationType::City));
        f.toggle(LocationType::City);
        f.toggle(LocationType::Ruins);
        assert_eq!(f.types().collect::<Vec<_>>(), vec![LocationType::City]);
        assert_eq!(TypeFilter::all().types().count(), LocationType::ALL.len());
        let collected: TypeFilter = [LocationType::Fort, LocationType::Shop].into_iter().collect();
        assert!(collected.contains(LocationType::Fort) && collected.contains(LocationType::Shop));
    }
}
