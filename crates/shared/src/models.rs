use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc;
use crate::geometry::{Position, Size};

pub type WorldId = Uuid;
pub type LocationId = Uuid;
pub type RoadId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    City,
    LargeCity,
    Village,
    Landmark,
    Ruins,
    Stronghold,
    Fort,
    PointOfInterest,
    Shop,
    Other,
}

impl LocationType {
    pub const ALL: [LocationType; 10] = [
        LocationType::City,
        LocationType::LargeCity,
        LocationType::Village,
        LocationType::Landmark,
        LocationType::Ruins,
        LocationType::Stronghold,
        LocationType::Fort,
        LocationType::PointOfInterest,
        LocationType::Shop,
        LocationType::Other,
    ];

    /// Stable index into per-type lookup tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::City => write!(f, "City"),
            LocationType::LargeCity => write!(f, "Large City"),
            LocationType::Village => write!(f, "Village"),
            LocationType::Landmark => write!(f, "Landmark"),
            LocationType::Ruins => write!(f, "Ruins"),
            LocationType::Stronghold => write!(f, "Stronghold"),
            LocationType::Fort => write!(f, "Fort"),
            LocationType::PointOfInterest => write!(f, "Point of Interest"),
            LocationType::Shop => write!(f, "Shop"),
            LocationType::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoadType {
    Major,
    #[default]
    Minor,
    Path,
}

impl RoadType {
    pub const ALL: [RoadType; 3] = [RoadType::Major, RoadType::Minor, RoadType::Path];
}

impl std::fmt::Display for RoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadType::Major => write!(f, "Major"),
            RoadType::Minor => write!(f, "Minor"),
            RoadType::Path => write!(f, "Path"),
        }
    }
}

/// One entry of the artwork catalog (`maps.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapArtwork {
    pub display_name: String,
    pub file_name: String,
    pub width: f64,
    pub height: f64,
}

impl MapArtwork {
    pub fn natural_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A map marker. Coordinates are in image space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub world_id: WorldId,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub coordinates: Position,
    #[serde(default)]
    pub roads: Vec<RoadId>,
}

impl Location {
    pub fn new(
        world_id: WorldId,
        name: impl Into<String>,
        location_type: LocationType,
        coordinates: Position,
    ) -> Self {
        Location {
            id: Uuid::new_v4(),
            world_id,
            name: name.into(),
            location_type,
            coordinates,
            roads: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub fn at(pos: Position) -> Self {
        Waypoint {
            id: Uuid::new_v4(),
            x: pos.x,
            y: pos.y,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A road between two locations.
///
/// `points` always holds `waypoints.len() + 2` entries: the start location's
/// coordinates, every waypoint, then the end location's coordinates, all
/// captured when the road was drawn. Endpoints are not refreshed when a
/// connected location moves later on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Road {
    pub id: RoadId,
    pub world_id: WorldId,
    pub name: String,
    #[serde(rename = "type")]
    pub road_type: RoadType,
    pub points: Vec<Position>,
    pub waypoints: Vec<Waypoint>,
    pub connected_locations: [LocationId; 2],
}

impl Road {
    /// Build a road from its endpoints and the waypoints drawn between them.
    pub fn between(
        start: &Location,
        end: &Location,
        road_type: RoadType,
        waypoints: Vec<Waypoint>,
    ) -> Self {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(start.coordinates);
        points.extend(waypoints.iter().map(Waypoint::position));
        points.push(end.coordinates);

        Road {
            id: Uuid::new_v4(),
            world_id: start.world_id,
            name: format!("{} to {}", start.name, end.name),
            road_type,
            points,
            waypoints,
            connected_locations: [start.id, end.id],
        }
    }

    pub fn length_miles(&self) -> f64 {
        calc::distance(&self.points)
    }

    pub fn connects(&self, location_id: LocationId) -> bool {
        self.connected_locations.contains(&location_id)
    }
}
