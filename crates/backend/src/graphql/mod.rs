use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use atlas_shared::{
    calc::{self, TravelMode},
    geometry::Position,
    models::{self, LocationType, RoadType},
    store::LocationStore,
};
use uuid::Uuid;

use crate::assets::Assets;
use crate::storage::Storage;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlLocationType {
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

impl From<LocationType> for GqlLocationType {
    fn from(t: LocationType) -> Self {
        match t {
            LocationType::City => GqlLocationType::City,
            LocationType::LargeCity => GqlLocationType::LargeCity,
            LocationType::Village => GqlLocationType::Village,
            LocationType::Landmark => GqlLocationType::Landmark,
            LocationType::Ruins => GqlLocationType::Ruins,
            LocationType::Stronghold => GqlLocationType::Stronghold,
            LocationType::Fort => GqlLocationType::Fort,
            LocationType::PointOfInterest => GqlLocationType::PointOfInterest,
            LocationType::Shop => GqlLocationType::Shop,
            LocationType::Other => GqlLocationType::Other,
        }
    }
}

impl From<GqlLocationType> for LocationType {
    fn from(t: GqlLocationType) -> Self {
        match t {
            GqlLocationType::City => LocationType::City,
            GqlLocationType::LargeCity => LocationType::LargeCity,
            GqlLocationType::Village => LocationType::Village,
            GqlLocationType::Landmark => LocationType::Landmark,
            GqlLocationType::Ruins => LocationType::Ruins,
            GqlLocationType::Stronghold => LocationType::Stronghold,
            GqlLocationType::Fort => LocationType::Fort,
            GqlLocationType::PointOfInterest => LocationType::PointOfInterest,
            GqlLocationType::Shop => LocationType::Shop,
            GqlLocationType::Other => LocationType::Other,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlRoadType {
    Major,
    Minor,
    Path,
}

impl From<RoadType> for GqlRoadType {
    fn from(t: RoadType) -> Self {
        match t {
            RoadType::Major => GqlRoadType::Major,
            RoadType::Minor => GqlRoadType::Minor,
            RoadType::Path => GqlRoadType::Path,
        }
    }
}

impl From<GqlRoadType> for RoadType {
    fn from(t: GqlRoadType) -> Self {
        match t {
            GqlRoadType::Major => RoadType::Major,
            GqlRoadType::Minor => RoadType::Minor,
            GqlRoadType::Path => RoadType::Path,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum GqlTravelMode {
    Foot,
    Horse,
    Caravan,
}

impl From<TravelMode> for GqlTravelMode {
    fn from(m: TravelMode) -> Self {
        match m {
            TravelMode::Foot => GqlTravelMode::Foot,
            TravelMode::Horse => GqlTravelMode::Horse,
            TravelMode::Caravan => GqlTravelMode::Caravan,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlMapArtwork {
    pub display_name: String,
    pub file_name: String,
    pub width: f64,
    pub height: f64,
}

#[derive(SimpleObject, Clone)]
pub struct GqlPosition {
    pub x: f64,
    pub y: f64,
}

impl From<Position> for GqlPosition {
    fn from(p: Position) -> Self {
        GqlPosition { x: p.x, y: p.y }
    }
}

#[derive(SimpleObject)]
pub struct GqlLocation {
    pub id: ID,
    pub world_id: ID,
    pub name: String,
    #[graphql(name = "type")]
    pub location_type: GqlLocationType,
    pub coordinates: GqlPosition,
    pub roads: Vec<ID>,
}

impl From<models::Location> for GqlLocation {
    fn from(l: models::Location) -> Self {
        GqlLocation {
            id: ID(l.id.to_string()),
            world_id: ID(l.world_id.to_string()),
            name: l.name,
            location_type: l.location_type.into(),
            coordinates: l.coordinates.into(),
            roads: l.roads.into_iter().map(|r| ID(r.to_string())).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlWaypoint {
    pub id: ID,
    pub x: f64,
    pub y: f64,
}

#[derive(SimpleObject)]
pub struct GqlRoad {
    pub id: ID,
    pub world_id: ID,
    pub name: String,
    #[graphql(name = "type")]
    pub road_type: GqlRoadType,
    pub points: Vec<GqlPosition>,
    pub waypoints: Vec<GqlWaypoint>,
    pub connected_locations: Vec<ID>,
    pub length_miles: f64,
}

impl From<models::Road> for GqlRoad {
    fn from(r: models::Road) -> Self {
        let length_miles = r.length_miles();
        GqlRoad {
            id: ID(r.id.to_string()),
            world_id: ID(r.world_id.to_string()),
            name: r.name,
            road_type: r.road_type.into(),
            points: r.points.into_iter().map(GqlPosition::from).collect(),
            waypoints: r
                .waypoints
                .into_iter()
                .map(|w| GqlWaypoint {
                    id: ID(w.id.to_string()),
                    x: w.x,
                    y: w.y,
                })
                .collect(),
            connected_locations: r
                .connected_locations
                .iter()
                .map(|id| ID(id.to_string()))
                .collect(),
            length_miles,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlTravelEstimate {
    pub mode: GqlTravelMode,
    pub hours: f64,
    pub label: String,
}

// Input types

#[derive(InputObject)]
pub struct PositionInput {
    pub x: f64,
    pub y: f64,
}

impl From<PositionInput> for Position {
    fn from(p: PositionInput) -> Self {
        Position::new(p.x, p.y)
    }
}

#[derive(InputObject)]
pub struct LocationInput {
    /// Client-assigned id. Generated when absent on create; required on update.
    pub id: Option<ID>,
    pub world_id: ID,
    pub name: String,
    #[graphql(name = "type")]
    pub location_type: GqlLocationType,
    pub coordinates: PositionInput,
    pub roads: Option<Vec<ID>>,
}

#[derive(InputObject)]
pub struct WaypointInput {
    pub id: Option<ID>,
    pub x: f64,
    pub y: f64,
}

#[derive(InputObject)]
pub struct RoadInput {
    pub id: Option<ID>,
    pub world_id: ID,
    pub name: String,
    #[graphql(name = "type")]
    pub road_type: GqlRoadType,
    pub points: Vec<PositionInput>,
    pub waypoints: Option<Vec<WaypointInput>>,
    pub connected_locations: Vec<ID>,
}

fn parse_id(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| async_graphql::Error::new(format!("Invalid id: {}", id.as_str())))
}

fn parse_ids(ids: &[ID]) -> async_graphql::Result<Vec<Uuid>> {
    ids.iter().map(parse_id).collect()
}

fn location_from_input(input: LocationInput) -> async_graphql::Result<models::Location> {
    let id = match &input.id {
        Some(id) => parse_id(id)?,
        None => Uuid::new_v4(),
    };
    Ok(models::Location {
        id,
        world_id: parse_id(&input.world_id)?,
        name: input.name,
        location_type: input.location_type.into(),
        coordinates: input.coordinates.into(),
        roads: parse_ids(&input.roads.unwrap_or_default())?,
    })
}

fn road_from_input(input: RoadInput) -> async_graphql::Result<models::Road> {
    let connected = parse_ids(&input.connected_locations)?;
    let connected_locations: [Uuid; 2] = connected
        .try_into()
        .map_err(|_| async_graphql::Error::new("A road connects exactly two locations"))?;

    let waypoints = input
        .waypoints
        .unwrap_or_default()
        .into_iter()
        .map(|w| -> async_graphql::Result<models::Waypoint> {
            Ok(models::Waypoint {
                id: match &w.id {
                    Some(id) => parse_id(id)?,
                    None => Uuid::new_v4(),
                },
                x: w.x,
                y: w.y,
            })
        })
        .collect::<async_graphql::Result<Vec<_>>>()?;

    let points: Vec<Position> = input.points.into_iter().map(Position::from).collect();
    if points.len() != waypoints.len() + 2 {
        return Err(async_graphql::Error::new(
            "Road points must be start, waypoints, then end",
        ));
    }

    Ok(models::Road {
        id: match &input.id {
            Some(id) => parse_id(id)?,
            None => Uuid::new_v4(),
        },
        world_id: parse_id(&input.world_id)?,
        name: input.name,
        road_type: input.road_type.into(),
        points,
        waypoints,
        connected_locations,
    })
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn maps(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlMapArtwork>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .maps
            .iter()
            .map(|m| GqlMapArtwork {
                display_name: m.display_name.clone(),
                file_name: m.file_name.clone(),
                width: m.width,
                height: m.height,
            })
            .collect())
    }

    async fn locations(&self, ctx: &Context<'_>, world_id: ID) -> async_graphql::Result<Vec<GqlLocation>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let locations = storage.list(parse_id(&world_id)?)?;
        Ok(locations.into_iter().map(GqlLocation::from).collect())
    }

    async fn roads(&self, ctx: &Context<'_>, world_id: ID) -> async_graphql::Result<Vec<GqlRoad>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let roads = storage.list_roads(parse_id(&world_id)?)?;
        Ok(roads.into_iter().map(GqlRoad::from).collect())
    }

    /// Travel times for every mode along a polyline in image pixels.
    async fn travel_estimates(&self, points: Vec<PositionInput>) -> Vec<GqlTravelEstimate> {
        let points: Vec<Position> = points.into_iter().map(Position::from).collect();
        calc::travel_estimates(&points)
            .into_iter()
            .map(|e| GqlTravelEstimate {
                mode: e.mode.into(),
                hours: e.hours,
                label: e.label,
            })
            .collect()
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_location(
        &self,
        ctx: &Context<'_>,
        input: LocationInput,
    ) -> async_graphql::Result<GqlLocation> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let location = location_from_input(input)?;
        storage.create(&location)?;
        tracing::debug!(id = %location.id, name = %location.name, "location created");
        Ok(GqlLocation::from(location))
    }

    async fn update_location(
        &self,
        ctx: &Context<'_>,
        input: LocationInput,
    ) -> async_graphql::Result<GqlLocation> {
        if input.id.is_none() {
            return Err(async_graphql::Error::new("Location id is required"));
        }
        let storage = ctx.data::<Arc<Storage>>()?;
        let location = location_from_input(input)?;
        storage.update(&location)?;
        Ok(GqlLocation::from(location))
    }

    async fn delete_location(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let storage = ctx.data::<Arc<Storage>>()?;
        Ok(storage.delete(parse_id(&id)?)?)
    }

    async fn create_road(&self, ctx: &Context<'_>, input: RoadInput) -> async_graphql::Result<GqlRoad> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let road = road_from_input(input)?;
        storage.create_road(&road)?;
        tracing::debug!(id = %road.id, name = %road.name, "road created");
        Ok(GqlRoad::from(road))
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>, storage: Arc<Storage>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(assets)
        .data(storage)
        .finish()
}
