use atlas_shared::geometry::Position;
use atlas_shared::interaction::Intent;
use atlas_shared::models::{
    Location, LocationId, LocationType, MapArtwork, Road, RoadType, Waypoint, WorldId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GraphQL enum name for a location type.
pub fn gql_location_type(t: LocationType) -> &'static str {
    match t {
        LocationType::City => "CITY",
        LocationType::LargeCity => "LARGE_CITY",
        LocationType::Village => "VILLAGE",
        LocationType::Landmark => "LANDMARK",
        LocationType::Ruins => "RUINS",
        LocationType::Stronghold => "STRONGHOLD",
        LocationType::Fort => "FORT",
        LocationType::PointOfInterest => "POINT_OF_INTEREST",
        LocationType::Shop => "SHOP",
        LocationType::Other => "OTHER",
    }
}

pub fn parse_location_type(s: &str) -> Option<LocationType> {
    LocationType::ALL
        .into_iter()
        .find(|t| gql_location_type(*t) == s)
}

pub fn gql_road_type(t: RoadType) -> &'static str {
    match t {
        RoadType::Major => "MAJOR",
        RoadType::Minor => "MINOR",
        RoadType::Path => "PATH",
    }
}

pub fn parse_road_type(s: &str) -> Option<RoadType> {
    RoadType::ALL.into_iter().find(|t| gql_road_type(*t) == s)
}

/// Build the variables JSON for createLocation / updateLocation.
pub fn build_location_variables(location: &Location) -> serde_json::Value {
    serde_json::json!({
        "input": {
            "id": location.id.to_string(),
            "worldId": location.world_id.to_string(),
            "name": location.name,
            "type": gql_location_type(location.location_type),
            "coordinates": { "x": location.coordinates.x, "y": location.coordinates.y },
            "roads": location.roads.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
        }
    })
}

/// Build the variables JSON for createRoad.
pub fn build_road_variables(road: &Road) -> serde_json::Value {
    let points: serde_json::Value = road
        .points
        .iter()
        .map(|p| serde_json::json!({ "x": p.x, "y": p.y }))
        .collect();
    let waypoints: serde_json::Value = road
        .waypoints
        .iter()
        .map(|w| serde_json::json!({ "id": w.id.to_string(), "x": w.x, "y": w.y }))
        .collect();
    serde_json::json!({
        "input": {
            "id": road.id.to_string(),
            "worldId": road.world_id.to_string(),
            "name": road.name,
            "type": gql_road_type(road.road_type),
            "points": points,
            "waypoints": waypoints,
            "connectedLocations": road.connected_locations.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
        }
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    let window = web_sys::window().ok_or("No window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| "No origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;

    if let Some(errors) = gql_resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }

    gql_resp.data.ok_or_else(|| "No data returned".to_string())
}

// Types mirroring the GraphQL schema

fn parse_uuid(s: &str) -> Result<Uuid, String> {
    Uuid::parse_str(s).map_err(|_| format!("Invalid id: {}", s))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub display_name: String,
    pub file_name: String,
    pub width: f64,
    pub height: f64,
}

impl From<MapData> for MapArtwork {
    fn from(m: MapData) -> Self {
        MapArtwork {
            display_name: m.display_name,
            file_name: m.file_name,
            width: m.width,
            height: m.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionData {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub id: String,
    pub world_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub coordinates: PositionData,
    #[serde(default)]
    pub roads: Vec<String>,
}

impl LocationData {
    pub fn into_location(self) -> Result<Location, String> {
        Ok(Location {
            id: parse_uuid(&self.id)?,
            world_id: parse_uuid(&self.world_id)?,
            location_type: parse_location_type(&self.location_type)
                .ok_or_else(|| format!("Unknown location type: {}", self.location_type))?,
            name: self.name,
            coordinates: Position::new(self.coordinates.x, self.coordinates.y),
            roads: self
                .roads
                .iter()
                .map(|r| parse_uuid(r))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaypointData {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadData {
    pub id: String,
    pub world_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub road_type: String,
    pub points: Vec<PositionData>,
    #[serde(default)]
    pub waypoints: Vec<WaypointData>,
    pub connected_locations: Vec<String>,
}

impl RoadData {
    pub fn into_road(self) -> Result<Road, String> {
        let connected: Vec<Uuid> = self
            .connected_locations
            .iter()
            .map(|id| parse_uuid(id))
            .collect::<Result<_, _>>()?;
        let connected_locations: [Uuid; 2] = connected
            .try_into()
            .map_err(|_| format!("Road {} does not connect two locations", self.id))?;
        Ok(Road {
            id: parse_uuid(&self.id)?,
            world_id: parse_uuid(&self.world_id)?,
            road_type: parse_road_type(&self.road_type)
                .ok_or_else(|| format!("Unknown road type: {}", self.road_type))?,
            name: self.name,
            points: self.points.iter().map(|p| Position::new(p.x, p.y)).collect(),
            waypoints: self
                .waypoints
                .iter()
                .map(|w| -> Result<Waypoint, String> {
                    Ok(Waypoint {
                        id: parse_uuid(&w.id)?,
                        x: w.x,
                        y: w.y,
                    })
                })
                .collect::<Result<_, _>>()?,
            connected_locations,
        })
    }
}

const LOCATION_FIELDS: &str = "id worldId name type coordinates { x y } roads";
const ROAD_FIELDS: &str =
    "id worldId name type points { x y } waypoints { id x y } connectedLocations";

// API functions

#[derive(Deserialize)]
pub struct MapsResponse {
    pub maps: Vec<MapData>,
}

pub async fn fetch_maps() -> Result<Vec<MapArtwork>, String> {
    let resp: MapsResponse = query(
        r#"query { maps { displayName fileName width height } }"#,
        None,
    )
    .await?;
    Ok(resp.maps.into_iter().map(MapArtwork::from).collect())
}

#[derive(Deserialize)]
pub struct WorldResponse {
    pub locations: Vec<LocationData>,
    pub roads: Vec<RoadData>,
}

pub async fn fetch_world(world_id: WorldId) -> Result<(Vec<Location>, Vec<Road>), String> {
    let resp: WorldResponse = query(
        &format!(
            "query World($worldId: ID!) {{ locations(worldId: $worldId) {{ {LOCATION_FIELDS} }} roads(worldId: $worldId) {{ {ROAD_FIELDS} }} }}"
        ),
        Some(serde_json::json!({ "worldId": world_id.to_string() })),
    )
    .await?;

    let locations = resp
        .locations
        .into_iter()
        .map(LocationData::into_location)
        .collect::<Result<Vec<_>, _>>()?;
    let roads = resp
        .roads
        .into_iter()
        .map(RoadData::into_road)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((locations, roads))
}

#[derive(Deserialize)]
pub struct CreateLocationResponse {
    #[serde(rename = "createLocation")]
    pub create_location: LocationData,
}

pub async fn create_location(location: &Location) -> Result<Location, String> {
    let resp: CreateLocationResponse = query(
        &format!(
            "mutation CreateLocation($input: LocationInput!) {{ createLocation(input: $input) {{ {LOCATION_FIELDS} }} }}"
        ),
        Some(build_location_variables(location)),
    )
    .await?;
    resp.create_location.into_location()
}

#[derive(Deserialize)]
pub struct UpdateLocationResponse {
    #[serde(rename = "updateLocation")]
    pub update_location: LocationData,
}

pub async fn update_location(location: &Location) -> Result<Location, String> {
    let resp: UpdateLocationResponse = query(
        &format!(
            "mutation UpdateLocation($input: LocationInput!) {{ updateLocation(input: $input) {{ {LOCATION_FIELDS} }} }}"
        ),
        Some(build_location_variables(location)),
    )
    .await?;
    resp.update_location.into_location()
}

#[derive(Deserialize)]
pub struct DeleteLocationResponse {
    #[serde(rename = "deleteLocation")]
    pub delete_location: bool,
}

pub async fn delete_location(id: LocationId) -> Result<bool, String> {
    let resp: DeleteLocationResponse = query(
        r#"mutation DeleteLocation($id: ID!) { deleteLocation(id: $id) }"#,
        Some(serde_json::json!({ "id": id.to_string() })),
    )
    .await?;
    Ok(resp.delete_location)
}

#[derive(Deserialize)]
pub struct CreateRoadResponse {
    #[serde(rename = "createRoad")]
    pub create_road: RoadData,
}

pub async fn create_road(road: &Road) -> Result<Road, String> {
    let resp: CreateRoadResponse = query(
        &format!(
            "mutation CreateRoad($input: RoadInput!) {{ createRoad(input: $input) {{ {ROAD_FIELDS} }} }}"
        ),
        Some(build_road_variables(road)),
    )
    .await?;
    resp.create_road.into_road()
}

/// Send one persistence intent. Non-persistence intents are a no-op.
pub async fn send_intent(intent: &Intent) -> Result<(), String> {
    match intent {
        Intent::CreateLocation(location) => create_location(location).await.map(|_| ()),
        Intent::PersistLocation(location) => update_location(location).await.map(|_| ()),
        Intent::DeleteLocation(id) => delete_location(*id).await.map(|_| ()),
        Intent::CreateRoad(road) => create_road(road).await.map(|_| ()),
        _ => Ok(()),
    }
}

/// Persist the storage side of a batch of intents in order, stopping at the
/// first failure. Returns how many requests went through.
pub async fn persist_all(intents: &[Intent]) -> Result<usize, String> {
    let mut applied = 0;
    for intent in intents.iter().filter(|i| i.is_persistence()) {
        if let Err(e) = send_intent(intent).await {
            tracing::warn!(error = %e, applied, "failed to persist map change");
            return Err(e);
        }
        applied += 1;
    }
    Ok(applied)
}
