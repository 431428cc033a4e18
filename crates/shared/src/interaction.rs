//! Pointer-driven interaction state machine for the map view.
//!
//! The host feeds raw pointer/wheel events in delivery order through
//! [`InteractionStateMachine::handle`]; the machine updates the viewport and
//! the in-memory world synchronously and returns [`Intent`]s for everything
//! that has to leave the core (persistence, selection, notices).

use tracing::{debug, info};

use crate::coords::{self, ImageFrame};
use crate::geometry::Position;
use crate::markers::TypeFilter;
use crate::models::{Location, LocationId, Road, RoadType, Waypoint};
use crate::viewport::ViewportController;
use crate::world::WorldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// Input events. Positions are container-relative screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    PointerDown { pos: Position, button: PointerButton },
    PointerMove { pos: Position },
    PointerUp { pos: Position },
    ContextMenu { pos: Position },
    Wheel { delta_y: f64 },
    StartRoad { location_id: LocationId, road_type: RoadType },
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    RoadCreationStarted,
    RoadCreationCancelled,
    RoadCompleted { name: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::RoadCreationStarted => write!(
                f,
                "Right-click to add waypoints, left-click to undo, click a location to finish"
            ),
            Notice::RoadCreationCancelled => write!(f, "Road creation cancelled"),
            Notice::RoadCompleted { name } => write!(f, "Road \"{}\" created", name),
        }
    }
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateLocation(Location),
    PersistLocation(Location),
    DeleteLocation(LocationId),
    CreateRoad(Road),
    /// A drag ended. The new position is only local until the author saves it.
    MarkerDropped {
        id: LocationId,
        from: Position,
        to: Position,
    },
    LocationSelected(LocationId),
    Notice(Notice),
}

impl Intent {
    /// True for intents that have to reach the location store.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Intent::CreateLocation(_)
                | Intent::PersistLocation(_)
                | Intent::DeleteLocation(_)
                | Intent::CreateRoad(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub marker_id: LocationId,
    pub initial_coordinates: Position,
    pub pointer_start: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadCreationSession {
    pub start_location: LocationId,
    pub road_type: RoadType,
    pub waypoints: Vec<Waypoint>,
    /// Live pointer position in image space, for the preview segment only.
    pub current_point: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning,
    DraggingMarker(DragSession),
    CreatingRoad(RoadCreationSession),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning => "panning",
            InteractionState::DraggingMarker(_) => "dragging-marker",
            InteractionState::CreatingRoad(_) => "creating-road",
        }
    }
}

/// Everything an event may read or mutate besides the machine itself.
pub struct MapContext<'a> {
    pub viewport: &'a mut ViewportController,
    pub frame: &'a ImageFrame,
    pub world: &'a mut WorldMap,
}

impl MapContext<'_> {
    fn to_image(&self, screen: Position) -> Option<Position> {
        coords::to_image_space(screen, self.viewport.viewport(), self.frame)
    }

    fn marker_at(&self, image: Position, visible: TypeFilter) -> Option<LocationId> {
        self.world.hit_test(image, visible).map(|l| l.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionStateMachine {
    state: InteractionState,
    edit_mode: bool,
    visible: TypeFilter,
}

impl InteractionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    pub fn visible_types(&self) -> TypeFilter {
        self.visible
    }

    pub fn set_visible_types(&mut self, visible: TypeFilter) {
        self.visible = visible;
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.state {
            InteractionState::DraggingMarker(session) => Some(session),
            _ => None,
        }
    }

    pub fn road_session(&self) -> Option<&RoadCreationSession> {
        match &self.state {
            InteractionState::CreatingRoad(session) => Some(session),
            _ => None,
        }
    }

    /// Points of the road being drawn: start, waypoints, then the live pointer.
    pub fn road_preview(&self, world: &WorldMap) -> Option<Vec<Position>> {
        let session = self.road_session()?;
        let start = world.location(session.start_location)?;
        let mut points = Vec::with_capacity(session.waypoints.len() + 2);
        points.push(start.coordinates);
        points.extend(session.waypoints.iter().map(Waypoint::position));
        points.extend(session.current_point);
        Some(points)
    }

    pub fn handle(&mut self, event: MapEvent, ctx: &mut MapContext<'_>) -> Vec<Intent> {
        let mut intents = Vec::new();
        let before = self.state.name();
        match event {
            MapEvent::PointerDown { pos, button } => self.pointer_down(pos, button, ctx, &mut intents),
            MapEvent::PointerMove { pos } => self.pointer_move(pos, ctx),
            MapEvent::PointerUp { .. } => self.pointer_up(ctx, &mut intents),
            MapEvent::ContextMenu { pos } => {
                if matches!(self.state, InteractionState::CreatingRoad(_)) {
                    self.road_click(pos, true, ctx, &mut intents);
                }
            }
            MapEvent::Wheel { delta_y } => {
                ctx.viewport.on_wheel(delta_y, ctx.frame.container_size());
            }
            MapEvent::StartRoad {
                location_id,
                road_type,
            } => self.start_road(location_id, road_type, ctx, &mut intents),
            MapEvent::Cancel => self.cancel(ctx, &mut intents),
        }
        let after = self.state.name();
        if before != after {
            debug!(from = before, to = after, "interaction state changed");
        }
        intents
    }

    fn pointer_down(
        &mut self,
        pos: Position,
        button: PointerButton,
        ctx: &mut MapContext<'_>,
        intents: &mut Vec<Intent>,
    ) {
        match self.state {
            InteractionState::CreatingRoad(_) => {
                // Right clicks arrive as ContextMenu
                if button == PointerButton::Primary {
                    self.road_click(pos, false, ctx, intents);
                }
            }
            InteractionState::Idle => {
                if button != PointerButton::Primary {
                    return;
                }
                let hit = ctx
                    .to_image(pos)
                    .and_then(|image| ctx.marker_at(image, self.visible));
                match hit {
                    Some(id) if self.edit_mode => {
                        let Some(location) = ctx.world.location(id) else {
                            return;
                        };
                        self.state = InteractionState::DraggingMarker(DragSession {
                            marker_id: id,
                            initial_coordinates: location.coordinates,
                            pointer_start: pos,
                        });
                    }
                    Some(id) => intents.push(Intent::LocationSelected(id)),
                    None => {
                        ctx.viewport.begin_pan(pos);
                        self.state = InteractionState::Panning;
                    }
                }
            }
            InteractionState::Panning | InteractionState::DraggingMarker(_) => {
                debug!(state = self.state.name(), "pointer down ignored");
            }
        }
    }

    fn pointer_move(&mut self, pos: Position, ctx: &mut MapContext<'_>) {
        match &mut self.state {
            InteractionState::Panning => {
                ctx.viewport.continue_pan(pos);
            }
            InteractionState::DraggingMarker(session) => {
                let Some(image) = ctx.to_image(pos) else {
                    return;
                };
                if let Some(location) = ctx.world.location_mut(session.marker_id) {
                    location.coordinates = image;
                }
            }
            InteractionState::CreatingRoad(session) => {
                if let Some(image) = ctx.to_image(pos) {
                    session.current_point = Some(image);
                }
            }
            InteractionState::Idle => {}
        }
    }

    fn pointer_up(&mut self, ctx: &mut MapContext<'_>, intents: &mut Vec<Intent>) {
        match std::mem::take(&mut self.state) {
            InteractionState::Panning => ctx.viewport.end_pan(),
            InteractionState::DraggingMarker(session) => {
                let Some(location) = ctx.world.location(session.marker_id) else {
                    return;
                };
                let to = location.coordinates;
                if to != session.initial_coordinates {
                    intents.push(Intent::MarkerDropped {
                        id: session.marker_id,
                        from: session.initial_coordinates,
                        to,
                    });
                }
                intents.push(Intent::LocationSelected(session.marker_id));
            }
            other => self.state = other,
        }
    }

    fn start_road(
        &mut self,
        location_id: LocationId,
        road_type: RoadType,
        ctx: &MapContext<'_>,
        intents: &mut Vec<Intent>,
    ) {
        if !self.is_idle() {
            debug!(state = self.state.name(), "start road ignored");
            return;
        }
        if ctx.world.location(location_id).is_none() {
            debug!(%location_id, "start road ignored: unknown location");
            return;
        }
        self.state = InteractionState::CreatingRoad(RoadCreationSession {
            start_location: location_id,
            road_type,
            waypoints: Vec::new(),
            current_point: None,
        });
        intents.push(Intent::Notice(Notice::RoadCreationStarted));
    }

    /// A click while drawing a road. `secondary` is a right click.
    fn road_click(
        &mut self,
        pos: Position,
        secondary: bool,
        ctx: &mut MapContext<'_>,
        intents: &mut Vec<Intent>,
    ) {
        let Some(start) = self.road_session().map(|s| s.start_location) else {
            return;
        };
        let Some(image) = ctx.to_image(pos) else {
            debug!("road click ignored: map image not ready");
            return;
        };

        match ctx.marker_at(image, self.visible) {
            Some(end) if end != start => self.complete_road(end, ctx, intents),
            Some(_) => debug!("click on the road's own start ignored"),
            None if secondary => {
                if let InteractionState::CreatingRoad(session) = &mut self.state {
                    session.waypoints.push(Waypoint::at(image));
                }
            }
            None => self.undo_waypoint_or_cancel(intents),
        }
    }

    fn undo_waypoint_or_cancel(&mut self, intents: &mut Vec<Intent>) {
        let InteractionState::CreatingRoad(session) = &mut self.state else {
            return;
        };
        if session.waypoints.pop().is_some() {
            return;
        }
        self.state = InteractionState::Idle;
        info!("road creation cancelled");
        intents.push(Intent::Notice(Notice::RoadCreationCancelled));
    }

    fn complete_road(&mut self, end_id: LocationId, ctx: &mut MapContext<'_>, intents: &mut Vec<Intent>) {
        let Some(session) = self.road_session() else {
            return;
        };
        let (Some(start), Some(end)) = (
            ctx.world.location(session.start_location),
            ctx.world.location(end_id),
        ) else {
            debug!("complete road ignored: endpoint missing");
            return;
        };
        let road = Road::between(start, end, session.road_type, session.waypoints.clone());

        intents.push(Intent::CreateRoad(road.clone()));
        for id in road.connected_locations {
            if let Some(location) = ctx.world.location_mut(id) {
                location.roads.push(road.id);
                intents.push(Intent::PersistLocation(location.clone()));
            }
        }
        info!(road = %road.id, name = %road.name, waypoints = road.waypoints.len(), "road created");
        intents.push(Intent::Notice(Notice::RoadCompleted {
            name: road.name.clone(),
        }));
        ctx.world.insert_road(road);
        self.state = InteractionState::Idle;
    }

    fn cancel(&mut self, ctx: &mut MapContext<'_>, intents: &mut Vec<Intent>) {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => {}
            InteractionState::Panning => ctx.viewport.end_pan(),
            InteractionState::DraggingMarker(session) => {
                if let Some(location) = ctx.world.location_mut(session.marker_id) {
                    location.coordinates = session.initial_coordinates;
                }
            }
            InteractionState::CreatingRoad(_) => {
                info!("road creation cancelled");
                intents.push(Intent::Notice(Notice::RoadCreationCancelled));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::to_screen_space;
    use crate::geometry::Size;
    use crate::models::LocationType;
    use uuid::Uuid;

    /// 100x100 image in a 1000x1000 container: 10 screen px per image px at
    /// zoom 1, no letterbox.
    struct Fixture {
        viewport: ViewportController,
        frame: ImageFrame,
        world: WorldMap,
        machine: InteractionStateMachine,
        a: LocationId,
        b: LocationId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = WorldMap::new(Uuid::new_v4());
            let a = world
                .add_location("Ashford", LocationType::City, Position::new(100.0, 100.0))
                .id;
            let b = world
                .add_location("Brindle", LocationType::City, Position::new(300.0, 100.0))
                .id;
            Fixture {
                viewport: ViewportController::default(),
                frame: ImageFrame::new(Size::new(1000.0, 1000.0), Size::new(1000.0, 1000.0)),
                world,
                machine: InteractionStateMachine::new(),
                a,
                b,
            }
        }

        fn send(&mut self, event: MapEvent) -> Vec<Intent> {
            let mut ctx = MapContext {
                viewport: &mut self.viewport,
                frame: &self.frame,
                world: &mut self.world,
            };
            self.machine.handle(event, &mut ctx)
        }

        fn screen(&self, x: f64, y: f64) -> Position {
            to_screen_space(Position::new(x, y), self.viewport.viewport(), &self.frame).unwrap()
        }

        fn left(&mut self, x: f64, y: f64) -> Vec<Intent> {
            let pos = self.screen(x, y);
            let mut intents = self.send(MapEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
            });
            intents.extend(self.send(MapEvent::PointerUp { pos }));
            intents
        }

        fn right(&mut self, x: f64, y: f64) -> Vec<Intent> {
            let pos = self.screen(x, y);
            let mut intents = self.send(MapEvent::PointerDown {
                pos,
                button: PointerButton::Secondary,
            });
            intents.extend(self.send(MapEvent::ContextMenu { pos }));
            intents
        }

        fn start_road(&mut self) -> Vec<Intent> {
            let a = self.a;
            self.send(MapEvent::StartRoad {
                location_id: a,
                road_type: RoadType::Major,
            })
        }

        fn waypoint_count(&self) -> usize {
            self.machine.road_session().map(|s| s.waypoints.len()).unwrap()
        }
    }

    #[test]
    fn test_pan_on_empty_space() {
        let mut f = Fixture::new();
        f.send(MapEvent::PointerDown {
            pos: Position::new(500.0, 500.0),
            button: PointerButton::Primary,
        });
        assert_eq!(f.machine.state(), &InteractionState::Panning);
        f.send(MapEvent::PointerMove { pos: Position::new(520.0, 490.0) });
        f.send(MapEvent::PointerMove { pos: Position::new(540.0, 470.0) });
        assert!(f.viewport.pan().approx_eq(Position::new(40.0, -30.0), 1e-9));
        f.send(MapEvent::PointerUp { pos: Position::new(540.0, 470.0) });
        assert!(f.machine.is_idle());
        assert!(!f.viewport.is_panning());
    }

    #[test]
    fn test_secondary_button_does_not_pan() {
        let mut f = Fixture::new();
        f.send(MapEvent::PointerDown {
            pos: Position::new(500.0, 500.0),
            button: PointerButton::Secondary,
        });
        assert!(f.machine.is_idle());
    }

    #[test]
    fn test_marker_click_outside_edit_mode_selects() {
        let mut f = Fixture::new();
        let a = f.a;
        let intents = f.left(100.0, 100.0);
        assert_eq!(intents, vec![Intent::LocationSelected(a)]);
        assert!(f.machine.is_idle());
        assert_eq!(f.viewport.pan(), Position::ZERO);
    }

    #[test]
    fn test_drag_marker_in_edit_mode() {
        let mut f = Fixture::new();
        f.machine.set_edit_mode(true);
        let a = f.a;
        let down = f.screen(100.0, 100.0);
        f.send(MapEvent::PointerDown {
            pos: down,
            button: PointerButton::Primary,
        });
        let session = *f.machine.drag_session().unwrap();
        assert_eq!(session.marker_id, a);
        assert_eq!(session.initial_coordinates, Position::new(100.0, 100.0));
        assert_eq!(session.pointer_start, down);

        let to = f.screen(420.0, 570.0);
        f.send(MapEvent::PointerMove { pos: to });
        assert!(f.world.location(a).unwrap().coordinates.approx_eq(Position::new(420.0, 570.0), 1e-9));

        // Pointer down while dragging is ignored
        f.send(MapEvent::PointerDown {
            pos: to,
            button: PointerButton::Primary,
        });
        assert!(f.machine.drag_session().is_some());

        let intents = f.send(MapEvent::PointerUp { pos: to });
        assert!(f.machine.is_idle());
        assert!(matches!(
            intents[0],
            Intent::MarkerDropped { id, from, .. } if id == a && from == Position::new(100.0, 100.0)
        ));
        assert_eq!(intents[1], Intent::LocationSelected(a));
        // Dropping never persists on its own
        assert!(!intents.iter().any(|i| matches!(i, Intent::PersistLocation(_))));
    }

    #[test]
    fn test_drag_clamps_to_image_bounds() {
        let mut f = Fixture::new();
        f.machine.set_edit_mode(true);
        let a = f.a;
        let down = f.screen(100.0, 100.0);
        f.send(MapEvent::PointerDown {
            pos: down,
            button: PointerButton::Primary,
        });
        f.send(MapEvent::PointerMove { pos: Position::new(-500.0, 2000.0) });
        assert_eq!(f.world.location(a).unwrap().coordinates, Position::new(0.0, 1000.0));
    }

    #[test]
    fn test_cancel_drag_restores_coordinates() {
        let mut f = Fixture::new();
        f.machine.set_edit_mode(true);
        let a = f.a;
        let down = f.screen(100.0, 100.0);
        f.send(MapEvent::PointerDown {
            pos: down,
            button: PointerButton::Primary,
        });
        let moved = f.screen(600.0, 600.0);
        f.send(MapEvent::PointerMove { pos: moved });
        let intents = f.send(MapEvent::Cancel);
        assert!(intents.is_empty());
        assert!(f.machine.is_idle());
        assert_eq!(f.world.location(a).unwrap().coordinates, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_start_road_enters_creating_state() {
        let mut f = Fixture::new();
        let intents = f.start_road();
        assert_eq!(intents, vec![Intent::Notice(Notice::RoadCreationStarted)]);
        let session = f.machine.road_session().unwrap();
        assert_eq!(session.start_location, f.a);
        assert_eq!(session.road_type, RoadType::Major);
        assert!(session.waypoints.is_empty());
    }

    #[test]
    fn test_start_road_unknown_location_is_noop() {
        let mut f = Fixture::new();
        let intents = f.send(MapEvent::StartRoad {
            location_id: Uuid::new_v4(),
            road_type: RoadType::Path,
        });
        assert!(intents.is_empty());
        assert!(f.machine.is_idle());
    }

    #[test]
    fn test_road_pointer_move_updates_preview_only() {
        let mut f = Fixture::new();
        f.start_road();
        let pos = f.screen(550.0, 440.0);
        f.send(MapEvent::PointerMove { pos });
        let session = f.machine.road_session().unwrap();
        assert!(session.current_point.unwrap().approx_eq(Position::new(550.0, 440.0), 1e-9));
        assert!(f.world.roads().is_empty());

        f.right(200.0, 150.0);
        let preview = f.machine.road_preview(&f.world).unwrap();
        assert_eq!(preview.len(), 3);
        assert_eq!(preview[0], Position::new(100.0, 100.0));
        assert!(preview[1].approx_eq(Position::new(200.0, 150.0), 1e-9));
    }

    #[test]
    fn test_creating_road_disables_panning() {
        let mut f = Fixture::new();
        f.start_road();
        f.right(500.0, 500.0);
        f.send(MapEvent::PointerDown {
            pos: Position::new(700.0, 700.0),
            button: PointerButton::Primary,
        });
        f.send(MapEvent::PointerMove { pos: Position::new(800.0, 800.0) });
        assert_eq!(f.viewport.pan(), Position::ZERO);
        assert!(matches!(f.machine.state(), InteractionState::CreatingRoad(_)));
    }

    #[test]
    fn test_waypoint_undo_before_cancel() {
        let mut f = Fixture::new();
        f.start_road();
        f.right(500.0, 500.0);
        f.right(600.0, 700.0);
        assert_eq!(f.waypoint_count(), 2);

        assert!(f.left(800.0, 800.0).is_empty());
        assert_eq!(f.waypoint_count(), 1);
        assert!(f.left(800.0, 800.0).is_empty());
        assert_eq!(f.waypoint_count(), 0);
        assert!(matches!(f.machine.state(), InteractionState::CreatingRoad(_)));

        let intents = f.left(800.0, 800.0);
        assert!(f.machine.is_idle());
        assert_eq!(intents, vec![Intent::Notice(Notice::RoadCreationCancelled)]);
        assert!(f.world.roads().is_empty());
    }

    #[test]
    fn test_undo_pops_most_recent_waypoint() {
        let mut f = Fixture::new();
        f.start_road();
        f.right(500.0, 500.0);
        f.right(600.0, 700.0);
        f.left(800.0, 800.0);
        let wp = f.machine.road_session().unwrap().waypoints[0];
        assert!(wp.position().approx_eq(Position::new(500.0, 500.0), 1e-9));
    }

    #[test]
    fn test_road_completion_scenario() {
        // (10,10) -> (20,15) -> (30,10) at ten times the size, so the waypoint
        // clears both City hit boxes
        let mut f = Fixture::new();
        let (a, b) = (f.a, f.b);
        f.start_road();
        f.right(200.0, 150.0);
        let intents = f.left(300.0, 100.0);

        assert!(f.machine.is_idle());
        assert_eq!(f.world.roads().len(), 1);
        let road = f.world.roads()[0].clone();
        assert_eq!(road.points.len(), 3);
        assert!(road.points[0].approx_eq(Position::new(100.0, 100.0), 1e-9));
        assert!(road.points[1].approx_eq(Position::new(200.0, 150.0), 1e-9));
        assert!(road.points[2].approx_eq(Position::new(300.0, 100.0), 1e-9));
        assert_eq!(road.waypoints.len(), 1);
        assert_eq!(road.connected_locations, [a, b]);
        assert_eq!(road.road_type, RoadType::Major);

        assert_eq!(f.world.location(a).unwrap().roads, vec![road.id]);
        assert_eq!(f.world.location(b).unwrap().roads, vec![road.id]);

        assert_eq!(intents[0], Intent::CreateRoad(road.clone()));
        let persisted: Vec<LocationId> = intents
            .iter()
            .filter_map(|i| match i {
                Intent::PersistLocation(l) => Some(l.id),
                _ => None,
            })
            .collect();
        assert_eq!(persisted, vec![a, b]);
        assert!(matches!(
            intents.last(),
            Some(Intent::Notice(Notice::RoadCompleted { name })) if name == "Ashford to Brindle"
        ));
    }

    #[test]
    fn test_right_click_on_marker_completes_road() {
        let mut f = Fixture::new();
        let b = f.b;
        f.start_road();
        f.right(300.0, 100.0);
        assert!(f.machine.is_idle());
        assert_eq!(f.world.roads()[0].connected_locations[1], b);
        assert_eq!(f.world.roads()[0].points.len(), 2);
    }

    #[test]
    fn test_click_on_start_location_is_ignored() {
        let mut f = Fixture::new();
        f.start_road();
        f.right(500.0, 500.0);
        let intents = f.left(100.0, 100.0);
        assert!(intents.is_empty());
        assert_eq!(f.waypoint_count(), 1);
        assert!(f.world.roads().is_empty());
    }

    #[test]
    fn test_cancel_road_discards_session() {
        let mut f = Fixture::new();
        f.start_road();
        f.right(500.0, 500.0);
        let intents = f.send(MapEvent::Cancel);
        assert_eq!(intents, vec![Intent::Notice(Notice::RoadCreationCancelled)]);
        assert!(f.machine.is_idle());
        assert!(f.world.roads().is_empty());
        assert!(f.world.location(f.a).unwrap().roads.is_empty());
    }

    #[test]
    fn test_cancel_while_panning_and_idle() {
        let mut f = Fixture::new();
        assert!(f.send(MapEvent::Cancel).is_empty());
        f.send(MapEvent::PointerDown {
            pos: Position::new(500.0, 500.0),
            button: PointerButton::Primary,
        });
        f.send(MapEvent::Cancel);
        assert!(f.machine.is_idle());
        assert!(!f.viewport.is_panning());
    }

    #[test]
    fn test_complete_road_with_missing_start_is_noop() {
        let mut f = Fixture::new();
        let a = f.a;
        f.start_road();
        f.world.mark_for_deletion(a);
        f.world.take_pending_deletions();

        let intents = f.left(300.0, 100.0);
        assert!(intents.is_empty());
        assert!(matches!(f.machine.state(), InteractionState::CreatingRoad(_)));
        assert!(f.world.roads().is_empty());
        assert!(f.world.location(f.b).unwrap().roads.is_empty());
    }

    #[test]
    fn test_events_on_unloaded_image_do_not_panic() {
        let mut f = Fixture::new();
        f.frame = ImageFrame::new(Size::new(0.0, 0.0), Size::new(1000.0, 1000.0));
        f.start_road();
        let pos = Position::new(300.0, 100.0);
        assert!(f.send(MapEvent::ContextMenu { pos }).is_empty());
        f.send(MapEvent::PointerMove { pos });
        assert!(f.machine.road_session().unwrap().current_point.is_none());
        assert!(f.machine.road_session().unwrap().waypoints.is_empty());
    }

    #[test]
    fn test_hidden_marker_cannot_end_road() {
        let mut f = Fixture::new();
        f.machine
            .set_visible_types(TypeFilter::all().without(LocationType::City));
        f.start_road();
        // B is hidden, so this is a click on empty space: cancels
        f.left(300.0, 100.0);
        assert!(f.machine.is_idle());
        assert!(f.world.roads().is_empty());
    }

    #[test]
    fn test_road_does_not_follow_dragged_endpoint() {
        // Known limitation: road points are captured at creation time
        let mut f = Fixture::new();
        let a = f.a;
        f.start_road();
        f.left(300.0, 100.0);

        f.machine.set_edit_mode(true);
        let down = f.screen(100.0, 100.0);
        f.send(MapEvent::PointerDown {
            pos: down,
            button: PointerButton::Primary,
        });
        let to = f.screen(150.0, 400.0);
        f.send(MapEvent::PointerMove { pos: to });
        f.send(MapEvent::PointerUp { pos: to });

        assert!(f.world.location(a).unwrap().coordinates.approx_eq(Position::new(150.0, 400.0), 1e-9));
        assert_eq!(f.world.roads()[0].points[0], Position::new(100.0, 100.0));
    }

    #[test]
    fn test_wheel_zooms_around_center() {
        let mut f = Fixture::new();
        f.send(MapEvent::Wheel { delta_y: -500.0 });
        assert!((f.viewport.zoom() - 1.5).abs() < 1e-9);
        // Container center stays over content point (500, 500)
        let content = (Position::new(500.0, 500.0) - f.viewport.pan()) / f.viewport.zoom();
        assert!(content.approx_eq(Position::new(500.0, 500.0), 1e-9));
    }

    #[test]
    fn test_hit_box_is_fixed_in_image_space() {
        // City hit box is 48 image px wide (half 24) at any zoom
        let mut f = Fixture::new();
        let a = f.a;
        assert_eq!(f.left(123.0, 100.0), vec![Intent::LocationSelected(a)]);
        assert!(f.left(125.0, 100.0).is_empty());

        f.viewport.set_zoom(2.5, Size::new(1000.0, 1000.0));
        assert_eq!(f.left(123.0, 100.0), vec![Intent::LocationSelected(a)]);
        assert!(f.left(125.0, 100.0).is_empty());
    }

    #[test]
    fn test_hit_box_ignores_base_scale() {
        // 2000x1000 artwork letterboxed into 800x600: 0.4 screen px per image px
        let mut f = Fixture::new();
        f.frame = ImageFrame::new(Size::new(2000.0, 1000.0), Size::new(800.0, 600.0));
        let c = f
            .world
            .add_location("Corvel", LocationType::City, Position::new(1000.0, 500.0))
            .id;
        assert!(f.left(1040.0, 500.0).is_empty());
        assert!(f.machine.is_idle());
        assert_eq!(f.left(1020.0, 500.0), vec![Intent::LocationSelected(c)]);
        assert_eq!(f.left(1000.0, 478.0), vec![Intent::LocationSelected(c)]);
        assert!(f.left(1000.0, 530.0).is_empty());
    }
}
