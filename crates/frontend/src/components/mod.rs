pub mod help_overlay;
pub mod location_panel;
pub mod map_view;
pub mod travel_panel;
pub mod type_filter;
