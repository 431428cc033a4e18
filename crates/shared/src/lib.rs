pub mod calc;
pub mod coords;
pub mod geometry;
pub mod interaction;
pub mod markers;
pub mod models;
pub mod store;
pub mod viewport;
pub mod world;
