//! Interactive polygon annotation: click vertices over a background image (or
//! a reference grid), close the chain near its first vertex, tag the region.

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod mapper;
pub mod painter;
pub mod palette;
pub mod render;
pub mod session;
pub mod surface;
pub mod table;
pub mod tag;
pub mod upload;

pub use error::AnnotatorError;
pub use geometry::Point;
pub use session::{AnnotationSession, PlaceOutcome, Polygon, SessionState};
