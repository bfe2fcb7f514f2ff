//! # WidgetCanvas Core
//!
//! Core types shared by the WidgetCanvas crates:
//! geometry primitives with typed coordinate spaces, widget identity,
//! presentation attributes, observer plumbing and the error hierarchy.

pub mod constants;
pub mod error;
pub mod events;
pub mod geometry;
pub mod identity;
pub mod preferences;
pub mod presentation;

pub use error::{
    DecodeError, Error, GroupingError, RepositoryError, Result, SelectionError,
};
pub use events::{Listeners, SubscriptionId};
pub use geometry::{
    snap_to_grid, CanvasFrame, CanvasSpace, CoordinateSpace, Frame, GroupLocalSpace, LocalFrame,
    Point, Rect, Size,
};
pub use identity::WidgetId;
pub use preferences::{InMemoryPreferences, PreferenceRepository};
pub use presentation::{Color, FontStyle};
