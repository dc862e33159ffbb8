#![forbid(unsafe_code)]

//! Headless auto-layout for canvas documents.
//!
//! [`force`] holds the force-directed placement pass; [`LayoutController`] drives the
//! Manual/Auto mode switch, capturing a [`LayoutSnapshot`] on the way in and restoring it on
//! the way out.

pub mod controller;
pub mod error;
pub mod force;
pub mod snapshot;

pub use controller::{LayoutController, LayoutMode};
pub use error::{Error, Result};
pub use force::{ForceLayout, ForceLayoutOptions, force_directed};
pub use snapshot::LayoutSnapshot;
