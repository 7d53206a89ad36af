//! Sprite systems.
//!
//! Submodules overview
//! - [`node`] – link sprites to the entity that owns them
//! - [`render`] – submit sprites and sprite groups to their tile sheet batches
//! - [`time`] – update simulation time and delta
//! - [`tween`] – animate sprite properties over time

pub mod node;
pub mod render;
pub mod time;
pub mod tween;
