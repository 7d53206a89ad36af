//! Aberred sprite library.
//!
//! Sprites that draw frames from shared tile sheets, expose their state as
//! animatable properties and batch their draws per sheet. The ECS
//! components, resources and systems are exposed for integration tests and
//! reuse.

pub mod animation;
pub mod components;
pub mod error;
pub mod geometry;
pub mod nodeclone;
pub mod properties;
pub mod resources;
pub mod systems;
