//! ECS resources made available to systems.
//!
//! Overview
//! - `spriteconfig` – sprite defaults loaded from an INI file
//! - `tilesheet` – shared atlas of frame strips and its draw batch
//! - `tilesheetstore` – loaded tile sheets keyed by string IDs
//! - `worldtime` – simulation time and delta
pub mod spriteconfig;
pub mod tilesheet;
pub mod tilesheetstore;
pub mod worldtime;
