//! # voxen-shared
//!
//! Types shared by every Voxen crate: identifier newtypes, the closed
//! role/status/kind enums with their display tables, the theme color triple,
//! and app-wide constants.

pub mod badges;
pub mod constants;
pub mod theme;
pub mod types;
