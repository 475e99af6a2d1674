//! `tg-core` — foundational types for the `rust_tg` tensegrity model framework.
//!
//! This crate is a dependency of every other `tg-*` crate.  It has no `tg-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `NodeId`                                              |
//! | [`vec3`]    | `Vec3`, Euclidean distance                            |
//! | [`tags`]    | `Tags` — descriptive labels carried by every node     |
//! | [`marker`]  | `Marker` — opaque point of interest on a body         |
//! | [`time`]    | `Step`, `StepClock`, `SimConfig`                      |
//! | [`error`]   | `TgError`, `TgResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod marker;
pub mod tags;
pub mod time;
pub mod vec3;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TgError, TgResult};
pub use ids::NodeId;
pub use marker::Marker;
pub use tags::Tags;
pub use time::{SimConfig, Step, StepClock};
pub use vec3::Vec3;
