#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Metro gazetteer and city bubble consolidation.
//!
//! Groups raw location records into metro-area bubbles using a fixed
//! gazetteer of named metro centers with catchment radii. The default US
//! gazetteer (~85 metros) is embedded as TOML at compile time; products
//! can supply their own via [`gazetteer::parse_gazetteer_toml`].

pub mod consolidate;
pub mod gazetteer;

pub use consolidate::consolidate;
pub use gazetteer::{DEFAULT_CATCHMENT_RADIUS_MILES, Gazetteer, Metro};
