//! Shared test fixtures for QuotientForge crates.
//!
//! This crate provides space sequences and problem descriptions for testing.
//! It depends only on `quotientforge-core`, so every other crate can use it
//! as a dev-dependency.
//!
//! - [`worlds`] - Nested unit-cube worlds, with and without walls
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! quotientforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use quotientforge_test::worlds::{open_world, wall_world};
//! ```

pub mod worlds;

pub use worlds::{blocked_world, open_world, wall_world, World};
