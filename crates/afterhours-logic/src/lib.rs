//! Pure navigation and pursuit logic for AfterHours.
//!
//! This crate contains the agent AI that is independent of any ECS, engine,
//! or renderer. Functions take plain data and return results, making them
//! unit-testable and reusable from the simulation engine, the headless
//! harness, and benchmarks.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`astar`] | A* search over a room's walkability grid |
//! | [`behavior`] | Per-agent state machines for the five antagonist kinds |
//! | [`capture`] | Player/agent overlap outcomes and capture events |
//! | [`constants`] | Default tuning values (cell size, footprints, speeds) |
//! | [`direct`] | Sampling-based direct-path resolver with 8-way fallback |
//! | [`follow`] | Waypoint following, re-path policy, `PathProvider` seam |
//! | [`geometry`] | `Vec2`, `Rect`, `Facing` primitives |
//! | [`grid`] | Boolean walkability grid built from room obstacles |
//! | [`signals`] | Shared world resources read by the state machines |
//! | [`topology`] | Rooms, doorways, room routing, load-time validation |
//! | [`tuning`] | Per-kind tunable parameters (serde) |

pub mod astar;
pub mod behavior;
pub mod capture;
pub mod constants;
pub mod direct;
pub mod follow;
pub mod geometry;
pub mod grid;
pub mod signals;
pub mod topology;
pub mod tuning;
