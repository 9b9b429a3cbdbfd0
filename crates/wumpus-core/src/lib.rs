//! Grid, percept, and world primitives shared by the wumpus reasoner crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod cell;
pub mod grid_world;
pub mod world;

pub use action::{Action, ActionResult, Percept};
pub use cell::{Cell, Direction};
pub use grid_world::{grid_area, GridWorld, WorldError, WorldLayout, MAX_CELLS};
pub use world::World;
