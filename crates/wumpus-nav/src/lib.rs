//! Risk-weighted path planning on a 4-connected grid.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod field;
pub mod planner;

pub use field::{RiskField, RiskMap};
pub use planner::{GridPlanner, PlannerConfig};
