//! Career intelligence tasks.
//!
//! Each submodule is one task kind: its result records, its prompt and its fallback.
//! `service` bundles them behind `CareerServices`; `handlers` exposes them over HTTP.

pub mod handlers;
pub mod heatmap;
pub mod interview;
pub mod job_match;
pub mod prompts;
pub mod roadmap;
pub mod service;
pub mod simulation;
pub mod skills;
pub mod trajectory;
pub mod twin;

pub use service::CareerServices;
