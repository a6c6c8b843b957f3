// This module style is chosen to keep all related files grouped in the same folder
// without introducing many files named "mod.rs".

#[path = "geometry/geometry.rs"]
pub mod geometry;

#[path = "program/program.rs"]
pub mod program;

#[path = "catalog/catalog.rs"]
pub mod catalog;

#[path = "circulation/circulation.rs"]
pub mod circulation;

#[path = "budget/budget.rs"]
pub mod budget;

#[path = "layout/layout.rs"]
pub mod layout;

#[path = "graph/graph.rs"]
pub mod graph;

#[path = "network/network.rs"]
pub mod network;

#[path = "pathfind/pathfind.rs"]
pub mod pathfind;

#[path = "synth/synth.rs"]
pub mod synth;

pub mod errors;
pub mod point;

pub use synth::{Synthesis, SynthesisRequest, SynthesisResult};
