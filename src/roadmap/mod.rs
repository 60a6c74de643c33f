//! Roadmap Module - learning roadmap generation
//!
//! Outline and enrichment prompts go through the completion client; the
//! fixed fallbacks keep a generation useful when the model answers with
//! something that is not JSON.

pub mod fallback;
pub mod generator;

pub use fallback::{default_roadmap, placeholder_syllabus};
pub use generator::{GeneratedRoadmap, RoadmapGenerator};
