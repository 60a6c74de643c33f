//! Roadmap generation: outline, then per-step enrichment
//!
//! Each completion is parsed with `parse_or`, so malformed content never
//! fails a generation. Transport and API failures do: for the outline they
//! abort the whole generation, for a step they only skip that step.

use super::fallback::{default_roadmap, placeholder_syllabus};
use crate::entities::{ExperienceLevel, Roadmap, RoadmapStep, StepDetails};
use crate::llm::{CompletionClient, CompletionRequest, LlmError, parse_or, prompts};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Models return either `{"steps": [...]}` or the bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum OutlineReply {
    Wrapped { steps: Vec<RoadmapStep> },
    Bare(Vec<RoadmapStep>),
}

impl OutlineReply {
    fn into_steps(self) -> Vec<RoadmapStep> {
        match self {
            OutlineReply::Wrapped { steps } | OutlineReply::Bare(steps) => steps,
        }
    }
}

/// Result of a full generation
#[derive(Debug, Clone)]
pub struct GeneratedRoadmap {
    pub roadmap: Roadmap,
    /// Steps whose enrichment request failed, in step order
    pub failed_steps: Vec<u32>,
}

pub struct RoadmapGenerator<'a> {
    client: &'a dyn CompletionClient,
}

impl<'a> RoadmapGenerator<'a> {
    pub fn new(client: &'a dyn CompletionClient) -> Self {
        Self { client }
    }

    /// One completion for the outline; unusable content becomes the default roadmap
    #[instrument(skip(self), fields(level = %level))]
    pub async fn generate_outline(
        &self,
        topic: &str,
        level: ExperienceLevel,
    ) -> Result<Roadmap, LlmError> {
        let request = CompletionRequest::prompt(
            prompts::ROADMAP_SYSTEM,
            prompts::roadmap_outline(topic, level),
        )
        .with_temperature(0.7)
        .with_max_tokens(2048);

        let raw = self.client.complete(request).await?;

        let steps = parse_or(&raw, || OutlineReply::Bare(Vec::new())).into_steps();
        if steps.is_empty() {
            warn!("Outline carried no steps, using default roadmap");
            return Ok(default_roadmap(topic, level));
        }

        let steps = normalize_steps(steps);
        debug!(steps = steps.len(), "Outline parsed");
        Ok(Roadmap {
            experience_level: level,
            topic: topic.to_string(),
            steps,
        })
    }

    /// One completion for one step; unusable content becomes the placeholder syllabus
    #[instrument(skip(self, roadmap, step), fields(step = step.step))]
    pub async fn enrich_step(
        &self,
        roadmap: &Roadmap,
        step: &RoadmapStep,
    ) -> Result<StepDetails, LlmError> {
        let request = CompletionRequest::prompt(
            prompts::ENRICH_SYSTEM,
            prompts::enrich_step(&roadmap.topic, roadmap.experience_level, step),
        )
        .with_temperature(0.7)
        .with_max_tokens(4096);

        let raw = self.client.complete(request).await?;

        let details = parse_or(&raw, || placeholder_syllabus(step));
        if details.chapters.is_empty() {
            warn!("Enrichment carried no chapters, using placeholder syllabus");
            return Ok(placeholder_syllabus(step));
        }
        Ok(details)
    }

    /// Outline followed by enrichment of every step, one request at a time
    #[instrument(skip(self), fields(level = %level))]
    pub async fn generate(
        &self,
        topic: &str,
        level: ExperienceLevel,
    ) -> Result<GeneratedRoadmap, LlmError> {
        let mut roadmap = self.generate_outline(topic, level).await?;
        let mut failed_steps = Vec::new();

        for index in 0..roadmap.steps.len() {
            let step = roadmap.steps[index].clone();
            match self.enrich_step(&roadmap, &step).await {
                Ok(details) => roadmap.steps[index].details = Some(details),
                Err(e) => {
                    warn!(step = step.step, "Enrichment failed, step left without details: {}", e);
                    failed_steps.push(step.step);
                }
            }
        }

        info!(
            steps = roadmap.steps.len(),
            failed = failed_steps.len(),
            "Roadmap generated"
        );
        Ok(GeneratedRoadmap {
            roadmap,
            failed_steps,
        })
    }
}

/// Keeps the model's order; renumbers 1..n when numbers are missing or
/// repeated and names untitled steps
fn normalize_steps(mut steps: Vec<RoadmapStep>) -> Vec<RoadmapStep> {
    let mut seen = HashSet::new();
    let numbering_ok = steps.iter().all(|s| s.step > 0 && seen.insert(s.step));

    for (index, step) in steps.iter_mut().enumerate() {
        if !numbering_ok {
            step.step = index as u32 + 1;
        }
        if step.title.trim().is_empty() {
            step.title = format!("Step {}", step.step);
        }
        // enrichment is always produced by this service
        step.details = None;
    }
    steps
}
