//! Fixed system prompts and user prompt builders

use crate::entities::{ExperienceLevel, RoadmapStep};

pub const ROADMAP_SYSTEM: &str = "You are an expert curriculum designer for computer science and \
software engineering. You build personalized learning roadmaps. Reply with JSON only, using \
exactly this shape: {\"steps\": [{\"step\": 1, \"title\": \"...\", \"description\": \"...\", \
\"icon\": \"...\"}]}. Produce between 5 and 8 steps ordered from first to last. The icon is a \
single lowercase keyword such as book, code, database, network, rocket or trophy.";

pub const ENRICH_SYSTEM: &str = "You are an expert teacher writing a detailed syllabus for one \
step of a learning roadmap. Reply with JSON only, using exactly this shape: {\"chapters\": \
[{\"title\": \"...\", \"sections\": [{\"title\": \"...\", \"items\": [\"...\"]}]}]}. Write 2 to \
5 chapters, each with 2 to 4 sections of concrete learning items.";

pub const DSA_PROBLEM_SYSTEM: &str = "You are a competitive programming coach. Create one \
original data structures and algorithms practice problem. Reply with JSON only, using exactly \
this shape: {\"title\": \"...\", \"difficulty\": \"easy|medium|hard\", \"statement\": \"...\", \
\"examples\": [{\"input\": \"...\", \"output\": \"...\", \"explanation\": \"...\"}], \
\"constraints\": [\"...\"], \"hints\": [\"...\"], \"starter_code\": \"...\"}.";

pub const CODE_REVIEW_SYSTEM: &str = "You are a senior engineer reviewing a solution to a data \
structures and algorithms problem. Judge correctness and efficiency. Reply with JSON only, using \
exactly this shape: {\"correct\": true, \"summary\": \"...\", \"time_complexity\": \"O(...)\", \
\"space_complexity\": \"O(...)\", \"issues\": [\"...\"], \"suggestions\": [\"...\"]}.";

pub const ASSISTANT_SYSTEM: &str = "You are ALGORITHMS, a friendly tutor for data structures, \
algorithms and interview preparation. Explain step by step, prefer small examples, and show code \
in fenced blocks when it helps. Do not hand out full solutions unless the student asks for one.";

pub fn roadmap_outline(topic: &str, level: ExperienceLevel) -> String {
    format!(
        "Create a learning roadmap for the topic \"{}\" for a learner at the {} level.",
        topic,
        level.as_str()
    )
}

pub fn enrich_step(topic: &str, level: ExperienceLevel, step: &RoadmapStep) -> String {
    format!(
        "Roadmap topic: \"{}\" ({} level).\nStep {}: {}\n{}\nWrite the detailed syllabus for this step.",
        topic,
        level.as_str(),
        step.step,
        step.title,
        step.description
    )
}

pub fn dsa_problem(topic: &str, difficulty: &str) -> String {
    format!(
        "Create a {} difficulty problem about {}. Include at least two examples.",
        difficulty, topic
    )
}

pub fn code_review(problem: &str, language: &str, code: &str) -> String {
    format!(
        "Problem:\n{}\n\nSolution language: {}\n\nSolution:\n```{}\n{}\n```",
        problem, language, language, code
    )
}
