//! Fixed structures substituted when a completion carries no usable JSON

use crate::entities::{Chapter, ExperienceLevel, Roadmap, RoadmapStep, Section, StepDetails};

/// Five generic steps for `topic`
pub fn default_roadmap(topic: &str, level: ExperienceLevel) -> Roadmap {
    let steps = vec![
        RoadmapStep::new(
            1,
            &format!("Fundamentals of {}", topic),
            &format!("Learn the vocabulary and core ideas behind {}.", topic),
            "book",
        ),
        RoadmapStep::new(
            2,
            "Core Concepts",
            &format!("Study the essential building blocks of {} in depth.", topic),
            "code",
        ),
        RoadmapStep::new(
            3,
            "Hands-on Practice",
            "Apply what you learned through small exercises and guided problems.",
            "database",
        ),
        RoadmapStep::new(
            4,
            "Advanced Topics",
            &format!("Explore advanced techniques and common pitfalls in {}.", topic),
            "rocket",
        ),
        RoadmapStep::new(
            5,
            "Capstone Project",
            "Build a complete project that ties every step together.",
            "trophy",
        ),
    ];

    Roadmap {
        experience_level: level,
        topic: topic.to_string(),
        steps,
    }
}

/// Two-chapter placeholder syllabus for one step
pub fn placeholder_syllabus(step: &RoadmapStep) -> StepDetails {
    StepDetails {
        chapters: vec![
            Chapter {
                title: format!("Introduction to {}", step.title),
                sections: vec![
                    Section {
                        title: "Overview".to_string(),
                        items: vec![
                            format!("What {} covers", step.title),
                            "Why it matters".to_string(),
                        ],
                    },
                    Section {
                        title: "Key Terms".to_string(),
                        items: vec!["Core definitions".to_string()],
                    },
                ],
            },
            Chapter {
                title: format!("Practicing {}", step.title),
                sections: vec![
                    Section {
                        title: "Exercises".to_string(),
                        items: vec![
                            "Guided exercises".to_string(),
                            "Self-check questions".to_string(),
                        ],
                    },
                    Section {
                        title: "Review".to_string(),
                        items: vec!["Summarize what you learned".to_string()],
                    },
                ],
            },
        ],
    }
}
