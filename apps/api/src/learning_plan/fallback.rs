//! The static curriculum served whenever generation is unavailable or fails.

use crate::learning_plan::models::{Lesson, PlanModule, PlanStructure};

/// Longest career goal (in characters) interpolated into the fallback text.
pub const GOAL_DISPLAY_LIMIT: usize = 30;
/// Used when the request carries no usable career goal.
pub const DEFAULT_GOAL: &str = "Software Developer";

/// Career goal as shown in fallback titles: trimmed, defaulted, truncated.
pub fn display_goal(career_goal: &str) -> String {
    let goal = career_goal.trim();
    if goal.is_empty() {
        return DEFAULT_GOAL.to_string();
    }
    goal.chars().take(GOAL_DISPLAY_LIMIT).collect()
}

/// Builds the fixed three-module plan for `career_goal`.
pub fn fallback_plan(career_goal: &str) -> PlanStructure {
    let goal = display_goal(career_goal);

    PlanStructure {
        title: format!("Personalized Learning Plan for {goal}"),
        summary: format!(
            "A comprehensive learning journey designed to help you transition into {goal}. \
             This plan is based on your current skills and career aspirations."
        ),
        modules: vec![
            module(
                "Foundation Skills",
                "Build the core fundamentals needed for your career transition",
                vec![
                    lesson(
                        "Programming Fundamentals",
                        "Learn basic programming concepts and problem-solving",
                        "120",
                        "beginner",
                        &["Video Lectures", "Interactive Exercises", "Coding Challenges"],
                    ),
                    lesson(
                        "Data Structures & Algorithms",
                        "Master essential data structures and algorithmic thinking",
                        "180",
                        "intermediate",
                        &["Online Course", "Practice Problems", "Code Reviews"],
                    ),
                ],
            ),
            module(
                "Core Technologies",
                "Master the specific technologies relevant to your career goal",
                vec![
                    lesson(
                        "Modern Web Development",
                        "Learn HTML, CSS, JavaScript and modern frameworks",
                        "240",
                        "intermediate",
                        &["Project-Based Learning", "Documentation", "Community Forums"],
                    ),
                    lesson(
                        "Backend Development",
                        "Build robust server-side applications and APIs",
                        "200",
                        "intermediate",
                        &["Hands-on Projects", "API Documentation", "Best Practices"],
                    ),
                ],
            ),
            module(
                "Advanced Concepts",
                "Dive deep into advanced topics and real-world applications",
                vec![
                    lesson(
                        "System Design",
                        "Learn to design scalable and efficient systems",
                        "300",
                        "advanced",
                        &["Case Studies", "Architecture Patterns", "System Design Interviews"],
                    ),
                    lesson(
                        "DevOps & Deployment",
                        "Master deployment, CI/CD, and infrastructure management",
                        "180",
                        "intermediate",
                        &["Cloud Platforms", "Automation Tools", "Best Practices"],
                    ),
                ],
            ),
        ],
        estimated_duration: Some("40 hours".to_string()),
        prerequisites: strings(&["Basic computer literacy", "Willingness to learn"]),
        learning_outcomes: strings(&[
            "Proficiency in modern programming languages",
            "Understanding of software development lifecycle",
            "Ability to build and deploy web applications",
            "Problem-solving and algorithmic thinking skills",
        ]),
    }
}

fn module(title: &str, description: &str, lessons: Vec<Lesson>) -> PlanModule {
    PlanModule {
        title: title.to_string(),
        description: description.to_string(),
        lessons,
    }
}

fn lesson(
    title: &str,
    description: &str,
    duration: &str,
    difficulty: &str,
    resources: &[&str],
) -> Lesson {
    Lesson {
        title: title.to_string(),
        description: description.to_string(),
        duration: duration.to_string(),
        difficulty: difficulty.to_string(),
        resources: strings(resources),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_interpolated_into_title_and_summary() {
        let plan = fallback_plan("Data Scientist");
        assert_eq!(plan.title, "Personalized Learning Plan for Data Scientist");
        assert!(plan.summary.contains("transition into Data Scientist."));
    }

    #[test]
    fn test_long_goal_truncated_to_limit() {
        let goal = "Principal Staff Distinguished Platform Reliability Engineer";
        let plan = fallback_plan(goal);
        let shown: String = goal.chars().take(GOAL_DISPLAY_LIMIT).collect();
        assert_eq!(plan.title, format!("Personalized Learning Plan for {shown}"));
        assert_eq!(display_goal(goal).chars().count(), GOAL_DISPLAY_LIMIT);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let goal = "Ingénieur logiciel spécialisé en systèmes embarqués";
        let shown = display_goal(goal);
        assert_eq!(shown.chars().count(), GOAL_DISPLAY_LIMIT);
        assert!(goal.starts_with(&shown));
    }

    #[test]
    fn test_blank_goal_uses_default() {
        assert_eq!(display_goal("   "), DEFAULT_GOAL);
        assert_eq!(
            fallback_plan("").title,
            "Personalized Learning Plan for Software Developer"
        );
    }

    #[test]
    fn test_fallback_shape() {
        let plan = fallback_plan("Anything");
        assert_eq!(plan.modules.len(), 3);
        assert!(plan.modules.iter().all(|m| m.lessons.len() == 2));
        assert_eq!(plan.lesson_count(), 6);
        assert_eq!(plan.estimated_duration.as_deref(), Some("40 hours"));
        assert_eq!(plan.learning_outcomes.len(), 4);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_plan("Game developer"), fallback_plan("Game developer"));
    }
}
