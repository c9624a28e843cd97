//! System prompts for the two workflows.

use courseforge_catalog::{CategoryRow, CourseRow};
use std::fmt::Write;

/// Persona and tool guidance for the chat assistant.
pub(crate) const CHAT_SYSTEM_PROMPT: &str = "\
You are the course catalog assistant for an online learning platform. \
Help learners discover courses, lessons and categories.

Guidelines:
- Use the provided tools to look up real catalog data before answering; \
never invent courses or lessons.
- When a tool returns no results, say so plainly and suggest broadening \
the search.
- Keep answers short and structured: course titles in bold, at most a \
handful of recommendations per reply.
- Do not mention the tools themselves to the user.";

/// Builds the grounded system prompt for single-shot course generation.
/// The existing catalog sample keeps generated categories and levels
/// consistent with what is already published.
pub(crate) fn generation_system_prompt(
    courses: &[CourseRow],
    categories: &[CategoryRow],
) -> String {
    let mut prompt = String::from(
        "You are a course designer for an online learning platform. \
         Given the user's request, design one complete course and create it \
         by calling the create_course_with_lessons tool.\n\n\
         You MUST call the create_course_with_lessons tool exactly once. \
         A textual description alone is not acceptable; nothing is created \
         unless the tool is invoked.\n",
    );

    if !categories.is_empty() {
        prompt.push_str("\nExisting categories (prefer one of these):\n");
        for category in categories {
            let _ = writeln!(prompt, "- {}", category.name);
        }
    }

    if !courses.is_empty() {
        prompt.push_str("\nA sample of existing courses, for tone and scope:\n");
        for course in courses {
            let _ = writeln!(
                prompt,
                "- {} ({}, {})",
                course.title, course.category, course.level
            );
        }
    }

    prompt.push_str(
        "\nRequirements for the new course:\n\
         - 3 to 8 lessons with realistic durations and content outlines.\n\
         - Concrete learning objectives.\n\
         - Level must match the request (default to beginner).\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courseforge_core::CourseLevel;

    fn course(title: &str) -> CourseRow {
        CourseRow {
            id: "c1".into(),
            title: title.into(),
            slug: "s".into(),
            description: String::new(),
            category: "Programming".into(),
            level: CourseLevel::Beginner,
            duration: String::new(),
            price: 0.0,
            status: "published".into(),
            rating: 0.0,
            enrollment_count: 0,
            tags: vec![],
            prerequisites: vec![],
            learning_objectives: vec![],
            thumbnail: String::new(),
            instructor_id: "i1".into(),
            ai_generated: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn generation_prompt_carries_catalog_context() {
        let categories = vec![CategoryRow {
            id: "cat1".into(),
            name: "Programming".into(),
            display_order: 1,
        }];
        let prompt = generation_system_prompt(&[course("Rust Fundamentals")], &categories);
        assert!(prompt.contains("create_course_with_lessons"));
        assert!(prompt.contains("Rust Fundamentals"));
        assert!(prompt.contains("- Programming"));
    }

    #[test]
    fn empty_catalog_still_demands_the_tool() {
        let prompt = generation_system_prompt(&[], &[]);
        assert!(prompt.contains("MUST call the create_course_with_lessons"));
        assert!(!prompt.contains("Existing categories"));
    }
}
