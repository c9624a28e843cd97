//! Seeded catalog fixtures.

use courseforge_catalog::{CatalogStore, CategoryRow, NewCourse, UserRow};
use courseforge_core::{CourseLevel, unique_slug};
use serde_json::{Value, json};

/// In-memory catalog with two instructors, three categories and a few
/// published courses. Panics on store errors; fixtures run in tests only.
pub fn seeded_catalog() -> CatalogStore {
    let store = CatalogStore::in_memory().expect("in-memory store");

    for (id, name) in [("i1", "Ada Lovelace"), ("i2", "Grace Hopper")] {
        store
            .insert_user(&UserRow {
                id: id.into(),
                name: name.into(),
                role: "instructor".into(),
            })
            .expect("insert instructor");
    }

    for (id, name, ord) in [
        ("cat-prog", "Programming", 1),
        ("cat-web", "Web Development", 2),
        ("cat-data", "Databases", 3),
    ] {
        store
            .insert_category(&CategoryRow {
                id: id.into(),
                name: name.into(),
                display_order: ord,
            })
            .expect("insert category");
    }

    for (title, category, level) in [
        ("Rust Fundamentals", "Programming", CourseLevel::Beginner),
        ("HTTP Caching", "Web Development", CourseLevel::Intermediate),
        ("SQL Indexing", "Databases", CourseLevel::Advanced),
    ] {
        store
            .insert_course(&NewCourse {
                title: title.into(),
                slug: unique_slug(title),
                description: format!("{title}, from first principles"),
                category: category.into(),
                level,
                duration: "3 hours".into(),
                price: 0.0,
                status: "published".into(),
                tags: vec![],
                prerequisites: vec![],
                learning_objectives: vec![],
                thumbnail: "/thumbnails/abstract-01.jpg".into(),
                instructor_id: "i1".into(),
                ai_generated: false,
            })
            .expect("insert course");
    }

    store
}

/// Well-formed arguments for `create_course_with_lessons`, as the model
/// would emit them.
pub fn sample_course_args() -> Value {
    json!({
        "title": "HTTP Caching for Beginners",
        "description": "Cache-Control, ETags, CDNs and the browser cache",
        "category": "Web Development",
        "level": "beginner",
        "duration": "2 hours",
        "tags": ["http", "caching"],
        "learningObjectives": ["Read cache headers", "Configure a CDN"],
        "lessons": [
            {"title": "Why caches exist", "type": "video", "duration": "10 min"},
            {"title": "Cache-Control directives", "type": "text", "duration": "15 min"},
            {"title": "Validation with ETags", "type": "video", "duration": "12 min"},
            {"title": "Checkpoint quiz", "type": "quiz", "duration": "5 min"},
            {"title": "Configure a CDN", "type": "assignment", "duration": "20 min"}
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_internally_consistent() {
        let store = seeded_catalog();
        assert_eq!(store.instructors().unwrap().len(), 2);
        assert_eq!(store.list_categories().unwrap().len(), 3);
        assert_eq!(store.course_counts().unwrap().total, 3);
    }
}
