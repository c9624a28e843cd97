//! The SQLite store behind the catalog tools.
//!
//! One connection behind a mutex is enough here: every request performs a
//! handful of short interactive queries, and the write path is a single
//! course insert followed by one lesson transaction.

use chrono::{DateTime, Utc};
use courseforge_core::{CourseLevel, LessonKind};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::rows::{
    CategoryRow, CourseCounts, CourseFilter, CourseRow, LessonRow, NewCourse, NewLesson, UserRow,
};

const COURSE_COLUMNS: &str = "id, title, slug, description, category, level, duration, price, \
     status, rating, enrollment_count, tags, prerequisites, learning_objectives, thumbnail, \
     instructor_id, ai_generated, created_at";

const LESSON_COLUMNS: &str =
    "id, course_id, title, slug, description, lesson_type, duration, content, position, \
     is_free, created_at";

/// Handle to the catalog database. Cheap to clone.
#[derive(Clone)]
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Open (or create) the catalog at the given path.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| CatalogError::Open {
            reason: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    /// Fully in-memory catalog, used by tests and fixtures.
    pub fn in_memory() -> CatalogResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| CatalogError::Open {
            reason: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> CatalogResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                 id         TEXT PRIMARY KEY,
                 name       TEXT NOT NULL,
                 role       TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS categories (
                 id            TEXT PRIMARY KEY,
                 name          TEXT NOT NULL,
                 display_order INTEGER NOT NULL DEFAULT 0
             );
             CREATE TABLE IF NOT EXISTS courses (
                 id                  TEXT PRIMARY KEY,
                 title               TEXT NOT NULL,
                 slug                TEXT NOT NULL UNIQUE,
                 description         TEXT NOT NULL,
                 category            TEXT NOT NULL,
                 level               TEXT NOT NULL,
                 duration            TEXT NOT NULL DEFAULT '',
                 price               REAL NOT NULL DEFAULT 0,
                 status              TEXT NOT NULL DEFAULT 'draft',
                 rating              REAL NOT NULL DEFAULT 0,
                 enrollment_count    INTEGER NOT NULL DEFAULT 0,
                 tags                TEXT NOT NULL DEFAULT '[]',
                 prerequisites       TEXT NOT NULL DEFAULT '[]',
                 learning_objectives TEXT NOT NULL DEFAULT '[]',
                 thumbnail           TEXT NOT NULL DEFAULT '',
                 instructor_id       TEXT NOT NULL,
                 ai_generated        INTEGER NOT NULL DEFAULT 0,
                 created_at          TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS lessons (
                 id          TEXT PRIMARY KEY,
                 course_id   TEXT NOT NULL REFERENCES courses(id),
                 title       TEXT NOT NULL,
                 slug        TEXT NOT NULL UNIQUE,
                 description TEXT NOT NULL DEFAULT '',
                 lesson_type TEXT NOT NULL,
                 duration    TEXT NOT NULL DEFAULT '',
                 content     TEXT NOT NULL DEFAULT '',
                 position    INTEGER NOT NULL,
                 is_free     INTEGER NOT NULL DEFAULT 0,
                 created_at  TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_lessons_course ON lessons(course_id, position);",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Courses ordered by rating, then enrollment count, both descending.
    pub fn list_courses(&self, limit: u32) -> CatalogResult<Vec<CourseRow>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             ORDER BY rating DESC, enrollment_count DESC LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
            .query_map(params![limit as i64], raw_course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(decode_course).collect()
    }

    /// Filtered course search. All filter fields are optional and AND-ed;
    /// the free-text query matches title, description and category
    /// case-insensitively as a substring.
    pub fn search_courses(&self, filter: &CourseFilter) -> CatalogResult<Vec<CourseRow>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut bind: Vec<Value> = Vec::new();

        if let Some(query) = filter.query.as_deref() {
            let pattern = format!("%{}%", query.to_lowercase());
            clauses.push(
                "(LOWER(title) LIKE ? OR LOWER(description) LIKE ? OR LOWER(category) LIKE ?)",
            );
            bind.push(Value::Text(pattern.clone()));
            bind.push(Value::Text(pattern.clone()));
            bind.push(Value::Text(pattern));
        }
        if let Some(category) = filter.category.as_deref() {
            clauses.push("category = ?");
            bind.push(Value::Text(category.to_string()));
        }
        if let Some(level) = filter.level {
            clauses.push("level = ?");
            bind.push(Value::Text(level.as_str().to_string()));
        }

        let mut sql = format!("SELECT {COURSE_COLUMNS} FROM courses");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rating DESC, enrollment_count DESC LIMIT ?");
        bind.push(Value::Integer(filter.limit as i64));

        debug!(sql = %sql, "searching courses");

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
            .query_map(params_from_iter(bind), raw_course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(decode_course).collect()
    }

    /// Fetch one course by id.
    pub fn course(&self, id: &str) -> CatalogResult<Option<CourseRow>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1");
        let raw = conn
            .query_row(&sql, params![id], raw_course_from_row)
            .optional()?;
        raw.map(decode_course).transpose()
    }

    /// Lessons filtered by course and/or a case-insensitive substring over
    /// title and description, ordered by position.
    pub fn list_lessons(
        &self,
        course_id: Option<&str>,
        query: Option<&str>,
        limit: u32,
    ) -> CatalogResult<Vec<LessonRow>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut bind: Vec<Value> = Vec::new();

        if let Some(course_id) = course_id {
            clauses.push("course_id = ?");
            bind.push(Value::Text(course_id.to_string()));
        }
        if let Some(query) = query {
            let pattern = format!("%{}%", query.to_lowercase());
            clauses.push("(LOWER(title) LIKE ? OR LOWER(description) LIKE ?)");
            bind.push(Value::Text(pattern.clone()));
            bind.push(Value::Text(pattern));
        }

        let mut sql = format!("SELECT {LESSON_COLUMNS} FROM lessons");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY position ASC LIMIT ?");
        bind.push(Value::Integer(limit as i64));

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
            .query_map(params_from_iter(bind), raw_lesson_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(decode_lesson).collect()
    }

    /// All categories, ordered by their explicit display order, then name.
    pub fn list_categories(&self) -> CatalogResult<Vec<CategoryRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, display_order FROM categories ORDER BY display_order, name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CategoryRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    display_order: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Look up an instructor account by id. Non-instructor roles do not
    /// count.
    pub fn instructor(&self, id: &str) -> CatalogResult<Option<UserRow>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, name, role FROM users WHERE id = ?1 AND role = 'instructor'",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// All instructor accounts.
    pub fn instructors(&self) -> CatalogResult<Vec<UserRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, name, role FROM users WHERE role = 'instructor'")?;
        let rows = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert a course row and read it back. Returns `None` when the row
    /// cannot be read back after the insert.
    pub fn insert_course(&self, new: &NewCourse) -> CatalogResult<Option<CourseRow>> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO courses (id, title, slug, description, category, level, duration, \
                 price, status, rating, enrollment_count, tags, prerequisites, \
                 learning_objectives, thumbnail, instructor_id, ai_generated, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    id,
                    new.title,
                    new.slug,
                    new.description,
                    new.category,
                    new.level.as_str(),
                    new.duration,
                    new.price,
                    new.status,
                    serde_json::to_string(&new.tags)?,
                    serde_json::to_string(&new.prerequisites)?,
                    serde_json::to_string(&new.learning_objectives)?,
                    new.thumbnail,
                    new.instructor_id,
                    new.ai_generated as i64,
                    created_at,
                ],
            )?;
        }
        debug!(course_id = %id, slug = %new.slug, "inserted course");
        self.course(&id)
    }

    /// Insert all lessons in one transaction. The enclosing course row is
    /// deliberately not part of this transaction: a lesson failure leaves
    /// the committed course in place and is surfaced to the caller as a
    /// distinct stage failure.
    pub fn insert_lessons(&self, lessons: &[NewLesson]) -> CatalogResult<usize> {
        if lessons.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for lesson in lessons {
            tx.execute(
                "INSERT INTO lessons (id, course_id, title, slug, description, lesson_type, \
                 duration, content, position, is_free, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    Uuid::new_v4().to_string(),
                    lesson.course_id,
                    lesson.title,
                    lesson.slug,
                    lesson.description,
                    lesson.kind.as_str(),
                    lesson.duration,
                    lesson.content,
                    lesson.position,
                    lesson.is_free as i64,
                    Utc::now().to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(lessons.len())
    }

    /// Counts backing `GET /ai/stats`.
    pub fn course_counts(&self) -> CatalogResult<CourseCounts> {
        let conn = self.conn.lock().unwrap();
        let (total, ai_generated) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(ai_generated), 0) FROM courses",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(CourseCounts {
            total,
            ai_generated,
        })
    }

    pub fn insert_user(&self, user: &UserRow) -> CatalogResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, name, role) VALUES (?1, ?2, ?3)",
            params![user.id, user.name, user.role],
        )?;
        Ok(())
    }

    pub fn insert_category(&self, category: &CategoryRow) -> CatalogResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO categories (id, name, display_order) VALUES (?1, ?2, ?3)",
            params![category.id, category.name, category.display_order],
        )?;
        Ok(())
    }
}

// Raw row shapes: rusqlite closures must return rusqlite errors, so typed
// decoding (level/kind/JSON columns) happens in a second step.

struct RawCourse {
    id: String,
    title: String,
    slug: String,
    description: String,
    category: String,
    level: String,
    duration: String,
    price: f64,
    status: String,
    rating: f64,
    enrollment_count: i64,
    tags: String,
    prerequisites: String,
    learning_objectives: String,
    thumbnail: String,
    instructor_id: String,
    ai_generated: i64,
    created_at: String,
}

fn raw_course_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCourse> {
    Ok(RawCourse {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        level: row.get(5)?,
        duration: row.get(6)?,
        price: row.get(7)?,
        status: row.get(8)?,
        rating: row.get(9)?,
        enrollment_count: row.get(10)?,
        tags: row.get(11)?,
        prerequisites: row.get(12)?,
        learning_objectives: row.get(13)?,
        thumbnail: row.get(14)?,
        instructor_id: row.get(15)?,
        ai_generated: row.get(16)?,
        created_at: row.get(17)?,
    })
}

fn decode_course(raw: RawCourse) -> CatalogResult<CourseRow> {
    let level = CourseLevel::from_str(&raw.level)
        .ok_or_else(|| CatalogError::Corrupt(format!("unknown course level '{}'", raw.level)))?;
    Ok(CourseRow {
        id: raw.id,
        title: raw.title,
        slug: raw.slug,
        description: raw.description,
        category: raw.category,
        level,
        duration: raw.duration,
        price: raw.price,
        status: raw.status,
        rating: raw.rating,
        enrollment_count: raw.enrollment_count,
        tags: serde_json::from_str(&raw.tags)?,
        prerequisites: serde_json::from_str(&raw.prerequisites)?,
        learning_objectives: serde_json::from_str(&raw.learning_objectives)?,
        thumbnail: raw.thumbnail,
        instructor_id: raw.instructor_id,
        ai_generated: raw.ai_generated != 0,
        created_at: parse_timestamp(&raw.created_at)?,
    })
}

struct RawLesson {
    id: String,
    course_id: String,
    title: String,
    slug: String,
    description: String,
    lesson_type: String,
    duration: String,
    content: String,
    position: i64,
    is_free: i64,
    created_at: String,
}

fn raw_lesson_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLesson> {
    Ok(RawLesson {
        id: row.get(0)?,
        course_id: row.get(1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        lesson_type: row.get(5)?,
        duration: row.get(6)?,
        content: row.get(7)?,
        position: row.get(8)?,
        is_free: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn decode_lesson(raw: RawLesson) -> CatalogResult<LessonRow> {
    let kind = LessonKind::from_str(&raw.lesson_type).ok_or_else(|| {
        CatalogError::Corrupt(format!("unknown lesson type '{}'", raw.lesson_type))
    })?;
    Ok(LessonRow {
        id: raw.id,
        course_id: raw.course_id,
        title: raw.title,
        slug: raw.slug,
        description: raw.description,
        kind,
        duration: raw.duration,
        content: raw.content,
        position: raw.position,
        is_free: raw.is_free != 0,
        created_at: parse_timestamp(&raw.created_at)?,
    })
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
    })
}

fn parse_timestamp(value: &str) -> CatalogResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CatalogError::Corrupt(format!("bad timestamp '{value}': {e}")))
}
