use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::task::TaskRef;

/// Color assigned when a tag is created without one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

lazy_static! {
    // Hex color, "#RRGGBB".
    pub static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// A tag as stored and returned by the API.
///
/// Tags live in a single global namespace shared by all users; only the
/// task↔tag association is scoped through the task's owner.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(regex(path = "HEX_COLOR_REGEX", message = "color must match #RRGGBB"))]
    pub color: Option<String>,
}

/// Partial payload for updating a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct TagUpdateInput {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = "HEX_COLOR_REGEX", message = "color must match #RRGGBB"))]
    pub color: Option<String>,
}

/// Tag summary (`{id, name, color}`) embedded in task views.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct TagSummary {
    pub id: i32,
    pub name: String,
    pub color: String,
}

/// A tag together with the tasks it is attached to, association metadata
/// stripped.
#[derive(Debug, Serialize)]
pub struct TagWithTasks {
    #[serde(flatten)]
    pub tag: Tag,
    pub tasks: Vec<TaskRef>,
}
