//! Catalog entities: course types and courses.
//!
//! Both kinds share the same shape but live in independent name namespaces.

use super::{timestamp_now, EntityId};
use crate::id::generate_id;
use serde::{Deserialize, Serialize};

/// How a course is delivered, e.g. "Individual" or "Group".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseType {
    pub id: EntityId,
    /// Free-text label. Unique case-insensitively among course types.
    pub name: String,
    pub created_at: String,
}

impl CourseType {
    /// Creates a course type with a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            created_at: timestamp_now(),
        }
    }

    /// Returns a copy carrying `name`, keeping identity and timestamp.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// A subject being taught, e.g. "Hindi".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: EntityId,
    /// Free-text label. Unique case-insensitively among courses.
    pub name: String,
    pub created_at: String,
}

impl Course {
    /// Creates a course with a fresh id and the current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            created_at: timestamp_now(),
        }
    }

    /// Returns a copy carrying `name`, keeping identity and timestamp.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Compares two catalog names the way the uniqueness invariant does.
pub fn names_collide(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
