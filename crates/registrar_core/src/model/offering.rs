//! Course offering: one course paired with one course type.

use super::{timestamp_now, EntityId};
use crate::id::generate_id;
use serde::{Deserialize, Serialize};

/// Something a student can register for.
///
/// # Invariants
/// - No two offerings share the same `(course_id, course_type_id)` pair.
/// - Both references point at existing entities; cascades keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    pub id: EntityId,
    pub course_id: EntityId,
    pub course_type_id: EntityId,
    pub created_at: String,
}

impl CourseOffering {
    pub fn new(course_id: impl Into<EntityId>, course_type_id: impl Into<EntityId>) -> Self {
        Self {
            id: generate_id(),
            course_id: course_id.into(),
            course_type_id: course_type_id.into(),
            created_at: timestamp_now(),
        }
    }

    /// Returns a copy pointing at a new course/type pair.
    ///
    /// The offering id is unchanged, so registrations keep resolving.
    pub fn repointed(
        &self,
        course_id: impl Into<EntityId>,
        course_type_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            course_type_id: course_type_id.into(),
            ..self.clone()
        }
    }

    /// Returns whether this offering pairs exactly these two entities.
    pub fn pairs(&self, course_id: &str, course_type_id: &str) -> bool {
        self.course_id == course_id && self.course_type_id == course_type_id
    }
}
