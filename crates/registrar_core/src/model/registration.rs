//! Student registration against a course offering.

use super::{timestamp_now, EntityId};
use crate::id::generate_id;
use serde::{Deserialize, Serialize};

/// One student enrolling in one offering.
///
/// Registrations are never deduplicated and never edited; the same student
/// may register for the same offering repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistration {
    pub id: EntityId,
    pub student_name: String,
    pub student_email: String,
    pub course_offering_id: EntityId,
    pub registered_at: String,
}

impl StudentRegistration {
    pub fn new(
        student_name: impl Into<String>,
        student_email: impl Into<String>,
        course_offering_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            id: generate_id(),
            student_name: student_name.into(),
            student_email: student_email.into(),
            course_offering_id: course_offering_id.into(),
            registered_at: timestamp_now(),
        }
    }
}
