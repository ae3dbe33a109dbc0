//! The persisted unit: all four entity collections as one value.
//!
//! # Invariants
//! - All four collections are always serialized, empty or not.
//! - A payload missing any collection is malformed, not partially loaded.

use super::catalog::{Course, CourseType};
use super::offering::CourseOffering;
use super::registration::StudentRegistration;
use super::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Full catalog state, in insertion order per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub course_types: Vec<CourseType>,
    pub courses: Vec<Course>,
    pub course_offerings: Vec<CourseOffering>,
    pub student_registrations: Vec<StudentRegistration>,
}

/// A foreign key that points at an entity that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    OfferingCourse {
        offering_id: EntityId,
        course_id: EntityId,
    },
    OfferingCourseType {
        offering_id: EntityId,
        course_type_id: EntityId,
    },
    RegistrationOffering {
        registration_id: EntityId,
        course_offering_id: EntityId,
    },
}

impl Display for DanglingReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OfferingCourse {
                offering_id,
                course_id,
            } => write!(f, "offering {offering_id} references missing course {course_id}"),
            Self::OfferingCourseType {
                offering_id,
                course_type_id,
            } => write!(
                f,
                "offering {offering_id} references missing course type {course_type_id}"
            ),
            Self::RegistrationOffering {
                registration_id,
                course_offering_id,
            } => write!(
                f,
                "registration {registration_id} references missing offering {course_offering_id}"
            ),
        }
    }
}

impl Snapshot {
    /// Returns whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.course_types.is_empty()
            && self.courses.is_empty()
            && self.course_offerings.is_empty()
            && self.student_registrations.is_empty()
    }

    /// Lists every reference that cannot be resolved in this snapshot.
    ///
    /// Empty for any snapshot produced only through store operations.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let course_ids: HashSet<&str> = self.courses.iter().map(|c| c.id.as_str()).collect();
        let type_ids: HashSet<&str> = self.course_types.iter().map(|t| t.id.as_str()).collect();
        let offering_ids: HashSet<&str> = self
            .course_offerings
            .iter()
            .map(|o| o.id.as_str())
            .collect();

        let mut dangling = Vec::new();
        for offering in &self.course_offerings {
            if !course_ids.contains(offering.course_id.as_str()) {
                dangling.push(DanglingReference::OfferingCourse {
                    offering_id: offering.id.clone(),
                    course_id: offering.course_id.clone(),
                });
            }
            if !type_ids.contains(offering.course_type_id.as_str()) {
                dangling.push(DanglingReference::OfferingCourseType {
                    offering_id: offering.id.clone(),
                    course_type_id: offering.course_type_id.clone(),
                });
            }
        }
        for registration in &self.student_registrations {
            if !offering_ids.contains(registration.course_offering_id.as_str()) {
                dangling.push(DanglingReference::RegistrationOffering {
                    registration_id: registration.id.clone(),
                    course_offering_id: registration.course_offering_id.clone(),
                });
            }
        }
        dangling
    }
}
