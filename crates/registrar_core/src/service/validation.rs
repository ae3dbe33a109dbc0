//! Input checks performed before any store mutation.
//!
//! # Invariants
//! - Catalog names are compared case-insensitively after trimming.
//! - An entity being updated never conflicts with itself.
//! - Checks run in a fixed order so the first failing rule is reported.

use crate::model::catalog::names_collide;
use crate::model::snapshot::Snapshot;
use crate::model::EntityId;
use crate::store::queries::{course_by_id, course_offering_by_id, course_type_by_id};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Entity kind named in user-facing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    CourseType,
    Course,
    CourseOffering,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::CourseType => "Course type",
            Self::Course => "Course",
            Self::CourseOffering => "Course offering",
        }
    }
}

/// Validation or lookup failure reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    MissingName(EntityKind),
    DuplicateName(EntityKind),
    MissingCourse,
    MissingCourseType,
    UnknownCourse(EntityId),
    UnknownCourseType(EntityId),
    DuplicateOffering,
    MissingStudentName,
    MissingStudentEmail,
    InvalidEmail,
    MissingOffering,
    UnknownOffering(EntityId),
    NotFound(EntityKind, EntityId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName(kind) => write!(f, "{} name is required", kind.label()),
            Self::DuplicateName(kind) => write!(f, "{} already exists", kind.label()),
            Self::MissingCourse => write!(f, "Please select a course"),
            Self::MissingCourseType => write!(f, "Please select a course type"),
            Self::UnknownCourse(id) => write!(f, "Selected course no longer exists: {id}"),
            Self::UnknownCourseType(id) => {
                write!(f, "Selected course type no longer exists: {id}")
            }
            Self::DuplicateOffering => write!(f, "This course offering already exists"),
            Self::MissingStudentName => write!(f, "Student name is required"),
            Self::MissingStudentEmail => write!(f, "Student email is required"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::MissingOffering => write!(f, "Please select a course offering"),
            Self::UnknownOffering(id) => {
                write!(f, "Selected course offering no longer exists: {id}")
            }
            Self::NotFound(kind, id) => write!(f, "{} not found: {id}", kind.label()),
        }
    }
}

impl Error for CatalogError {}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Checks a course type name and returns it trimmed.
pub fn check_course_type_name(
    snapshot: &Snapshot,
    name: &str,
    editing: Option<&str>,
) -> CatalogResult<String> {
    let existing = snapshot
        .course_types
        .iter()
        .map(|kind| (kind.id.as_str(), kind.name.as_str()));
    check_catalog_name(EntityKind::CourseType, existing, name, editing)
}

/// Checks a course name and returns it trimmed.
pub fn check_course_name(
    snapshot: &Snapshot,
    name: &str,
    editing: Option<&str>,
) -> CatalogResult<String> {
    let existing = snapshot
        .courses
        .iter()
        .map(|course| (course.id.as_str(), course.name.as_str()));
    check_catalog_name(EntityKind::Course, existing, name, editing)
}

fn check_catalog_name<'a>(
    kind: EntityKind,
    mut existing: impl Iterator<Item = (&'a str, &'a str)>,
    name: &str,
    editing: Option<&str>,
) -> CatalogResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::MissingName(kind));
    }
    let taken = existing
        .any(|(id, other)| Some(id) != editing && names_collide(other, trimmed));
    if taken {
        return Err(CatalogError::DuplicateName(kind));
    }
    Ok(trimmed.to_string())
}

/// Checks an offering's course/type selection against the snapshot.
pub fn check_offering_pair(
    snapshot: &Snapshot,
    course_id: &str,
    course_type_id: &str,
    editing: Option<&str>,
) -> CatalogResult<()> {
    if course_id.trim().is_empty() {
        return Err(CatalogError::MissingCourse);
    }
    if course_type_id.trim().is_empty() {
        return Err(CatalogError::MissingCourseType);
    }
    if course_by_id(snapshot, course_id).is_none() {
        return Err(CatalogError::UnknownCourse(course_id.to_string()));
    }
    if course_type_by_id(snapshot, course_type_id).is_none() {
        return Err(CatalogError::UnknownCourseType(course_type_id.to_string()));
    }
    let duplicate = snapshot.course_offerings.iter().any(|offering| {
        Some(offering.id.as_str()) != editing && offering.pairs(course_id, course_type_id)
    });
    if duplicate {
        return Err(CatalogError::DuplicateOffering);
    }
    Ok(())
}

/// Checks registration input and returns `(name, email)` trimmed.
///
/// The email shape is checked after trimming, so `" a@x.com "` is accepted
/// and stored as `"a@x.com"`.
pub fn check_registration(
    snapshot: &Snapshot,
    student_name: &str,
    student_email: &str,
    course_offering_id: &str,
) -> CatalogResult<(String, String)> {
    let name = student_name.trim();
    if name.is_empty() {
        return Err(CatalogError::MissingStudentName);
    }
    let email = student_email.trim();
    if email.is_empty() {
        return Err(CatalogError::MissingStudentEmail);
    }
    if !is_valid_email(email) {
        return Err(CatalogError::InvalidEmail);
    }
    if course_offering_id.trim().is_empty() {
        return Err(CatalogError::MissingOffering);
    }
    if course_offering_by_id(snapshot, course_offering_id).is_none() {
        return Err(CatalogError::UnknownOffering(course_offering_id.to_string()));
    }
    Ok((name.to_string(), email.to_string()))
}

/// Loose shape check: something@something.tld, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
