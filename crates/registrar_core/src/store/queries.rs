//! Read-only lookups and derived views over a snapshot.
//!
//! # Responsibility
//! - Resolve foreign keys to entities for display.
//! - Preview what a cascading delete would remove, for confirmation prompts.
//!
//! Linear scans are intentional; catalogs hold tens to hundreds of rows.

use crate::model::catalog::{Course, CourseType};
use crate::model::offering::CourseOffering;
use crate::model::registration::StudentRegistration;
use crate::model::snapshot::Snapshot;
use crate::model::EntityId;
use std::collections::HashSet;

/// Label used when a referenced entity cannot be resolved.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub fn course_by_id<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a Course> {
    snapshot.courses.iter().find(|course| course.id == id)
}

pub fn course_type_by_id<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a CourseType> {
    snapshot.course_types.iter().find(|kind| kind.id == id)
}

pub fn course_offering_by_id<'a>(snapshot: &'a Snapshot, id: &str) -> Option<&'a CourseOffering> {
    snapshot
        .course_offerings
        .iter()
        .find(|offering| offering.id == id)
}

/// Formats an offering as `"{course type} - {course}"`.
///
/// Either side renders as `Unknown` when its entity is missing.
pub fn offering_display_name(snapshot: &Snapshot, offering: &CourseOffering) -> String {
    let kind = course_type_by_id(snapshot, &offering.course_type_id)
        .map_or(UNKNOWN_LABEL, |kind| kind.name.as_str());
    let course =
        course_by_id(snapshot, &offering.course_id).map_or(UNKNOWN_LABEL, |c| c.name.as_str());
    format!("{kind} - {course}")
}

/// Offerings delivered as `course_type_id`, in insertion order.
pub fn offerings_for_course_type<'a>(
    snapshot: &'a Snapshot,
    course_type_id: &str,
) -> Vec<&'a CourseOffering> {
    snapshot
        .course_offerings
        .iter()
        .filter(|offering| offering.course_type_id == course_type_id)
        .collect()
}

/// Registrations recorded against `offering_id`, in insertion order.
pub fn registrations_for_offering<'a>(
    snapshot: &'a Snapshot,
    offering_id: &str,
) -> Vec<&'a StudentRegistration> {
    snapshot
        .student_registrations
        .iter()
        .filter(|registration| registration.course_offering_id == offering_id)
        .collect()
}

/// Number of dependents a delete would remove alongside its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionImpact {
    pub offerings: usize,
    pub registrations: usize,
}

impl DeletionImpact {
    /// Returns whether the delete reaches beyond its own target.
    pub fn cascades(&self) -> bool {
        self.offerings > 0 || self.registrations > 0
    }
}

pub fn course_type_deletion_impact(snapshot: &Snapshot, course_type_id: &str) -> DeletionImpact {
    split_offerings(snapshot, |o| o.course_type_id == course_type_id).impact()
}

pub fn course_deletion_impact(snapshot: &Snapshot, course_id: &str) -> DeletionImpact {
    split_offerings(snapshot, |o| o.course_id == course_id).impact()
}

/// Impact of deleting one offering; `offerings` counts only dependents, so it is zero.
pub fn offering_deletion_impact(snapshot: &Snapshot, offering_id: &str) -> DeletionImpact {
    DeletionImpact {
        offerings: 0,
        registrations: registrations_for_offering(snapshot, offering_id).len(),
    }
}

/// Offerings and registrations partitioned by a removal predicate.
pub(crate) struct OfferingSplit {
    pub kept_offerings: Vec<CourseOffering>,
    pub kept_registrations: Vec<StudentRegistration>,
    pub removed_offering_ids: Vec<EntityId>,
    pub removed_registration_ids: Vec<EntityId>,
}

impl OfferingSplit {
    fn impact(&self) -> DeletionImpact {
        DeletionImpact {
            offerings: self.removed_offering_ids.len(),
            registrations: self.removed_registration_ids.len(),
        }
    }
}

/// Splits offerings by `doomed`, then drops every registration whose
/// offering was removed.
pub(crate) fn split_offerings(
    snapshot: &Snapshot,
    doomed: impl Fn(&CourseOffering) -> bool,
) -> OfferingSplit {
    let (removed, kept_offerings): (Vec<CourseOffering>, Vec<CourseOffering>) = snapshot
        .course_offerings
        .iter()
        .cloned()
        .partition(|offering| doomed(offering));
    let removed_offering_ids: Vec<EntityId> =
        removed.into_iter().map(|offering| offering.id).collect();

    let doomed_ids: HashSet<&str> = removed_offering_ids.iter().map(String::as_str).collect();
    let (removed_registrations, kept_registrations): (Vec<_>, Vec<_>) = snapshot
        .student_registrations
        .iter()
        .cloned()
        .partition(|registration| doomed_ids.contains(registration.course_offering_id.as_str()));

    OfferingSplit {
        kept_offerings,
        kept_registrations,
        removed_offering_ids,
        removed_registration_ids: removed_registrations
            .into_iter()
            .map(|registration| registration.id)
            .collect(),
    }
}
