//! In-memory catalog state with write-through persistence.
//!
//! # Responsibility
//! - Own the canonical snapshot for one running application.
//! - Apply mutations, including cascading deletes, as whole-snapshot swaps.
//! - Write every new snapshot through the backend and log the outcome.
//!
//! # Invariants
//! - No foreign key in the snapshot ever dangles after a store operation
//!   (given a caller that only references existing entities).
//! - Collections keep insertion order.
//! - A failed write never rolls back the in-memory state.
//! - The store trusts its caller; input validation lives in the service layer.

use super::queries::{self, split_offerings, DeletionImpact};
use crate::model::catalog::{Course, CourseType};
use crate::model::offering::CourseOffering;
use crate::model::registration::StudentRegistration;
use crate::model::snapshot::Snapshot;
use crate::model::EntityId;
use crate::storage::{LoadOutcome, SaveOutcome, SnapshotBackend};
use log::{debug, error, info, warn};

/// Value produced by a mutation plus what happened when persisting it.
#[derive(Debug)]
pub struct Commit<T> {
    pub value: T,
    pub save: SaveOutcome,
}

impl<T> Commit<T> {
    /// Transforms the value while keeping the save outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Commit<U> {
        Commit {
            value: f(self.value),
            save: self.save,
        }
    }
}

/// Ids removed by one delete, target included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Whether the target entity itself existed.
    pub removed: bool,
    pub removed_offering_ids: Vec<EntityId>,
    pub removed_registration_ids: Vec<EntityId>,
}

/// The domain store. One instance per running application.
pub struct RegistrationStore<B: SnapshotBackend> {
    backend: B,
    snapshot: Snapshot,
    persisted: bool,
    last_write_error: Option<String>,
}

impl<B: SnapshotBackend> RegistrationStore<B> {
    /// Loads the persisted snapshot (or the empty default) from `backend`.
    pub fn open(backend: B) -> Self {
        let outcome = backend.load();
        match &outcome {
            LoadOutcome::Loaded(_) | LoadOutcome::Missing => {
                info!(
                    "event=store_load module=store status={}",
                    outcome.status()
                );
            }
            LoadOutcome::Recovered { error, .. } => {
                warn!("event=store_load module=store status=recovered error={error}");
            }
        }

        let snapshot = outcome.into_snapshot();
        let dangling = snapshot.dangling_references();
        if !dangling.is_empty() {
            warn!(
                "event=store_integrity module=store status=dangling count={} first={}",
                dangling.len(),
                dangling[0]
            );
        }

        Self {
            backend,
            snapshot,
            persisted: true,
            last_write_error: None,
        }
    }

    /// Current state, read-only.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns whether the last write reached the backend.
    ///
    /// `false` means the persisted copy lags the in-memory state until the
    /// next successful write.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_write_error(&self) -> Option<&str> {
        self.last_write_error.as_deref()
    }

    pub fn add_course_type(&mut self, name: impl Into<String>) -> Commit<CourseType> {
        let course_type = CourseType::new(name);
        let mut next = self.snapshot.clone();
        next.course_types.push(course_type.clone());
        self.commit("add_course_type", next, course_type)
    }

    /// Renames a course type. Returns `false` (and changes nothing) when absent.
    pub fn update_course_type(&mut self, id: &str, name: impl Into<String>) -> Commit<bool> {
        let name = name.into();
        let mut found = false;
        let course_types = self
            .snapshot
            .course_types
            .iter()
            .map(|kind| {
                if kind.id == id {
                    found = true;
                    kind.renamed(name.as_str())
                } else {
                    kind.clone()
                }
            })
            .collect();
        let next = Snapshot {
            course_types,
            ..self.snapshot.clone()
        };
        self.commit("update_course_type", next, found)
    }

    /// Removes a course type, its offerings and their registrations.
    pub fn delete_course_type(&mut self, id: &str) -> Commit<CascadeReport> {
        let split = split_offerings(&self.snapshot, |o| o.course_type_id == id);
        let course_types: Vec<CourseType> = self
            .snapshot
            .course_types
            .iter()
            .filter(|kind| kind.id != id)
            .cloned()
            .collect();
        let report = CascadeReport {
            removed: course_types.len() != self.snapshot.course_types.len(),
            removed_offering_ids: split.removed_offering_ids,
            removed_registration_ids: split.removed_registration_ids,
        };
        let next = Snapshot {
            course_types,
            courses: self.snapshot.courses.clone(),
            course_offerings: split.kept_offerings,
            student_registrations: split.kept_registrations,
        };
        self.commit("delete_course_type", next, report)
    }

    pub fn add_course(&mut self, name: impl Into<String>) -> Commit<Course> {
        let course = Course::new(name);
        let mut next = self.snapshot.clone();
        next.courses.push(course.clone());
        self.commit("add_course", next, course)
    }

    /// Renames a course. Returns `false` (and changes nothing) when absent.
    pub fn update_course(&mut self, id: &str, name: impl Into<String>) -> Commit<bool> {
        let name = name.into();
        let mut found = false;
        let courses = self
            .snapshot
            .courses
            .iter()
            .map(|course| {
                if course.id == id {
                    found = true;
                    course.renamed(name.as_str())
                } else {
                    course.clone()
                }
            })
            .collect();
        let next = Snapshot {
            courses,
            ..self.snapshot.clone()
        };
        self.commit("update_course", next, found)
    }

    /// Removes a course, its offerings and their registrations.
    pub fn delete_course(&mut self, id: &str) -> Commit<CascadeReport> {
        let split = split_offerings(&self.snapshot, |o| o.course_id == id);
        let courses: Vec<Course> = self
            .snapshot
            .courses
            .iter()
            .filter(|course| course.id != id)
            .cloned()
            .collect();
        let report = CascadeReport {
            removed: courses.len() != self.snapshot.courses.len(),
            removed_offering_ids: split.removed_offering_ids,
            removed_registration_ids: split.removed_registration_ids,
        };
        let next = Snapshot {
            course_types: self.snapshot.course_types.clone(),
            courses,
            course_offerings: split.kept_offerings,
            student_registrations: split.kept_registrations,
        };
        self.commit("delete_course", next, report)
    }

    /// Appends an offering without checking existence or pair uniqueness.
    pub fn add_course_offering(
        &mut self,
        course_id: impl Into<EntityId>,
        course_type_id: impl Into<EntityId>,
    ) -> Commit<CourseOffering> {
        let offering = CourseOffering::new(course_id, course_type_id);
        let mut next = self.snapshot.clone();
        next.course_offerings.push(offering.clone());
        self.commit("add_course_offering", next, offering)
    }

    /// Repoints an offering at a new course/type pair.
    ///
    /// Registrations reference the offering id, which does not change, so
    /// nothing is orphaned.
    pub fn update_course_offering(
        &mut self,
        id: &str,
        course_id: &str,
        course_type_id: &str,
    ) -> Commit<bool> {
        let mut found = false;
        let course_offerings = self
            .snapshot
            .course_offerings
            .iter()
            .map(|offering| {
                if offering.id == id {
                    found = true;
                    offering.repointed(course_id, course_type_id)
                } else {
                    offering.clone()
                }
            })
            .collect();
        let next = Snapshot {
            course_offerings,
            ..self.snapshot.clone()
        };
        self.commit("update_course_offering", next, found)
    }

    /// Removes an offering and every registration against it.
    pub fn delete_course_offering(&mut self, id: &str) -> Commit<CascadeReport> {
        let split = split_offerings(&self.snapshot, |o| o.id == id);
        let report = CascadeReport {
            removed: !split.removed_offering_ids.is_empty(),
            removed_offering_ids: split.removed_offering_ids,
            removed_registration_ids: split.removed_registration_ids,
        };
        let next = Snapshot {
            course_types: self.snapshot.course_types.clone(),
            courses: self.snapshot.courses.clone(),
            course_offerings: split.kept_offerings,
            student_registrations: split.kept_registrations,
        };
        self.commit("delete_course_offering", next, report)
    }

    /// Appends a registration. Inputs are recorded verbatim.
    pub fn add_student_registration(
        &mut self,
        student_name: impl Into<String>,
        student_email: impl Into<String>,
        course_offering_id: impl Into<EntityId>,
    ) -> Commit<StudentRegistration> {
        let registration =
            StudentRegistration::new(student_name, student_email, course_offering_id);
        let mut next = self.snapshot.clone();
        next.student_registrations.push(registration.clone());
        self.commit("add_student_registration", next, registration)
    }

    pub fn get_course_by_id(&self, id: &str) -> Option<&Course> {
        queries::course_by_id(&self.snapshot, id)
    }

    pub fn get_course_type_by_id(&self, id: &str) -> Option<&CourseType> {
        queries::course_type_by_id(&self.snapshot, id)
    }

    pub fn get_course_offering_by_id(&self, id: &str) -> Option<&CourseOffering> {
        queries::course_offering_by_id(&self.snapshot, id)
    }

    pub fn offering_display_name(&self, offering: &CourseOffering) -> String {
        queries::offering_display_name(&self.snapshot, offering)
    }

    pub fn offerings_for_course_type(&self, course_type_id: &str) -> Vec<&CourseOffering> {
        queries::offerings_for_course_type(&self.snapshot, course_type_id)
    }

    pub fn registrations_for_offering(&self, offering_id: &str) -> Vec<&StudentRegistration> {
        queries::registrations_for_offering(&self.snapshot, offering_id)
    }

    pub fn course_type_deletion_impact(&self, id: &str) -> DeletionImpact {
        queries::course_type_deletion_impact(&self.snapshot, id)
    }

    pub fn course_deletion_impact(&self, id: &str) -> DeletionImpact {
        queries::course_deletion_impact(&self.snapshot, id)
    }

    pub fn offering_deletion_impact(&self, id: &str) -> DeletionImpact {
        queries::offering_deletion_impact(&self.snapshot, id)
    }

    fn commit<T>(&mut self, operation: &'static str, next: Snapshot, value: T) -> Commit<T> {
        let save = self.backend.save(&next);
        match &save {
            SaveOutcome::Saved => {
                debug!("event=store_commit module=store status=ok op={operation}");
            }
            SaveOutcome::WriteFailed(err) => {
                error!(
                    "event=store_commit module=store status=write_failed op={operation} error={err}"
                );
            }
        }
        self.persisted = save.is_saved();
        self.last_write_error = match &save {
            SaveOutcome::Saved => None,
            SaveOutcome::WriteFailed(err) => Some(err.to_string()),
        };
        self.snapshot = next;
        Commit { value, save }
    }
}
