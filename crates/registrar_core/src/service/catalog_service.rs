//! Catalog use-case service.
//!
//! # Responsibility
//! - Run the form-level validation rules, then delegate to the store.
//! - Turn "id not found" into explicit errors for UI callers.
//!
//! # Invariants
//! - No store mutation runs unless its validation passed.
//! - Offering updates re-check pair uniqueness here; the store never does.

use super::validation::{
    check_course_name, check_course_type_name, check_offering_pair, check_registration,
    CatalogError, CatalogResult, EntityKind,
};
use crate::model::catalog::{Course, CourseType};
use crate::model::offering::CourseOffering;
use crate::model::registration::StudentRegistration;
use crate::model::snapshot::Snapshot;
use crate::store::queries::DeletionImpact;
use crate::store::registration_store::{CascadeReport, Commit, RegistrationStore};
use crate::storage::SnapshotBackend;
use log::info;

/// Validating facade over a `RegistrationStore`.
pub struct CatalogService<B: SnapshotBackend> {
    store: RegistrationStore<B>,
}

impl<B: SnapshotBackend> CatalogService<B> {
    pub fn new(store: RegistrationStore<B>) -> Self {
        Self { store }
    }

    /// Opens a store over `backend` and wraps it.
    pub fn open(backend: B) -> Self {
        Self::new(RegistrationStore::open(backend))
    }

    pub fn store(&self) -> &RegistrationStore<B> {
        &self.store
    }

    pub fn into_store(self) -> RegistrationStore<B> {
        self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    pub fn create_course_type(&mut self, name: &str) -> CatalogResult<Commit<CourseType>> {
        let name = check_course_type_name(self.snapshot(), name, None)?;
        Ok(self.store.add_course_type(name))
    }

    pub fn rename_course_type(
        &mut self,
        id: &str,
        name: &str,
    ) -> CatalogResult<Commit<CourseType>> {
        self.require_course_type(id)?;
        let name = check_course_type_name(self.snapshot(), name, Some(id))?;
        let commit = self.store.update_course_type(id, name);
        let updated = self.require_course_type(id)?.clone();
        Ok(commit.map(|_| updated))
    }

    pub fn delete_course_type(&mut self, id: &str) -> CatalogResult<Commit<CascadeReport>> {
        self.require_course_type(id)?;
        let commit = self.store.delete_course_type(id);
        log_cascade("course_type", &commit.value);
        Ok(commit)
    }

    pub fn create_course(&mut self, name: &str) -> CatalogResult<Commit<Course>> {
        let name = check_course_name(self.snapshot(), name, None)?;
        Ok(self.store.add_course(name))
    }

    pub fn rename_course(&mut self, id: &str, name: &str) -> CatalogResult<Commit<Course>> {
        self.require_course(id)?;
        let name = check_course_name(self.snapshot(), name, Some(id))?;
        let commit = self.store.update_course(id, name);
        let updated = self.require_course(id)?.clone();
        Ok(commit.map(|_| updated))
    }

    pub fn delete_course(&mut self, id: &str) -> CatalogResult<Commit<CascadeReport>> {
        self.require_course(id)?;
        let commit = self.store.delete_course(id);
        log_cascade("course", &commit.value);
        Ok(commit)
    }

    pub fn create_offering(
        &mut self,
        course_id: &str,
        course_type_id: &str,
    ) -> CatalogResult<Commit<CourseOffering>> {
        check_offering_pair(self.snapshot(), course_id, course_type_id, None)?;
        Ok(self.store.add_course_offering(course_id, course_type_id))
    }

    pub fn update_offering(
        &mut self,
        id: &str,
        course_id: &str,
        course_type_id: &str,
    ) -> CatalogResult<Commit<CourseOffering>> {
        self.require_offering(id)?;
        check_offering_pair(self.snapshot(), course_id, course_type_id, Some(id))?;
        let commit = self
            .store
            .update_course_offering(id, course_id, course_type_id);
        let updated = self.require_offering(id)?.clone();
        Ok(commit.map(|_| updated))
    }

    pub fn delete_offering(&mut self, id: &str) -> CatalogResult<Commit<CascadeReport>> {
        self.require_offering(id)?;
        let commit = self.store.delete_course_offering(id);
        log_cascade("course_offering", &commit.value);
        Ok(commit)
    }

    pub fn register_student(
        &mut self,
        student_name: &str,
        student_email: &str,
        course_offering_id: &str,
    ) -> CatalogResult<Commit<StudentRegistration>> {
        let (name, email) = check_registration(
            self.snapshot(),
            student_name,
            student_email,
            course_offering_id,
        )?;
        Ok(self
            .store
            .add_student_registration(name, email, course_offering_id))
    }

    /// What deleting the course type would take with it.
    pub fn course_type_deletion_impact(&self, id: &str) -> CatalogResult<DeletionImpact> {
        self.require_course_type(id)?;
        Ok(self.store.course_type_deletion_impact(id))
    }

    pub fn course_deletion_impact(&self, id: &str) -> CatalogResult<DeletionImpact> {
        self.require_course(id)?;
        Ok(self.store.course_deletion_impact(id))
    }

    pub fn offering_deletion_impact(&self, id: &str) -> CatalogResult<DeletionImpact> {
        self.require_offering(id)?;
        Ok(self.store.offering_deletion_impact(id))
    }

    fn require_course_type(&self, id: &str) -> CatalogResult<&CourseType> {
        self.store
            .get_course_type_by_id(id)
            .ok_or_else(|| CatalogError::NotFound(EntityKind::CourseType, id.to_string()))
    }

    fn require_course(&self, id: &str) -> CatalogResult<&Course> {
        self.store
            .get_course_by_id(id)
            .ok_or_else(|| CatalogError::NotFound(EntityKind::Course, id.to_string()))
    }

    fn require_offering(&self, id: &str) -> CatalogResult<&CourseOffering> {
        self.store
            .get_course_offering_by_id(id)
            .ok_or_else(|| CatalogError::NotFound(EntityKind::CourseOffering, id.to_string()))
    }
}

fn log_cascade(target: &'static str, report: &CascadeReport) {
    info!(
        "event=catalog_delete module=service status=ok target={target} offerings_removed={} registrations_removed={}",
        report.removed_offering_ids.len(),
        report.removed_registration_ids.len()
    );
}
