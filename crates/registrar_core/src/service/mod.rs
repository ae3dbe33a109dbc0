//! Core use-case services.
//!
//! # Responsibility
//! - Validate user input before it reaches the domain store.
//! - Keep UI/FFI layers decoupled from store and storage details.

pub mod catalog_service;
pub mod validation;
