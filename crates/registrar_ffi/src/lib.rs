//! Flutter-facing bindings for the registration catalog.

pub mod api;
