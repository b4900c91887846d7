//! Traits for external collaborators.

pub mod reference_index;
