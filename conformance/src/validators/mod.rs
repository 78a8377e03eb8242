//! Validators run over a completed metamodel.
//!
//! Each validator is a unit struct implementing
//! [`MetaModelValidator`](causeway_metamodel::MetaModelValidator); the order
//! they run in is fixed by [`default_validators`](crate::default_validators).

pub mod action;
pub mod layout;
pub mod logical_type;
pub mod members;
pub mod title;
