//! Trait definitions for typed CMDB access.
//!
//! A model implements [`CmdbObject`] to describe its table; [`Crud`] and
//! [`Metadata`] come for free through blanket implementations.

mod crud;
mod metadata;
mod object;

pub use crud::Crud;
pub use metadata::Metadata;
pub use object::CmdbObject;
