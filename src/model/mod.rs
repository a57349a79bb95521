//! Entity types: User, Hobby, Post
//!
//! Entities are decoded from storage records on the way out of a resolver
//! and flow through the execution engine as resolved parent objects.

mod entities;

pub use entities::{Entity, Hobby, Post, User};
pub(crate) use entities::fields;
