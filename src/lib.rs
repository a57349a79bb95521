//! hobbygraph - a GraphQL API over users, hobbies and posts
//!
//! Layers, leaves first:
//! - `storage`: record store over three collections (memory or append-only file)
//! - `model`: typed entities decoded from records
//! - `schema`: type registry, root query/mutation assembly, resolvers
//! - `executor`: parses requests and resolves selection trees
//! - `api`, `http_server`, `cli`: ingress

pub mod api;
pub mod cli;
pub mod executor;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod schema;
pub mod storage;
