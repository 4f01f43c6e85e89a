//! StreamAware: a streaming catalog with search, faceted filtering, favorites and profiles.
//!
//! The query engine in [`services::catalog_query`] is pure; everything that touches the hosted
//! document store or identity service goes through the traits in [`services::store`] and
//! [`services::auth`].

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
