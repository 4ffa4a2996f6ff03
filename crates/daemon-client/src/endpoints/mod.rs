//! Capability trait implementations for [`HttpClient`](crate::HttpClient).
//!
//! One module per capability group. Each method validates its identifiers,
//! renders the route with [`Endpoint`](crate::Endpoint) and makes a single
//! call into the generic helpers.

mod daemon;
mod images;
mod instances;
mod policies;
mod projects;
mod storage;
