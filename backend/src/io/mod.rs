//! # IO Layer
//!
//! Exposes the domain to the outside world: the REST API used by the app and
//! the background refresh that keeps the displayed prediction current.

pub mod refresh;
pub mod rest;
