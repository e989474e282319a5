//! HTTP API over the sample_mflix movies and comments collections.

pub mod app;
pub mod middleware;
