//! Elevation raster download from OpenTopography
//!
//! The client never inspects raster content: a successful response is
//! passed through byte for byte.

pub mod client;
pub mod dataset;

pub use client::{classify_response, DemClient, DemRequest, Raster};
pub use dataset::{Dataset, Endpoint, DEFAULT_FALLBACK};
