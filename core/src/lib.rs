//! Typed client for a namespaced counter service.
//!
//! # Overview
//! The service stores named integer counters grouped under a namespace and
//! supports create, get, increment, decrement and set. `CounterClient`
//! validates every response against a strict shape, folds failures into
//! `ApiError`, and keeps a local mirror of the last value the service
//! confirmed for each key it touched.
//!
//! # Design
//! - Network I/O happens behind the `Transport` trait. `UreqTransport` (the
//!   default `ureq` feature) is a ready-made blocking implementation.
//! - Each operation is also available as a pure `build_*` / `parse_*` pair
//!   for callers that run their own HTTP stack.
//! - The get/create response is a closed three-way union
//!   (`CounterResponse`) with no shared tag; see `types` for how it is
//!   discriminated.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mirror;
pub mod types;

pub use client::CounterClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ApiError, ErrorResponse};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use mirror::LocalMirror;
pub use types::{CounterResponse, CounterValue, MutationResponse};
