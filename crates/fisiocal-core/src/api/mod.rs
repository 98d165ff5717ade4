//! REST API client module for the clinic backend.
//!
//! This module provides the `ApiClient` for fetching the student roster
//! (with each student's weekly schedules) and the physiotherapist list.
//!
//! Requests carry a bearer token when one is configured. Obtaining the
//! token is handled outside this application.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
