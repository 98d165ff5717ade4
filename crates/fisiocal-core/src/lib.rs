//! Core library for fisiocal.
//!
//! This crate holds everything that does not depend on the terminal UI:
//!
//! - `models`: students, weekly slots, physiotherapists, calendar events
//! - `schedule`: the weekly schedule projector and its projection window
//! - `api`: REST client for the clinic backend
//! - `cache`: local JSON cache for the fetched roster
//! - `config`: application configuration and environment overrides

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod schedule;

pub use schedule::{project, ProjectionWindow, Projector};
