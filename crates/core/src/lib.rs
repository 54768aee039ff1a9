//! fieldwork_core - Pure no_std decision logic for autonomous fieldwork
//!
//! This crate contains the platform-agnostic state machine that drives a
//! field vehicle along its work course, together with the course and
//! implement queries it depends on. Everything is testable on host.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Vehicle, path follower and alignment generator
//!   injected via traits
//! - **Fixed capacity**: Courses, events and parameters use `heapless`
//!
//! # Modules
//!
//! - [`course`]: Waypoints, courses and the main/secondary course split
//! - [`tool`]: Work tool abstraction, readiness and fill-level queries
//! - [`parameters`]: Parameter store and fieldwork parameter block
//! - [`fieldwork`]: Fieldwork driver state machine

#![no_std]

pub mod course;
pub mod fieldwork;
pub mod parameters;
pub mod tool;
