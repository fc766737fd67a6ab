//! # routines-domain
//!
//! Pure domain model for the daily-routines automation.
//!
//! ## Responsibilities
//! - Foundational types: host entity identifiers, timer handles, error conventions
//! - Parse host wake times into timezone-aware instants
//! - Derive the **preparation window** from a wake target and an offset
//! - Describe **subscriptions** (which entity changes trigger which reaction)
//! - Name the **extension actions** a dispatcher may support later
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod state;
pub mod subscription;
pub mod timer;
pub mod wake;
