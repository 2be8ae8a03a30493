//! # IO Module
//!
//! The adapter layer between HTTP clients and the domain. It owns request
//! parsing, the owner fallback for requests without an identity header, the
//! local clock, and the mapping of domain errors to responses.

pub mod clock;
pub mod rest;

pub use clock::{Clock, FixedClock, SystemClock};
