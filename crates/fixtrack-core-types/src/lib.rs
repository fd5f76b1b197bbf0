//! Core types shared across fixtrack facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! logging facility and by error reporting in every fixtrack crate.

pub mod schema;
