//! # Builders
//!
//! This crate provides various builder modules that builds Bitcoin related
//! structures.

pub mod address;
pub mod script;
pub mod transaction;
