//! Common types and utilities for the yangbind generator.
//!
//! This crate provides foundational types used across all yangbind crates:
//! - Qualified names (`QName`, `QNameModule`)
//! - Identifier mapping from YANG identifiers to binding identifiers
//! - Centralized limits and thresholds

// Qualified names - (namespace, revision, local name) triples
pub mod qname;
pub use qname::{QName, QNameModule};

// Identifier mapping - camel case, packages, bijective escaping
pub mod mapping;

// Centralized limits and thresholds
pub mod limits;
