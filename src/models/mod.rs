//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Bank account model and status enum
pub mod account;
/// Decimal <-> integer-cents conversion
pub mod money;
/// Transfer record model
pub mod transfer;
