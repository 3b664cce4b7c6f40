//! Typed records for the collections held in the record store.
//!
//! Every collection has exactly one model here, and every model owns its
//! store-boundary validation (`from_document`). Documents that fail to
//! decode are skipped with a warning rather than aborting reads, so a live
//! subscription keeps rendering despite the occasional malformed record.

pub mod challenge;
pub mod onboarding;
pub mod transaction;
pub mod user;
