//! Reporting services
//!
//! - `musicbrainz`: WS/2 API client with rate limiting
//! - `mapping`: remote release/track records -> local placeholder items
//! - `reconcile`: pure MBID set reconciliation
//! - `report`: orchestration of the two reporting modes

pub mod mapping;
pub mod musicbrainz;
pub mod reconcile;
pub mod report;
