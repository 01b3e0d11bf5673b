//! # mbgap library interface
//!
//! Reports discrepancies between a local music library and MusicBrainz:
//! - Tracks missing from catalogued albums (declared track total vs items on hand)
//! - Albums missing from an artist's discography
//!
//! Reconciliation joins strictly on MusicBrainz identifiers (track MBID,
//! release-group MBID, artist MBID), never on names.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod query;
pub mod services;

pub use error::{Error, Result};
