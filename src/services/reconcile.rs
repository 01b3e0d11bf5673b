//! Set reconciliation between local and remote records
//!
//! Pure functions over MBID sets; no I/O. Joins are strict identifier
//! matches, never name comparisons.

use crate::services::mapping::track_mbid;
use crate::services::musicbrainz::{MBMedium, MBRelease, MBTrack};
use std::collections::HashSet;

/// Number of items missing from an album: declared track total minus
/// items on hand. Negative when the library holds more items than the
/// release declares (split tracks, bonus files); reported as-is.
pub fn missing_count(albumtotal: i64, item_count: i64) -> i64 {
    albumtotal - item_count
}

/// Remote tracks absent from the local track MBID set, in release order
pub fn missing_tracks<'a>(
    local_track_mbids: &HashSet<String>,
    release: &'a MBRelease,
) -> Vec<(&'a MBMedium, &'a MBTrack)> {
    let mut missing = Vec::new();

    if let Some(media) = &release.media {
        for medium in media {
            if let Some(tracks) = &medium.tracks {
                for track in tracks {
                    if !local_track_mbids.contains(track_mbid(track)) {
                        missing.push((medium, track));
                    }
                }
            }
        }
    }

    missing
}

/// Browsed releases whose release-group MBID matches no local album
///
/// A release without a release-group id can never be matched and is
/// therefore reported missing.
pub fn missing_releases<'a>(
    local_releasegroup_mbids: &HashSet<String>,
    releases: &'a [MBRelease],
) -> Vec<&'a MBRelease> {
    releases
        .iter()
        .filter(|release| {
            release
                .release_group
                .as_ref()
                .map(|rg| !local_releasegroup_mbids.contains(&rg.id))
                .unwrap_or(true)
        })
        .collect()
}
