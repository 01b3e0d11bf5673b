//! Report orchestration
//!
//! Runs the two reporting modes over the library and the MusicBrainz
//! client. Failure policy during a run is skip-and-log: one bad album or
//! artist never aborts the report.

use crate::db::albums::{self, Album};
use crate::db::items;
use crate::format::render;
use crate::query::AlbumQuery;
use crate::services::mapping::{item_for_release, item_for_track};
use crate::services::musicbrainz::MusicBrainzClient;
use crate::services::reconcile::{missing_count, missing_releases, missing_tracks};
use anyhow::Result;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Report switches and templates, resolved from config + CLI
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Print per-album missing counts instead of placeholder records
    pub count: bool,
    /// Print a single aggregate total
    pub total: bool,
    /// Template for placeholder tracks
    pub format_item: String,
    /// Template for placeholder albums and count lines
    pub format_album: String,
    /// Release status filters for discography browsing
    pub release_status: Vec<String>,
    /// Release type filters for discography browsing
    pub release_type: Vec<String>,
}

/// Missing-metadata report over a library database and MusicBrainz
pub struct MissingReport {
    pool: SqlitePool,
    client: MusicBrainzClient,
}

impl MissingReport {
    pub fn new(pool: SqlitePool, client: MusicBrainzClient) -> Self {
        Self { pool, client }
    }

    /// Report tracks missing from each album matching the query
    ///
    /// Returns the output lines. Albums whose catalogued item count
    /// reaches the declared total are never looked up remotely.
    pub async fn missing_tracks(
        &self,
        query: &AlbumQuery,
        opts: &ReportOptions,
    ) -> Result<Vec<String>> {
        let albums = albums::list_albums(&self.pool, query).await?;
        let mut lines = Vec::new();

        if opts.total {
            let mut total = 0;
            for album in &albums {
                let on_hand = albums::item_count(&self.pool, album.guid).await?;
                total += missing_count(album.albumtotal, on_hand);
            }
            lines.push(total.to_string());
            return Ok(lines);
        }

        if opts.count {
            let template = format!("{}: $missing", opts.format_album);
            for album in &albums {
                let on_hand = albums::item_count(&self.pool, album.guid).await?;
                let missing = missing_count(album.albumtotal, on_hand);
                if missing != 0 {
                    lines.push(render(&template, |name| match name {
                        "missing" => Some(missing.to_string()),
                        _ => album.field(name),
                    }));
                }
            }
            return Ok(lines);
        }

        for album in &albums {
            for item in self.missing_items_for_album(album).await {
                lines.push(render(&opts.format_item, |name| item.field(name)));
            }
        }

        Ok(lines)
    }

    /// Placeholder items for the tracks missing from one album
    ///
    /// Empty when the album is complete, has no release MBID, or its
    /// remote lookup fails (skip-and-log).
    async fn missing_items_for_album(&self, album: &Album) -> Vec<items::Item> {
        let on_hand = match albums::item_count(&self.pool, album.guid).await {
            Ok(n) => n,
            Err(err) => {
                info!("Couldn't count items for album '{}': {}", album.album, err);
                return Vec::new();
            }
        };

        if on_hand >= album.albumtotal {
            return Vec::new();
        }

        let Some(release_mbid) = album.mb_albumid.as_deref().filter(|s| !s.is_empty()) else {
            info!(
                "No musicbrainz release ID for album '{}'; skipping",
                album.album
            );
            return Vec::new();
        };

        let local_mbids: HashSet<String> =
            match items::track_mbids_for_album(&self.pool, album.guid).await {
                Ok(mbids) => mbids.into_iter().collect(),
                Err(err) => {
                    info!("Couldn't load items for album '{}': {}", album.album, err);
                    return Vec::new();
                }
            };

        let release = match self.client.lookup_release(release_mbid).await {
            Ok(release) => release,
            Err(err) => {
                info!(
                    "Couldn't fetch release for album '{}' ({}) - '{}'",
                    album.album, release_mbid, err
                );
                return Vec::new();
            }
        };

        missing_tracks(&local_mbids, &release)
            .into_iter()
            .map(|(medium, track)| {
                debug!(
                    track_mbid = %track.id,
                    release_mbid = %release.id,
                    "Missing track"
                );
                item_for_track(&release, medium, track, album.guid)
            })
            .collect()
    }

    /// Report albums missing from each artist's discography
    ///
    /// Artists are derived by grouping the matching albums on
    /// (album artist, artist MBID); artists with no MBID are skipped.
    pub async fn missing_albums(
        &self,
        query: &AlbumQuery,
        opts: &ReportOptions,
    ) -> Result<Vec<String>> {
        let albums = albums::list_albums(&self.pool, query).await?;

        // Map each artist to their albums in the library
        let mut albums_by_artist: BTreeMap<(String, String), Vec<&Album>> = BTreeMap::new();
        for album in &albums {
            let artist = album.albumartist.clone().unwrap_or_default();
            let artist_mbid = album.mb_albumartistid.clone().unwrap_or_default();
            albums_by_artist
                .entry((artist, artist_mbid))
                .or_default()
                .push(album);
        }

        let mut lines = Vec::new();
        let mut total_missing = 0;

        for ((artist, artist_mbid), artist_albums) in &albums_by_artist {
            if artist_mbid.is_empty() {
                let named: Vec<String> = artist_albums
                    .iter()
                    .map(|a| format!("'{}'", a.album))
                    .collect();
                info!(
                    "No musicbrainz ID for artist '{}' found in album(s) {}; skipping",
                    artist,
                    named.join(", ")
                );
                continue;
            }

            let browsed = match self
                .client
                .browse_releases(artist_mbid, &opts.release_status, &opts.release_type)
                .await
            {
                Ok(releases) => releases,
                Err(err) => {
                    info!(
                        "Couldn't fetch info for artist '{}' ({}) - '{}'",
                        artist, artist_mbid, err
                    );
                    continue;
                }
            };

            let local_groups: HashSet<String> = artist_albums
                .iter()
                .filter_map(|a| a.mb_releasegroupid.clone())
                .collect();

            let missing = missing_releases(&local_groups, &browsed);
            total_missing += missing.len() as i64;

            if opts.total {
                continue;
            }

            for release in missing {
                let item = item_for_release(release);
                lines.push(render(&opts.format_album, |name| item.field(name)));
            }
        }

        if opts.total {
            lines.push(total_missing.to_string());
        }

        Ok(lines)
    }
}
