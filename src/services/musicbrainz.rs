//! MusicBrainz API client
//!
//! Release lookup and per-artist release browsing against the WS/2 JSON
//! endpoints, with the 1 request/second rate limit MusicBrainz requires.

use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const USER_AGENT: &str = concat!("mbgap/", env!("CARGO_PKG_VERSION"), " (https://github.com/mbgap/mbgap)");
const RATE_LIMIT_MS: u64 = 1000; // 1 request per second
const BROWSE_PAGE_SIZE: i64 = 100;

/// Entities fetched with a release lookup; covers every field the
/// placeholder mapping reads.
const RELEASE_INCLUDES: &str = "recordings+artist-credits+release-groups+labels+media";

/// Entities fetched with a release browse (no per-track data needed).
const BROWSE_INCLUDES: &str = "release-groups+artist-credits+labels";

/// MusicBrainz client errors
#[derive(Debug, Error)]
pub enum MBError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Release not found: {0}")]
    ReleaseNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// MusicBrainz release
#[derive(Debug, Clone, Deserialize)]
pub struct MBRelease {
    /// Release MBID
    pub id: String,
    pub title: Option<String>,
    pub status: Option<String>,
    /// Release date, `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    pub date: Option<String>,
    pub country: Option<String>,
    pub asin: Option<String>,
    pub packaging: Option<String>,
    pub disambiguation: Option<String>,
    #[serde(rename = "text-representation")]
    pub text_representation: Option<MBTextRepresentation>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<MBArtistCredit>>,
    #[serde(rename = "release-group")]
    pub release_group: Option<MBReleaseGroup>,
    #[serde(rename = "label-info")]
    pub label_info: Option<Vec<MBLabelInfo>>,
    pub media: Option<Vec<MBMedium>>,
}

/// MusicBrainz release group
#[derive(Debug, Clone, Deserialize)]
pub struct MBReleaseGroup {
    /// Release-group MBID (join key for album reconciliation)
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "primary-type")]
    pub primary_type: Option<String>,
    #[serde(rename = "secondary-types")]
    pub secondary_types: Option<Vec<String>>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<MBArtistCredit>>,
}

/// One entry of an artist credit
#[derive(Debug, Clone, Deserialize)]
pub struct MBArtistCredit {
    /// Display name (may differ from artist.name for collaborations)
    pub name: Option<String>,
    /// Join phrase to the next credit (e.g. " feat. ")
    pub joinphrase: Option<String>,
    pub artist: Option<MBArtist>,
}

/// MusicBrainz artist
#[derive(Debug, Clone, Deserialize)]
pub struct MBArtist {
    /// Artist MBID
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "sort-name")]
    pub sort_name: Option<String>,
    pub disambiguation: Option<String>,
}

/// Label info entry (label + catalog number)
#[derive(Debug, Clone, Deserialize)]
pub struct MBLabelInfo {
    #[serde(rename = "catalog-number")]
    pub catalog_number: Option<String>,
    pub label: Option<MBLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MBLabel {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MBTextRepresentation {
    pub language: Option<String>,
    pub script: Option<String>,
}

/// One medium (disc) of a release
#[derive(Debug, Clone, Deserialize)]
pub struct MBMedium {
    pub position: Option<i64>,
    pub title: Option<String>,
    /// Medium format (CD, Vinyl, ...)
    pub format: Option<String>,
    #[serde(rename = "track-count")]
    pub track_count: Option<i64>,
    pub tracks: Option<Vec<MBTrack>>,
}

/// One track of a medium
#[derive(Debug, Clone, Deserialize)]
pub struct MBTrack {
    /// Track MBID (distinct from the recording MBID)
    pub id: String,
    pub position: Option<i64>,
    pub title: Option<String>,
    /// Track length in milliseconds
    pub length: Option<u64>,
    pub recording: Option<MBRecording>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<MBArtistCredit>>,
}

/// Recording behind a track
#[derive(Debug, Clone, Deserialize)]
pub struct MBRecording {
    /// Recording MBID (join key for track reconciliation)
    pub id: String,
    pub title: Option<String>,
    pub length: Option<u64>,
    #[serde(rename = "artist-credit")]
    pub artist_credit: Option<Vec<MBArtistCredit>>,
}

/// Paginated release browse response
#[derive(Debug, Deserialize)]
struct MBBrowseReleases {
    #[serde(rename = "release-count", default)]
    release_count: i64,
    #[serde(default)]
    releases: Vec<MBRelease>,
}

/// Rate limiter enforcing 1 request/second
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl MusicBrainzClient {
    pub fn new() -> Result<Self, MBError> {
        Self::with_base_url(MUSICBRAINZ_BASE_URL.to_string())
    }

    /// Client against an alternate base URL (mirrors, tests)
    pub fn with_base_url(base_url: String) -> Result<Self, MBError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
        })
    }

    /// Lookup a release by MBID, including its recordings
    pub async fn lookup_release(&self, mbid: &str) -> Result<MBRelease, MBError> {
        let url = format!(
            "{}/release/{}?inc={}&fmt=json",
            self.base_url, mbid, RELEASE_INCLUDES
        );

        tracing::debug!(mbid = %mbid, url = %url, "Querying MusicBrainz release");

        let body = self.get(&url).await.map_err(|e| match e {
            MBError::ReleaseNotFound(_) => MBError::ReleaseNotFound(mbid.to_string()),
            other => other,
        })?;

        let release: MBRelease =
            serde_json::from_str(&body).map_err(|e| MBError::ParseError(e.to_string()))?;

        tracing::debug!(
            mbid = %mbid,
            title = %release.title.as_deref().unwrap_or("?"),
            media = release.media.as_ref().map(|m| m.len()).unwrap_or(0),
            "Retrieved release from MusicBrainz"
        );

        Ok(release)
    }

    /// Browse all releases by an artist MBID, paginated
    ///
    /// `status` and `types` are optional release-status / release-type
    /// filters joined with `|` per the WS/2 browse syntax. Every page is
    /// rate-limited independently.
    pub async fn browse_releases(
        &self,
        artist_mbid: &str,
        status: &[String],
        types: &[String],
    ) -> Result<Vec<MBRelease>, MBError> {
        let mut releases = Vec::new();
        let mut offset: i64 = 0;

        loop {
            let mut url = format!(
                "{}/release?artist={}&inc={}&limit={}&offset={}&fmt=json",
                self.base_url, artist_mbid, BROWSE_INCLUDES, BROWSE_PAGE_SIZE, offset
            );
            if !status.is_empty() {
                url.push_str(&format!("&status={}", status.join("|")));
            }
            if !types.is_empty() {
                url.push_str(&format!("&type={}", types.join("|")));
            }

            tracing::debug!(artist_mbid = %artist_mbid, offset, url = %url, "Browsing MusicBrainz releases");

            let body = self.get(&url).await?;
            let page: MBBrowseReleases =
                serde_json::from_str(&body).map_err(|e| MBError::ParseError(e.to_string()))?;

            let fetched = page.releases.len() as i64;
            releases.extend(page.releases);
            offset += fetched;

            if fetched == 0 || offset >= page.release_count {
                break;
            }
        }

        tracing::info!(
            artist_mbid = %artist_mbid,
            releases = releases.len(),
            "Retrieved artist discography from MusicBrainz"
        );

        Ok(releases)
    }

    /// Rate-limited GET returning the response body
    async fn get(&self, url: &str) -> Result<String, MBError> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| MBError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(MBError::ReleaseNotFound(url.to_string()));
        }

        if status == 503 {
            return Err(MBError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MBError::ApiError(status.as_u16(), error_text));
        }

        response
            .text()
            .await
            .map_err(|e| MBError::NetworkError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MusicBrainzClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(200); // shortened for the test

        let start = Instant::now();
        limiter.wait().await;
        let first_elapsed = start.elapsed();

        limiter.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(100));
        assert!(second_elapsed >= Duration::from_millis(180));
    }

    #[test]
    fn test_release_deserialization() {
        let json = r#"{
            "id": "f5093c06-23e3-404f-aeaa-40f72885ee3a",
            "title": "Dark Side of the Moon",
            "status": "Official",
            "date": "1973-03-24",
            "country": "GB",
            "text-representation": {"language": "eng", "script": "Latn"},
            "release-group": {"id": "rg-1", "title": "The Dark Side of the Moon", "primary-type": "Album"},
            "media": [{"position": 1, "format": "CD", "track-count": 10, "tracks": [
                {"id": "t-1", "position": 1, "title": "Speak to Me", "length": 90000,
                 "recording": {"id": "rec-1", "title": "Speak to Me", "length": 90000}}
            ]}]
        }"#;

        let release: MBRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.status.as_deref(), Some("Official"));
        assert_eq!(release.release_group.as_ref().unwrap().id, "rg-1");
        let media = release.media.as_ref().unwrap();
        assert_eq!(media[0].track_count, Some(10));
        let track = &media[0].tracks.as_ref().unwrap()[0];
        assert_eq!(track.recording.as_ref().unwrap().id, "rec-1");
    }

    #[test]
    fn test_browse_page_deserialization() {
        let json = r#"{"release-count": 2, "release-offset": 0, "releases": [
            {"id": "r-1", "title": "A"}, {"id": "r-2", "title": "B"}
        ]}"#;

        let page: MBBrowseReleases = serde_json::from_str(json).unwrap();
        assert_eq!(page.release_count, 2);
        assert_eq!(page.releases.len(), 2);
        assert!(page.releases[0].media.is_none());
    }
}
