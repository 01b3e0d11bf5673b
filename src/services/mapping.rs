//! Remote schema -> local schema field mapping
//!
//! Materializes placeholder items from MusicBrainz release and track
//! records. Best-effort: every field MusicBrainz can supply is mapped,
//! everything else stays unset (encoder, bitrate, sample rate, replay
//! gain and friends cannot be known for a file that isn't there).

use crate::db::items::Item;
use crate::services::musicbrainz::{MBArtistCredit, MBMedium, MBRelease, MBTrack};
use uuid::Uuid;

const VARIOUS_ARTISTS: &str = "Various Artists";

/// Join key for track reconciliation: the recording MBID when present,
/// the track MBID otherwise.
pub fn track_mbid(track: &MBTrack) -> &str {
    track
        .recording
        .as_ref()
        .map(|r| r.id.as_str())
        .unwrap_or(track.id.as_str())
}

/// Build a placeholder item for a track missing from a catalogued album
pub fn item_for_track(
    release: &MBRelease,
    medium: &MBMedium,
    track: &MBTrack,
    album_guid: Uuid,
) -> Item {
    let release_credit = release.artist_credit.as_deref();
    let track_credit = track
        .artist_credit
        .as_deref()
        .or_else(|| track.recording.as_ref().and_then(|r| r.artist_credit.as_deref()))
        .or(release_credit);

    let albumartist = credit_name(release_credit);
    let (year, month, day) = date_parts(release.date.as_deref());

    let mut item = Item::new(album_guid);
    item.album = release.title.clone();
    item.albumartist = albumartist.clone();
    item.albumartist_credit = credit_phrase(release_credit);
    item.albumartist_sort = credit_sort_name(release_credit);
    item.albumdisambig = release.disambiguation.clone();
    item.albumstatus = release.status.clone();
    item.albumtype = release
        .release_group
        .as_ref()
        .and_then(|rg| rg.primary_type.as_ref())
        .map(|t| t.to_lowercase());
    item.artist = credit_name(track_credit);
    item.artist_credit = credit_phrase(track_credit);
    item.artist_sort = credit_sort_name(track_credit);
    item.asin = release.asin.clone();
    item.catalognum = release
        .label_info
        .as_ref()
        .and_then(|li| li.first())
        .and_then(|li| li.catalog_number.clone());
    item.comp = Some(albumartist.as_deref() == Some(VARIOUS_ARTISTS));
    item.country = release.country.clone();
    item.disc = medium.position;
    item.disctitle = medium.title.clone();
    item.disctotal = release.media.as_ref().map(|m| m.len() as i64);
    item.label = release
        .label_info
        .as_ref()
        .and_then(|li| li.first())
        .and_then(|li| li.label.as_ref())
        .and_then(|l| l.name.clone());
    item.language = release
        .text_representation
        .as_ref()
        .and_then(|t| t.language.clone());
    item.length = track
        .length
        .or_else(|| track.recording.as_ref().and_then(|r| r.length))
        .map(|ms| ms as f64 / 1000.0);
    item.mb_albumid = Some(release.id.clone());
    item.mb_artistid = credit_artist_id(track_credit);
    item.mb_releasegroupid = release.release_group.as_ref().map(|rg| rg.id.clone());
    item.mb_trackid = Some(track_mbid(track).to_string());
    item.media = medium.format.clone();
    item.script = release
        .text_representation
        .as_ref()
        .and_then(|t| t.script.clone());
    item.title = track
        .title
        .clone()
        .or_else(|| track.recording.as_ref().and_then(|r| r.title.clone()));
    item.track = track.position;
    item.tracktotal = Some(release_track_total(release));
    item.year = year;
    item.month = month;
    item.day = day;

    item
}

/// Build a placeholder item for a release missing from an artist's
/// discography. Track-level fields stay unset.
pub fn item_for_release(release: &MBRelease) -> Item {
    let release_credit = release.artist_credit.as_deref();
    let group = release.release_group.as_ref();
    let group_credit = group.and_then(|rg| rg.artist_credit.as_deref()).or(release_credit);

    let albumartist = credit_name(group_credit);
    let (year, month, day) = date_parts(release.date.as_deref());

    let mut item = Item {
        guid: Uuid::new_v4(),
        ..Default::default()
    };
    item.album = group
        .and_then(|rg| rg.title.clone())
        .or_else(|| release.title.clone());
    item.albumartist = albumartist.clone();
    item.albumartist_credit = credit_phrase(group_credit);
    item.albumartist_sort = credit_sort_name(group_credit);
    item.albumdisambig = release.disambiguation.clone();
    item.albumstatus = release.status.clone();
    item.albumtype = group
        .and_then(|rg| rg.primary_type.as_ref())
        .map(|t| t.to_lowercase());
    item.albumsubtype = group
        .and_then(|rg| rg.secondary_types.as_ref())
        .and_then(|st| st.first())
        .map(|t| t.to_lowercase());
    item.artist = credit_name(release_credit);
    item.artist_credit = credit_phrase(release_credit);
    item.artist_sort = credit_sort_name(release_credit);
    item.asin = release.asin.clone();
    item.catalognum = release
        .label_info
        .as_ref()
        .and_then(|li| li.first())
        .and_then(|li| li.catalog_number.clone());
    item.comp = Some(albumartist.as_deref() == Some(VARIOUS_ARTISTS));
    item.country = release.country.clone();
    item.label = release
        .label_info
        .as_ref()
        .and_then(|li| li.first())
        .and_then(|li| li.label.as_ref())
        .and_then(|l| l.name.clone());
    item.language = release
        .text_representation
        .as_ref()
        .and_then(|t| t.language.clone());
    item.mb_albumid = Some(release.id.clone());
    item.mb_artistid = credit_artist_id(release_credit);
    item.mb_releasegroupid = group.map(|rg| rg.id.clone());
    item.media = release.packaging.clone();
    item.script = release
        .text_representation
        .as_ref()
        .and_then(|t| t.script.clone());
    item.year = year;
    item.month = month;
    item.day = day;

    item
}

/// Display name of the first credited artist
fn credit_name(credits: Option<&[MBArtistCredit]>) -> Option<String> {
    let first = credits.and_then(|c| c.first())?;
    first
        .artist
        .as_ref()
        .and_then(|a| a.name.clone())
        .or_else(|| first.name.clone())
}

/// Sort name of the first credited artist
fn credit_sort_name(credits: Option<&[MBArtistCredit]>) -> Option<String> {
    credits
        .and_then(|c| c.first())
        .and_then(|c| c.artist.as_ref())
        .and_then(|a| a.sort_name.clone())
}

/// MBID of the first credited artist
fn credit_artist_id(credits: Option<&[MBArtistCredit]>) -> Option<String> {
    credits
        .and_then(|c| c.first())
        .and_then(|c| c.artist.as_ref())
        .map(|a| a.id.clone())
}

/// Full credit phrase: credit names joined by their join phrases
/// ("Artist A feat. Artist B")
fn credit_phrase(credits: Option<&[MBArtistCredit]>) -> Option<String> {
    let credits = credits?;
    if credits.is_empty() {
        return None;
    }

    let mut phrase = String::new();
    for credit in credits {
        if let Some(name) = credit
            .name
            .as_deref()
            .or_else(|| credit.artist.as_ref().and_then(|a| a.name.as_deref()))
        {
            phrase.push_str(name);
        }
        if let Some(join) = credit.joinphrase.as_deref() {
            phrase.push_str(join);
        }
    }

    if phrase.is_empty() {
        None
    } else {
        Some(phrase)
    }
}

/// Total declared tracks across all media
fn release_track_total(release: &MBRelease) -> i64 {
    release
        .media
        .as_ref()
        .map(|media| {
            media
                .iter()
                .map(|m| {
                    m.track_count
                        .unwrap_or_else(|| m.tracks.as_ref().map(|t| t.len() as i64).unwrap_or(0))
                })
                .sum()
        })
        .unwrap_or(0)
}

/// Slice a release date into numeric (year, month, day)
///
/// Guarded by string length: year needs at least `YYYY`, month at least
/// `YYYY-MM`, day exactly `YYYY-MM-DD`. Malformed dates yield `None`
/// parts rather than errors.
fn date_parts(date: Option<&str>) -> (Option<i64>, Option<i64>, Option<i64>) {
    let Some(date) = date else {
        return (None, None, None);
    };

    let year = date.get(0..4).and_then(|s| s.parse().ok());
    let month = if date.len() >= 7 {
        date.get(5..7).and_then(|s| s.parse().ok())
    } else {
        None
    };
    let day = if date.len() == 10 {
        date.get(8..10).and_then(|s| s.parse().ok())
    } else {
        None
    };

    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parts_guards() {
        assert_eq!(date_parts(Some("1973-03-24")), (Some(1973), Some(3), Some(24)));
        assert_eq!(date_parts(Some("1973-03")), (Some(1973), Some(3), None));
        assert_eq!(date_parts(Some("1973")), (Some(1973), None, None));
        assert_eq!(date_parts(Some("19")), (None, None, None));
        assert_eq!(date_parts(Some("not-a-date")), (None, None, None));
        assert_eq!(date_parts(None), (None, None, None));
    }

    #[test]
    fn test_credit_phrase_with_join() {
        let credits: Vec<MBArtistCredit> = serde_json::from_str(
            r#"[
                {"name": "Artist A", "joinphrase": " feat. ", "artist": {"id": "a-1", "name": "Artist A"}},
                {"name": "Artist B", "artist": {"id": "a-2", "name": "Artist B"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            credit_phrase(Some(&credits)).as_deref(),
            Some("Artist A feat. Artist B")
        );
        assert_eq!(credit_name(Some(&credits)).as_deref(), Some("Artist A"));
        assert_eq!(credit_artist_id(Some(&credits)).as_deref(), Some("a-1"));
    }

    #[test]
    fn test_track_mbid_prefers_recording() {
        let track: MBTrack = serde_json::from_str(
            r#"{"id": "t-1", "recording": {"id": "rec-1"}}"#,
        )
        .unwrap();
        assert_eq!(track_mbid(&track), "rec-1");

        let bare: MBTrack = serde_json::from_str(r#"{"id": "t-2"}"#).unwrap();
        assert_eq!(track_mbid(&bare), "t-2");
    }
}
