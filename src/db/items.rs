//! Item database operations
//!
//! An item is one catalogued track. The same record shape doubles as the
//! placeholder materialized for tracks/albums the library is missing;
//! fields that cannot be known from MusicBrainz alone (bitrate, format,
//! samplerate, replay gain, mtime) have no column here and stay unset.

use crate::format::format_length;
use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Item record (a single track, catalogued or placeholder)
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub guid: Uuid,
    pub album_id: Option<Uuid>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artist_sort: Option<String>,
    pub artist_credit: Option<String>,
    pub album: Option<String>,
    pub albumartist: Option<String>,
    pub albumartist_sort: Option<String>,
    pub albumartist_credit: Option<String>,
    pub albumdisambig: Option<String>,
    pub albumstatus: Option<String>,
    pub albumtype: Option<String>,
    pub albumsubtype: Option<String>,
    pub asin: Option<String>,
    pub catalognum: Option<String>,
    /// Compilation flag (album artist is "Various Artists")
    pub comp: Option<bool>,
    pub country: Option<String>,
    pub disc: Option<i64>,
    pub disctitle: Option<String>,
    pub disctotal: Option<i64>,
    pub label: Option<String>,
    pub language: Option<String>,
    /// Track length in seconds
    pub length: Option<f64>,
    pub media: Option<String>,
    pub mb_albumid: Option<String>,
    pub mb_artistid: Option<String>,
    pub mb_releasegroupid: Option<String>,
    pub mb_trackid: Option<String>,
    pub script: Option<String>,
    pub track: Option<i64>,
    pub tracktotal: Option<i64>,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
}

impl Item {
    pub fn new(album_id: Uuid) -> Self {
        Self {
            guid: Uuid::new_v4(),
            album_id: Some(album_id),
            ..Default::default()
        }
    }

    /// Resolve a format-template field against this item
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.guid.to_string()),
            "album_id" => self.album_id.map(|id| id.to_string()),
            "title" => self.title.clone(),
            "artist" => self.artist.clone(),
            "artist_sort" => self.artist_sort.clone(),
            "artist_credit" => self.artist_credit.clone(),
            "album" => self.album.clone(),
            "albumartist" => self.albumartist.clone(),
            "albumartist_sort" => self.albumartist_sort.clone(),
            "albumartist_credit" => self.albumartist_credit.clone(),
            "albumdisambig" => self.albumdisambig.clone(),
            "albumstatus" => self.albumstatus.clone(),
            "albumtype" => self.albumtype.clone(),
            "albumsubtype" => self.albumsubtype.clone(),
            "asin" => self.asin.clone(),
            "catalognum" => self.catalognum.clone(),
            "comp" => self.comp.map(|c| if c { "1" } else { "0" }.to_string()),
            "country" => self.country.clone(),
            "disc" => self.disc.map(|v| v.to_string()),
            "disctitle" => self.disctitle.clone(),
            "disctotal" => self.disctotal.map(|v| v.to_string()),
            "label" => self.label.clone(),
            "language" => self.language.clone(),
            "length" => self.length.map(format_length),
            "media" => self.media.clone(),
            "mb_albumid" => self.mb_albumid.clone(),
            "mb_artistid" => self.mb_artistid.clone(),
            "mb_releasegroupid" => self.mb_releasegroupid.clone(),
            "mb_trackid" => self.mb_trackid.clone(),
            "script" => self.script.clone(),
            "track" => self.track.map(|v| v.to_string()),
            "tracktotal" => self.tracktotal.map(|v| v.to_string()),
            "year" => self.year.map(|v| v.to_string()),
            "month" => self.month.map(|v| v.to_string()),
            "day" => self.day.map(|v| v.to_string()),
            _ => None,
        }
    }
}

/// Save item to database (upsert on guid)
pub async fn save_item(pool: &SqlitePool, item: &Item) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO items (
            guid, album_id, title, artist, artist_sort, artist_credit,
            album, albumartist, albumartist_sort, albumartist_credit,
            albumdisambig, albumstatus, albumtype, albumsubtype, asin,
            catalognum, comp, country, disc, disctitle, disctotal, label,
            language, length, media, mb_albumid, mb_artistid,
            mb_releasegroupid, mb_trackid, script, track, tracktotal,
            year, month, day, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(guid) DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            mb_trackid = excluded.mb_trackid,
            track = excluded.track,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(item.guid.to_string())
    .bind(item.album_id.map(|id| id.to_string()))
    .bind(&item.title)
    .bind(&item.artist)
    .bind(&item.artist_sort)
    .bind(&item.artist_credit)
    .bind(&item.album)
    .bind(&item.albumartist)
    .bind(&item.albumartist_sort)
    .bind(&item.albumartist_credit)
    .bind(&item.albumdisambig)
    .bind(&item.albumstatus)
    .bind(&item.albumtype)
    .bind(&item.albumsubtype)
    .bind(&item.asin)
    .bind(&item.catalognum)
    .bind(item.comp)
    .bind(&item.country)
    .bind(item.disc)
    .bind(&item.disctitle)
    .bind(item.disctotal)
    .bind(&item.label)
    .bind(&item.language)
    .bind(item.length)
    .bind(&item.media)
    .bind(&item.mb_albumid)
    .bind(&item.mb_artistid)
    .bind(&item.mb_releasegroupid)
    .bind(&item.mb_trackid)
    .bind(&item.script)
    .bind(item.track)
    .bind(item.tracktotal)
    .bind(item.year)
    .bind(item.month)
    .bind(item.day)
    .execute(pool)
    .await?;

    Ok(())
}

/// Track MBIDs of the items catalogued for an album
///
/// Items without a track MBID are excluded; they can never match a remote
/// track and would only inflate the local set.
pub async fn track_mbids_for_album(pool: &SqlitePool, album_guid: Uuid) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT mb_trackid FROM items WHERE album_id = ? AND mb_trackid IS NOT NULL",
    )
    .bind(album_guid.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.get("mb_trackid")).collect())
}

/// Load all items catalogued for an album, in track order
pub async fn items_for_album(pool: &SqlitePool, album_guid: Uuid) -> Result<Vec<Item>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, album_id, title, artist, artist_sort, artist_credit,
               album, albumartist, albumartist_sort, albumartist_credit,
               albumdisambig, albumstatus, albumtype, albumsubtype, asin,
               catalognum, comp, country, disc, disctitle, disctotal, label,
               language, length, media, mb_albumid, mb_artistid,
               mb_releasegroupid, mb_trackid, script, track, tracktotal,
               year, month, day
        FROM items
        WHERE album_id = ?
        ORDER BY disc, track
        "#,
    )
    .bind(album_guid.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|row| item_from_row(&row)).collect()
}

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Item> {
    let guid_str: String = row.get("guid");
    let album_id_str: Option<String> = row.get("album_id");

    Ok(Item {
        guid: Uuid::parse_str(&guid_str)?,
        album_id: album_id_str.map(|s| Uuid::parse_str(&s)).transpose()?,
        title: row.get("title"),
        artist: row.get("artist"),
        artist_sort: row.get("artist_sort"),
        artist_credit: row.get("artist_credit"),
        album: row.get("album"),
        albumartist: row.get("albumartist"),
        albumartist_sort: row.get("albumartist_sort"),
        albumartist_credit: row.get("albumartist_credit"),
        albumdisambig: row.get("albumdisambig"),
        albumstatus: row.get("albumstatus"),
        albumtype: row.get("albumtype"),
        albumsubtype: row.get("albumsubtype"),
        asin: row.get("asin"),
        catalognum: row.get("catalognum"),
        comp: row.get("comp"),
        country: row.get("country"),
        disc: row.get("disc"),
        disctitle: row.get("disctitle"),
        disctotal: row.get("disctotal"),
        label: row.get("label"),
        language: row.get("language"),
        length: row.get("length"),
        media: row.get("media"),
        mb_albumid: row.get("mb_albumid"),
        mb_artistid: row.get("mb_artistid"),
        mb_releasegroupid: row.get("mb_releasegroupid"),
        mb_trackid: row.get("mb_trackid"),
        script: row.get("script"),
        track: row.get("track"),
        tracktotal: row.get("tracktotal"),
        year: row.get("year"),
        month: row.get("month"),
        day: row.get("day"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::albums::{save_album, Album};

    #[tokio::test]
    async fn test_save_and_load_items() {
        let pool = crate::db::test_pool().await;

        let album = Album::new("Test Album".to_string(), 2);
        save_album(&pool, &album).await.unwrap();

        let mut item = Item::new(album.guid);
        item.title = Some("Track One".to_string());
        item.track = Some(1);
        item.mb_trackid = Some("recording-mbid-1".to_string());
        save_item(&pool, &item).await.expect("Failed to save item");

        let items = items_for_album(&pool, album.guid).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Track One"));
        assert_eq!(items[0].track, Some(1));

        let mbids = track_mbids_for_album(&pool, album.guid).await.unwrap();
        assert_eq!(mbids, vec!["recording-mbid-1"]);
    }

    #[tokio::test]
    async fn test_track_mbids_skip_untagged_items() {
        let pool = crate::db::test_pool().await;

        let album = Album::new("Untagged".to_string(), 2);
        save_album(&pool, &album).await.unwrap();

        let item = Item::new(album.guid);
        save_item(&pool, &item).await.unwrap();

        let mbids = track_mbids_for_album(&pool, album.guid).await.unwrap();
        assert!(mbids.is_empty());
    }

    #[test]
    fn test_field_lookup() {
        let mut item = Item::new(Uuid::new_v4());
        item.title = Some("Echoes".to_string());
        item.track = Some(1);
        item.comp = Some(false);
        item.length = Some(1412.0);

        assert_eq!(item.field("title").as_deref(), Some("Echoes"));
        assert_eq!(item.field("track").as_deref(), Some("1"));
        assert_eq!(item.field("comp").as_deref(), Some("0"));
        assert_eq!(item.field("length").as_deref(), Some("23:32"));
        assert_eq!(item.field("artist"), None);
        assert_eq!(item.field("no_such_field"), None);
    }
}
