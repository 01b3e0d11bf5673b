//! Album database operations

use crate::query::AlbumQuery;
use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Album record (a catalogued release)
#[derive(Debug, Clone)]
pub struct Album {
    pub guid: Uuid,
    pub album: String,
    pub albumartist: Option<String>,
    pub albumartist_sort: Option<String>,
    pub albumartist_credit: Option<String>,
    pub mb_albumid: Option<String>,
    pub mb_albumartistid: Option<String>,
    pub mb_releasegroupid: Option<String>,
    /// Declared number of tracks on the release (from tags at import time)
    pub albumtotal: i64,
    pub year: Option<i64>,
}

impl Album {
    pub fn new(album: String, albumtotal: i64) -> Self {
        Self {
            guid: Uuid::new_v4(),
            album,
            albumartist: None,
            albumartist_sort: None,
            albumartist_credit: None,
            mb_albumid: None,
            mb_albumartistid: None,
            mb_releasegroupid: None,
            albumtotal,
            year: None,
        }
    }

    /// Resolve a format-template field against this album
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.guid.to_string()),
            "album" => Some(self.album.clone()),
            "albumartist" => self.albumartist.clone(),
            "albumartist_sort" => self.albumartist_sort.clone(),
            "albumartist_credit" => self.albumartist_credit.clone(),
            "mb_albumid" => self.mb_albumid.clone(),
            "mb_albumartistid" => self.mb_albumartistid.clone(),
            "mb_releasegroupid" => self.mb_releasegroupid.clone(),
            "albumtotal" => Some(self.albumtotal.to_string()),
            "year" => self.year.map(|y| y.to_string()),
            _ => None,
        }
    }
}

/// Save album to database (upsert on guid)
pub async fn save_album(pool: &SqlitePool, album: &Album) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO albums (
            guid, album, albumartist, albumartist_sort, albumartist_credit,
            mb_albumid, mb_albumartistid, mb_releasegroupid, albumtotal, year,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(guid) DO UPDATE SET
            album = excluded.album,
            albumartist = excluded.albumartist,
            albumartist_sort = excluded.albumartist_sort,
            albumartist_credit = excluded.albumartist_credit,
            mb_albumid = excluded.mb_albumid,
            mb_albumartistid = excluded.mb_albumartistid,
            mb_releasegroupid = excluded.mb_releasegroupid,
            albumtotal = excluded.albumtotal,
            year = excluded.year,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(album.guid.to_string())
    .bind(&album.album)
    .bind(&album.albumartist)
    .bind(&album.albumartist_sort)
    .bind(&album.albumartist_credit)
    .bind(&album.mb_albumid)
    .bind(&album.mb_albumartistid)
    .bind(&album.mb_releasegroupid)
    .bind(album.albumtotal)
    .bind(album.year)
    .execute(pool)
    .await?;

    Ok(())
}

/// List albums matching a query, ordered by album artist then title
pub async fn list_albums(pool: &SqlitePool, query: &AlbumQuery) -> Result<Vec<Album>> {
    let (where_clause, binds) = query.to_sql();
    let sql = format!(
        r#"
        SELECT guid, album, albumartist, albumartist_sort, albumartist_credit,
               mb_albumid, mb_albumartistid, mb_releasegroupid, albumtotal, year
        FROM albums
        WHERE {}
        ORDER BY albumartist, album
        "#,
        where_clause
    );

    let mut q = sqlx::query(&sql);
    for bind in binds {
        q = q.bind(bind);
    }

    let rows = q.fetch_all(pool).await?;

    rows.into_iter().map(|row| album_from_row(&row)).collect()
}

/// Number of items catalogued for an album
pub async fn item_count(pool: &SqlitePool, album_guid: Uuid) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM items WHERE album_id = ?")
        .bind(album_guid.to_string())
        .fetch_one(pool)
        .await?;

    Ok(row.get("n"))
}

fn album_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Album> {
    let guid_str: String = row.get("guid");

    Ok(Album {
        guid: Uuid::parse_str(&guid_str)?,
        album: row.get("album"),
        albumartist: row.get("albumartist"),
        albumartist_sort: row.get("albumartist_sort"),
        albumartist_credit: row.get("albumartist_credit"),
        mb_albumid: row.get("mb_albumid"),
        mb_albumartistid: row.get("mb_albumartistid"),
        mb_releasegroupid: row.get("mb_releasegroupid"),
        albumtotal: row.get("albumtotal"),
        year: row.get("year"),
    })
}
