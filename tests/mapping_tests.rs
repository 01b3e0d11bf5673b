//! Field-mapping tests against a realistic WS/2 release payload

use mbgap::services::mapping::{item_for_release, item_for_track};
use mbgap::services::musicbrainz::MBRelease;
use uuid::Uuid;

fn fixture_release() -> MBRelease {
    let json = serde_json::json!({
        "id": "rel-mbid",
        "title": "Wish You Were Here",
        "status": "Official",
        "date": "1975-09-12",
        "country": "GB",
        "asin": "B000002C2C",
        "packaging": "Jewel Case",
        "disambiguation": "UK first pressing",
        "text-representation": {"language": "eng", "script": "Latn"},
        "artist-credit": [
            {"name": "Pink Floyd", "artist": {
                "id": "artist-mbid",
                "name": "Pink Floyd",
                "sort-name": "Pink Floyd"
            }}
        ],
        "release-group": {
            "id": "rg-mbid",
            "title": "Wish You Were Here",
            "primary-type": "Album",
            "secondary-types": ["Live"],
            "artist-credit": [
                {"name": "Pink Floyd", "artist": {
                    "id": "artist-mbid",
                    "name": "Pink Floyd",
                    "sort-name": "Pink Floyd"
                }}
            ]
        },
        "label-info": [
            {"catalog-number": "SHVL 814", "label": {"name": "Harvest"}}
        ],
        "media": [
            {
                "position": 1,
                "format": "CD",
                "title": "",
                "track-count": 2,
                "tracks": [
                    {
                        "id": "track-mbid-1",
                        "position": 1,
                        "title": "Shine On You Crazy Diamond, Parts I-V",
                        "length": 811000,
                        "recording": {"id": "rec-mbid-1", "title": "Shine On You Crazy Diamond, Parts I-V", "length": 811077}
                    },
                    {
                        "id": "track-mbid-2",
                        "position": 2,
                        "title": "Welcome to the Machine",
                        "length": 448000,
                        "recording": {"id": "rec-mbid-2", "title": "Welcome to the Machine", "length": 448000}
                    }
                ]
            }
        ]
    });

    serde_json::from_value(json).expect("fixture should deserialize")
}

#[test]
fn track_placeholder_maps_all_release_fields() {
    let release = fixture_release();
    let medium = &release.media.as_ref().unwrap()[0];
    let track = &medium.tracks.as_ref().unwrap()[1];
    let album_guid = Uuid::new_v4();

    let item = item_for_track(&release, medium, track, album_guid);

    assert_eq!(item.album_id, Some(album_guid));
    assert_eq!(item.album.as_deref(), Some("Wish You Were Here"));
    assert_eq!(item.albumartist.as_deref(), Some("Pink Floyd"));
    assert_eq!(item.albumartist_credit.as_deref(), Some("Pink Floyd"));
    assert_eq!(item.albumartist_sort.as_deref(), Some("Pink Floyd"));
    assert_eq!(item.albumdisambig.as_deref(), Some("UK first pressing"));
    assert_eq!(item.albumstatus.as_deref(), Some("Official"));
    assert_eq!(item.albumtype.as_deref(), Some("album"));
    assert_eq!(item.artist.as_deref(), Some("Pink Floyd"));
    assert_eq!(item.asin.as_deref(), Some("B000002C2C"));
    assert_eq!(item.catalognum.as_deref(), Some("SHVL 814"));
    assert_eq!(item.comp, Some(false));
    assert_eq!(item.country.as_deref(), Some("GB"));
    assert_eq!(item.disc, Some(1));
    assert_eq!(item.disctotal, Some(1));
    assert_eq!(item.label.as_deref(), Some("Harvest"));
    assert_eq!(item.language.as_deref(), Some("eng"));
    assert_eq!(item.length, Some(448.0));
    assert_eq!(item.mb_albumid.as_deref(), Some("rel-mbid"));
    assert_eq!(item.mb_artistid.as_deref(), Some("artist-mbid"));
    assert_eq!(item.mb_releasegroupid.as_deref(), Some("rg-mbid"));
    assert_eq!(item.mb_trackid.as_deref(), Some("rec-mbid-2"));
    assert_eq!(item.media.as_deref(), Some("CD"));
    assert_eq!(item.script.as_deref(), Some("Latn"));
    assert_eq!(item.title.as_deref(), Some("Welcome to the Machine"));
    assert_eq!(item.track, Some(2));
    assert_eq!(item.tracktotal, Some(2));
    assert_eq!(item.year, Some(1975));
    assert_eq!(item.month, Some(9));
    assert_eq!(item.day, Some(12));
}

#[test]
fn album_placeholder_leaves_track_fields_unset() {
    let release = fixture_release();
    let item = item_for_release(&release);

    assert_eq!(item.album_id, None);
    assert_eq!(item.album.as_deref(), Some("Wish You Were Here"));
    assert_eq!(item.albumartist.as_deref(), Some("Pink Floyd"));
    assert_eq!(item.albumtype.as_deref(), Some("album"));
    assert_eq!(item.albumsubtype.as_deref(), Some("live"));
    assert_eq!(item.mb_albumid.as_deref(), Some("rel-mbid"));
    assert_eq!(item.mb_artistid.as_deref(), Some("artist-mbid"));
    assert_eq!(item.mb_releasegroupid.as_deref(), Some("rg-mbid"));
    // Packaging stands in for media at the album level
    assert_eq!(item.media.as_deref(), Some("Jewel Case"));
    assert_eq!(item.year, Some(1975));

    assert_eq!(item.title, None);
    assert_eq!(item.track, None);
    assert_eq!(item.tracktotal, None);
    assert_eq!(item.disc, None);
    assert_eq!(item.disctotal, None);
    assert_eq!(item.length, None);
    assert_eq!(item.mb_trackid, None);
}

#[test]
fn various_artists_release_sets_compilation_flag() {
    let json = serde_json::json!({
        "id": "va-rel",
        "title": "Now That's What I Call Music",
        "artist-credit": [
            {"name": "Various Artists", "artist": {
                "id": "va-mbid",
                "name": "Various Artists",
                "sort-name": "Various Artists"
            }}
        ]
    });
    let release: MBRelease = serde_json::from_value(json).unwrap();

    let item = item_for_release(&release);
    assert_eq!(item.comp, Some(true));
    // No release group: title falls back to the release
    assert_eq!(item.album.as_deref(), Some("Now That's What I Call Music"));
    assert_eq!(item.mb_releasegroupid, None);
}

#[test]
fn partial_date_maps_partial_parts() {
    let json = serde_json::json!({"id": "r", "title": "T", "date": "1994"});
    let release: MBRelease = serde_json::from_value(json).unwrap();

    let item = item_for_release(&release);
    assert_eq!(item.year, Some(1994));
    assert_eq!(item.month, None);
    assert_eq!(item.day, None);
}
