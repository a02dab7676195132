//! Integration tests for the albums and songs slices


use openmusic_core::types::*;
use openmusic_core::Fault;
use openmusic_storage::{albums, songs, StorageError};
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = create_test_album(pool, "Viva la Vida", 2008).await;
    assert!(id.as_str().starts_with("album-"));

    let album = albums::get_by_id(pool, &id).await.unwrap();
    assert_eq!(album.name, "Viva la Vida");
    assert_eq!(album.year, 2008);
    assert!(album.cover.is_none());
    assert!(album.songs.is_empty());
}

#[tokio::test]
async fn test_album_includes_its_songs_in_insertion_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album_id = create_test_album(pool, "Viva la Vida", 2008).await;
    let first = create_test_song(pool, "Life in Technicolor", "Coldplay", Some(album_id.clone())).await;
    let second = create_test_song(pool, "Cemeteries of London", "Coldplay", Some(album_id.clone())).await;
    create_test_song(pool, "Yellow", "Coldplay", None).await;

    let album = albums::get_by_id(pool, &album_id).await.unwrap();
    let ids: Vec<_> = album.songs.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_missing_album_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let missing = AlbumId::new("album-missing");
    let err = albums::get_by_id(pool, &missing).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "Album", .. }));

    let fault = Fault::from(err);
    assert_eq!(fault, Fault::not_found("Album not found"));

    let err = albums::update(
        pool,
        &missing,
        &NewAlbum {
            name: "x".into(),
            year: 2000,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    assert!(albums::delete(pool, &missing).await.is_err());
}

#[tokio::test]
async fn test_update_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = create_test_album(pool, "Parachutes", 1999).await;
    albums::update(
        pool,
        &id,
        &NewAlbum {
            name: "Parachutes".into(),
            year: 2000,
        },
    )
    .await
    .unwrap();

    assert_eq!(albums::get_by_id(pool, &id).await.unwrap().year, 2000);
}

#[tokio::test]
async fn test_set_cover_returns_previous_cover() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = create_test_album(pool, "Ghost Stories", 2014).await;

    let previous = albums::set_cover(pool, &id, "a.png")
        .await
        .unwrap();
    assert!(previous.is_none());

    let previous = albums::set_cover(pool, &id, "b.png")
        .await
        .unwrap();
    assert_eq!(previous.as_deref(), Some("a.png"));

    let removed = albums::delete(pool, &id).await.unwrap();
    assert_eq!(removed.as_deref(), Some("b.png"));
    assert!(!albums::exists(pool, &id).await.unwrap());
}

#[tokio::test]
async fn test_deleting_album_detaches_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let album_id = create_test_album(pool, "X&Y", 2005).await;
    let song_id = create_test_song(pool, "Fix You", "Coldplay", Some(album_id.clone())).await;

    albums::delete(pool, &album_id).await.unwrap();

    let song = songs::get_by_id(pool, &song_id).await.unwrap();
    assert!(song.album_id.is_none());
}

#[tokio::test]
async fn test_song_with_unknown_album_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = songs::create(
        pool,
        &new_song("Orphan", "Nobody", Some(AlbumId::new("album-missing"))),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StorageError::NotFound { entity: "Album", .. }));
}

#[tokio::test]
async fn test_get_and_update_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = create_test_song(pool, "Clocks", "Coldplay", None).await;
    assert!(id.as_str().starts_with("song-"));

    let song = songs::get_by_id(pool, &id).await.unwrap();
    assert_eq!(song.title, "Clocks");
    assert_eq!(song.duration, Some(240));

    let mut update = new_song("Clocks (Live)", "Coldplay", None);
    update.duration = None;
    songs::update(pool, &id, &update).await.unwrap();

    let song = songs::get_by_id(pool, &id).await.unwrap();
    assert_eq!(song.title, "Clocks (Live)");
    assert!(song.duration.is_none());
}

#[tokio::test]
async fn test_delete_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let id = create_test_song(pool, "Trouble", "Coldplay", None).await;
    songs::delete(pool, &id).await.unwrap();

    assert!(!songs::exists(pool, &id).await.unwrap());
    assert!(matches!(
        songs::delete(pool, &id).await.unwrap_err(),
        StorageError::NotFound { entity: "Song", .. }
    ));
}

#[tokio::test]
async fn test_list_songs_with_filters() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_song(pool, "Life in Technicolor", "Coldplay", None).await;
    create_test_song(pool, "Fix You", "Coldplay", None).await;
    create_test_song(pool, "Lovers in Japan", "Coldplay", None).await;
    create_test_song(pool, "Fake Plastic Trees", "Radiohead", None).await;

    let all = songs::list(pool, &SongQuery::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].title, "Life in Technicolor");

    let by_title = songs::list(
        pool,
        &SongQuery {
            title: Some("LIFE".into()),
            performer: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(by_title.len(), 1);

    let by_performer = songs::list(
        pool,
        &SongQuery {
            title: None,
            performer: Some("radio".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(by_performer.len(), 1);
    assert_eq!(by_performer[0].performer, "Radiohead");

    let both = songs::list(
        pool,
        &SongQuery {
            title: Some("in".into()),
            performer: Some("cold".into()),
        },
    )
    .await
    .unwrap();
    let titles: Vec<_> = both.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Life in Technicolor", "Lovers in Japan"]);
}

/// `%` and `_` in a filter are plain characters
#[tokio::test]
async fn test_song_filters_match_wildcards_literally() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_song(pool, "Fix You", "Coldplay", None).await;
    create_test_song(pool, "100% Pure", "Big_Band", None).await;

    let by_title = |title: &str| SongQuery {
        title: Some(title.into()),
        performer: None,
    };

    let underscore = songs::list(pool, &by_title("_")).await.unwrap();
    assert!(underscore.is_empty());

    let percent = songs::list(pool, &by_title("%")).await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "100% Pure");

    let performer = songs::list(
        pool,
        &SongQuery {
            title: None,
            performer: Some("g_b".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(performer.len(), 1);
    assert_eq!(performer[0].performer, "Big_Band");

    let no_match = songs::list(
        pool,
        &SongQuery {
            title: None,
            performer: Some("c%play".into()),
        },
    )
    .await
    .unwrap();
    assert!(no_match.is_empty());
}
