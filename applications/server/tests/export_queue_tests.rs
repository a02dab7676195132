/// Export queue tests
/// Tests job processing against a real database and the file sink
mod common;

use common::{create_test_database, TestApp};
use openmusic_core::{PlaylistId, SongSummary};
use openmusic_server::jobs::{
    ExportJob, ExportQueue, ExportSink, FileExportSink, PlaylistExport,
};
use openmusic_storage::{playlists, songs, users};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

async fn seeded_playlist(app: &TestApp) -> PlaylistId {
    let owner = users::create(app.db.pool(), "exporter", "Exporter", "hash")
        .await
        .unwrap();
    let playlist_id = playlists::create(app.db.pool(), "Favourites", &owner.id)
        .await
        .unwrap();
    let song_id = songs::create(
        app.db.pool(),
        &openmusic_core::NewSong {
            title: "Viva la Vida".to_string(),
            year: 2008,
            genre: "Rock".to_string(),
            performer: "Coldplay".to_string(),
            duration: Some(242),
            album_id: None,
        },
    )
    .await
    .unwrap();
    playlists::add_song(app.db.pool(), &playlist_id, &song_id, &owner.id)
        .await
        .unwrap();
    playlist_id
}

#[tokio::test]
async fn test_enqueue_without_workers_is_rejected() {
    let app = TestApp::without_export_workers().await;
    let playlist_id = seeded_playlist(&app).await;
    assert!(!app.export_queue.is_running());

    let err = app
        .export_queue
        .enqueue(ExportJob {
            playlist_id,
            target_email: "me@example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(!err.fault().is_client());
    assert_eq!(err.fault().status_code(), 500);
    assert_eq!(app.export_queue.queue_length().await, 0);
    assert!(app.sink.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn test_process_builds_export_document() {
    let app = TestApp::without_export_workers().await;
    let playlist_id = seeded_playlist(&app).await;

    app.export_queue
        .process(&ExportJob {
            playlist_id: playlist_id.clone(),
            target_email: "me@example.com".to_string(),
        })
        .await
        .unwrap();

    let delivered = app.sink.delivered.lock().await;
    assert_eq!(delivered.len(), 1);
    let (email, export) = &delivered[0];
    assert_eq!(email, "me@example.com");
    assert_eq!(export.playlist.id, playlist_id);
    assert_eq!(export.playlist.name, "Favourites");
    assert_eq!(export.playlist.songs.len(), 1);
    assert_eq!(export.playlist.songs[0].performer, "Coldplay");
}

#[tokio::test]
async fn test_process_missing_playlist_fails() {
    let app = TestApp::without_export_workers().await;

    let err = app
        .export_queue
        .process(&ExportJob {
            playlist_id: PlaylistId::new("playlist-missing"),
            target_email: "me@example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.fault().status_code(), 404);
    assert!(app.sink.delivered.lock().await.is_empty());
}

#[tokio::test]
async fn test_file_sink_writes_json_document() {
    let temp_dir = TempDir::new().unwrap();
    let export_dir = temp_dir.path().join("exports");
    let sink = FileExportSink::new(export_dir.clone());
    let export = PlaylistExport {
        playlist: openmusic_server::jobs::exporter::ExportedPlaylist {
            id: PlaylistId::new("playlist-1"),
            name: "Road Trip".to_string(),
            songs: vec![SongSummary {
                id: openmusic_core::SongId::new("song-1"),
                title: "Yellow".to_string(),
                performer: "Coldplay".to_string(),
            }],
        },
    };

    sink.deliver("me@example.com", &export).await.unwrap();

    let mut entries = tokio::fs::read_dir(&export_dir).await.unwrap();
    let entry = entries.next_entry().await.unwrap().expect("one export file");
    let name = entry.file_name().to_string_lossy().to_string();
    assert!(name.starts_with("playlist-1-") && name.ends_with(".json"), "{name}");

    let contents: Value =
        serde_json::from_slice(&tokio::fs::read(entry.path()).await.unwrap()).unwrap();
    assert_eq!(contents["targetEmail"], "me@example.com");
    assert!(contents["exportedAt"].is_string());
    assert_eq!(contents["playlist"]["name"], "Road Trip");
    assert_eq!(contents["playlist"]["songs"][0]["title"], "Yellow");
}

#[tokio::test]
async fn test_worker_drains_queue_into_file_sink() {
    let temp_dir = TempDir::new().unwrap();
    let db = create_test_database(&temp_dir).await;
    let owner = users::create(db.pool(), "owner", "Owner", "hash").await.unwrap();
    let playlist_id = playlists::create(db.pool(), "Empty", &owner.id).await.unwrap();

    let export_dir = temp_dir.path().join("exports");
    let sink: Arc<dyn ExportSink> = Arc::new(FileExportSink::new(export_dir.clone()));
    let queue = Arc::new(ExportQueue::new(db, sink, 2));
    Arc::clone(&queue).start();

    queue
        .enqueue(ExportJob {
            playlist_id,
            target_email: "owner@example.com".to_string(),
        })
        .await
        .unwrap();

    let mut written = 0;
    for _ in 0..50 {
        if let Ok(mut entries) = tokio::fs::read_dir(&export_dir).await {
            written = 0;
            while let Ok(Some(_)) = entries.next_entry().await {
                written += 1;
            }
            if written > 0 {
                break;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    assert_eq!(written, 1);
    assert_eq!(queue.queue_length().await, 0);
}
