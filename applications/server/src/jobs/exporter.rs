/// Background playlist export queue
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use openmusic_core::{PlaylistId, SongSummary};
use openmusic_storage::{playlists, Database};
use serde::Serialize;
use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
    pub playlist_id: PlaylistId,
    pub target_email: String,
}

/// The exported playlist document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistExport {
    pub playlist: ExportedPlaylist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedPlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub songs: Vec<SongSummary>,
}

/// Where finished exports go
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn deliver(&self, target_email: &str, export: &PlaylistExport) -> Result<()>;
}

/// Writes each export as `<dir>/<playlist_id>-<uuid>.json`
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile<'a> {
    target_email: &'a str,
    exported_at: String,
    playlist: &'a ExportedPlaylist,
}

impl FileExportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn deliver(&self, target_email: &str, export: &PlaylistExport) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file = ExportFile {
            target_email,
            exported_at: Utc::now().to_rfc3339(),
            playlist: &export.playlist,
        };
        let contents = serde_json::to_vec_pretty(&file)
            .map_err(|e| openmusic_core::Fault::server(format!("Failed to encode export: {e}")))?;

        let path = self.dir.join(format!(
            "{}-{}.json",
            export.playlist.id,
            Uuid::new_v4().simple()
        ));
        tokio::fs::write(&path, contents).await?;

        tracing::info!("Wrote playlist export to {}", path.display());
        Ok(())
    }
}

pub struct ExportQueue {
    queue: Mutex<VecDeque<ExportJob>>,
    notify: Notify,
    db: Arc<Database>,
    sink: Arc<dyn ExportSink>,
    workers: usize,
    running: AtomicBool,
}

impl ExportQueue {
    pub fn new(db: Arc<Database>, sink: Arc<dyn ExportSink>, workers: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            db,
            sink,
            workers,
            running: AtomicBool::new(false),
        }
    }

    /// Start worker tasks; jobs are accepted only afterwards
    pub fn start(self: Arc<Self>) {
        if self.workers == 0 || self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        for worker_id in 0..self.workers {
            let queue = Arc::clone(&self);
            tokio::spawn(async move {
                tracing::info!("Export worker {} started", worker_id);
                queue.worker_loop(worker_id).await;
            });
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Enqueue an export job. Fails when no worker would ever pick it up.
    pub async fn enqueue(&self, job: ExportJob) -> Result<()> {
        if !self.is_running() {
            tracing::error!(
                "Rejected export of playlist {}: export workers are not running",
                job.playlist_id
            );
            return Err(openmusic_core::Fault::server("Export workers are not running").into());
        }

        let mut queue = self.queue.lock().await;
        tracing::info!("Enqueued export of playlist {}", job.playlist_id);
        queue.push_back(job);
        drop(queue);
        self.notify.notify_one();
        Ok(())
    }

    /// Get queue length
    pub async fn queue_length(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Worker loop - waits for jobs and processes them one at a time
    async fn worker_loop(&self, worker_id: usize) {
        loop {
            let job = self.queue.lock().await.pop_front();

            let Some(job) = job else {
                self.notify.notified().await;
                continue;
            };

            tracing::info!(
                "Worker {} exporting playlist {}",
                worker_id,
                job.playlist_id
            );

            match self.process(&job).await {
                Ok(()) => tracing::info!(
                    "Worker {} completed export of playlist {}",
                    worker_id,
                    job.playlist_id
                ),
                Err(e) => tracing::error!(
                    "Worker {} failed to export playlist {}: {}",
                    worker_id,
                    job.playlist_id,
                    e
                ),
            }
        }
    }

    /// Build the export document and hand it to the sink
    pub async fn process(&self, job: &ExportJob) -> Result<()> {
        let detail = playlists::get_with_songs(self.db.pool(), &job.playlist_id).await?;

        let export = PlaylistExport {
            playlist: ExportedPlaylist {
                id: detail.id,
                name: detail.name,
                songs: detail.songs,
            },
        };

        self.sink.deliver(&job.target_email, &export).await
    }
}
