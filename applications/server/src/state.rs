/// Shared application state
use crate::{
    jobs::ExportQueue,
    services::{AuthService, FileStorage},
};
use openmusic_core::SchemaRegistry;
use openmusic_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub file_storage: Arc<FileStorage>,
    pub schemas: Arc<SchemaRegistry>,
    pub export_queue: Arc<ExportQueue>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        auth_service: Arc<AuthService>,
        file_storage: Arc<FileStorage>,
        schemas: Arc<SchemaRegistry>,
        export_queue: Arc<ExportQueue>,
    ) -> Self {
        Self {
            db,
            auth_service,
            file_storage,
            schemas,
            export_queue,
        }
    }
}
