/// Background jobs
pub mod exporter;

pub use exporter::{ExportJob, ExportQueue, ExportSink, FileExportSink, PlaylistExport};
