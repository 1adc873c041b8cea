use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::artifact::{file_name_for, FinalizedRecording, RecordingArtifact};
use super::list::{ListItem, RecordingEntry, RecordingList};
use super::registry::BlobRegistry;
use crate::config::LibraryConfig;

/// Finished recordings of this process, listed and downloadable
pub struct RecordingLibrary {
    config: LibraryConfig,
    list: RecordingList,
    blobs: BlobRegistry,
}

impl RecordingLibrary {
    pub fn new(config: LibraryConfig) -> Self {
        let list = RecordingList::new(config.placeholder.clone());
        Self {
            config,
            list,
            blobs: BlobRegistry::new(),
        }
    }

    /// Name the recording, make it downloadable and append it to the list
    pub fn register(
        &mut self,
        recording: FinalizedRecording,
        created_at: DateTime<Local>,
    ) -> RecordingEntry {
        let file_name = file_name_for(
            &self.config.file_prefix,
            &self.config.file_extension,
            &created_at.naive_local(),
        );

        let artifact = RecordingArtifact {
            data: recording.data,
            mime_type: recording.mime_type,
            file_name: file_name.clone(),
            created_at,
            chunk_count: recording.chunk_count,
            layout: recording.layout,
        };
        let size_bytes = artifact.size();
        let mime_type = artifact.mime_type.clone();
        let layout = artifact.layout;

        let id = self.blobs.insert(artifact);
        let entry = RecordingEntry {
            id,
            label: file_name,
            href: format!("/recordings/{}", id),
            download_href: format!("/recordings/{}/download", id),
            download_label: self.config.download_label.clone(),
            size_bytes,
            mime_type,
            created_at,
            layout,
        };

        self.list.append(entry.clone());

        info!(
            "Recording {} registered ({} bytes, {} in list)",
            entry.label,
            entry.size_bytes,
            self.list.entries().count()
        );

        entry
    }

    pub fn items(&self) -> Vec<ListItem> {
        self.list.items().to_vec()
    }

    pub fn entries(&self) -> Vec<RecordingEntry> {
        self.list.entries().cloned().collect()
    }

    pub fn resolve(&self, id: &Uuid) -> Option<Arc<RecordingArtifact>> {
        self.blobs.resolve(id)
    }

    /// Invalidate the download reference; the list entry stays
    pub fn revoke(&mut self, id: &Uuid) -> bool {
        self.blobs.revoke(id)
    }
}
