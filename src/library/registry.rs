use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::artifact::RecordingArtifact;

/// Revocable references to in-memory artifacts
#[derive(Debug, Default)]
pub struct BlobRegistry {
    blobs: HashMap<Uuid, Arc<RecordingArtifact>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: RecordingArtifact) -> Uuid {
        let id = Uuid::new_v4();
        debug!("Registered blob {} ({} bytes)", id, artifact.size());
        self.blobs.insert(id, Arc::new(artifact));
        id
    }

    pub fn resolve(&self, id: &Uuid) -> Option<Arc<RecordingArtifact>> {
        self.blobs.get(id).cloned()
    }

    /// Invalidate a reference. Returns false if it was not registered.
    pub fn revoke(&mut self, id: &Uuid) -> bool {
        self.blobs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
