use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Counters shared between the collector task and status queries
#[derive(Debug, Default)]
pub struct CollectorStats {
    chunks_received: AtomicUsize,
    bytes_buffered: AtomicUsize,
}

impl CollectorStats {
    pub fn chunks_received(&self) -> usize {
        self.chunks_received.load(Ordering::SeqCst)
    }

    pub fn bytes_buffered(&self) -> usize {
        self.bytes_buffered.load(Ordering::SeqCst)
    }
}

/// Ordered container chunks of one recording
#[derive(Debug, Default)]
pub struct RecordingBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl RecordingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk; empty chunks are dropped. Returns whether it was kept.
    pub fn push(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk);
        true
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenate every retained chunk in delivery order
    pub fn finalize(self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks {
            data.extend_from_slice(&chunk);
        }
        data
    }
}

/// Drain a recorder's chunk channel into a buffer until the channel closes
///
/// A signal (or a dropped sender) on `cancel` ends collection early: chunks
/// already queued are still taken, and the partial buffer is returned.
pub async fn collect_chunks(
    mut chunk_rx: mpsc::Receiver<Vec<u8>>,
    stats: Arc<CollectorStats>,
    mut cancel: oneshot::Receiver<()>,
) -> RecordingBuffer {
    let mut buffer = RecordingBuffer::new();

    info!("Starting chunk collection");

    loop {
        tokio::select! {
            chunk = chunk_rx.recv() => match chunk {
                Some(chunk) => keep_chunk(&mut buffer, &stats, chunk),
                None => break,
            },
            _ = &mut cancel => {
                while let Ok(chunk) = chunk_rx.try_recv() {
                    keep_chunk(&mut buffer, &stats, chunk);
                }
                warn!("Chunk collection cancelled before the recorder closed its channel");
                break;
            }
        }
    }

    info!(
        "Chunk collection complete: {} chunks, {} bytes",
        buffer.chunk_count(),
        buffer.total_bytes()
    );

    buffer
}

fn keep_chunk(buffer: &mut RecordingBuffer, stats: &CollectorStats, chunk: Vec<u8>) {
    let size = chunk.len();
    if buffer.push(chunk) {
        stats.chunks_received.fetch_add(1, Ordering::SeqCst);
        stats.bytes_buffered.fetch_add(size, Ordering::SeqCst);
        debug!("Buffered chunk #{} ({} bytes)", buffer.chunk_count(), size);
    } else {
        debug!("Skipped empty chunk");
    }
}
