use serde::{Deserialize, Serialize};

use super::track::{MediaTrack, TrackKind};

/// Track counts of a stream, as seen by whoever consumed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLayout {
    pub video_tracks: usize,
    pub audio_tracks: usize,
}

/// An ordered set of tracks handed around as one unit
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> Vec<MediaTrack> {
        self.tracks_of(TrackKind::Audio)
    }

    pub fn layout(&self) -> StreamLayout {
        StreamLayout {
            video_tracks: self.count(TrackKind::Video),
            audio_tracks: self.count(TrackKind::Audio),
        }
    }

    /// Stop every track; returns how many were still live
    pub fn stop_all(&self) -> usize {
        self.tracks.iter().filter(|track| track.stop()).count()
    }

    fn tracks_of(&self, kind: TrackKind) -> Vec<MediaTrack> {
        self.tracks
            .iter()
            .filter(|track| track.kind() == kind)
            .cloned()
            .collect()
    }

    fn count(&self, kind: TrackKind) -> usize {
        self.tracks.iter().filter(|track| track.kind() == kind).count()
    }
}
