// Combined stream construction
//
// The recorder receives exactly one video track and at most one audio
// track:
// - no audio source: video only
// - one source: that track as-is, no audio graph
// - two sources: both wrapped and connected into one mixing destination,
//   whose output track becomes the single audio track

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::graph::{AudioContext, AudioGraphFactory, AudioStreamSource};
use crate::capture::{AcquiredStreams, CaptureOptions};
use crate::media::{MediaStream, MediaTrack};

/// The stream handed to the recorder, plus the graph that feeds it (if any)
pub struct CombinedStream {
    pub stream: MediaStream,
    /// Present only when two sources were mixed
    pub context: Option<Box<dyn AudioContext>>,
    /// Audio sources that contributed, in mixing order
    pub sources: Vec<AudioStreamSource>,
}

impl CombinedStream {
    pub fn is_mixed(&self) -> bool {
        self.context.is_some()
    }
}

/// Pick the audio tracks to record: system audio first, then microphone
pub fn select_audio_sources(
    streams: &AcquiredStreams,
    options: CaptureOptions,
) -> Vec<(AudioStreamSource, MediaTrack)> {
    let mut selected = Vec::new();

    if options.system_audio {
        if let Some(track) = streams.display.audio_tracks().into_iter().next() {
            selected.push((AudioStreamSource::System, track));
        }
    }

    if options.microphone {
        if let Some(track) = streams
            .microphone
            .as_ref()
            .and_then(|mic| mic.audio_tracks().into_iter().next())
        {
            selected.push((AudioStreamSource::Microphone, track));
        }
    }

    selected
}

pub async fn combine_streams(
    streams: &AcquiredStreams,
    options: CaptureOptions,
    graph: &dyn AudioGraphFactory,
    sample_rate: u32,
) -> Result<CombinedStream> {
    let video = streams
        .display
        .video_tracks()
        .into_iter()
        .next()
        .context("Display stream has no video track")?;

    let selected = select_audio_sources(streams, options);
    let sources: Vec<AudioStreamSource> = selected.iter().map(|(source, _)| *source).collect();

    let combined = match selected.len() {
        0 => CombinedStream {
            stream: MediaStream::new(vec![video]),
            context: None,
            sources,
        },
        1 => {
            let (_, track) = selected.into_iter().next().context("No audio source")?;
            CombinedStream {
                stream: MediaStream::new(vec![video, track]),
                context: None,
                sources,
            }
        }
        _ => {
            let mut context = graph
                .create_context(sample_rate)
                .with_context(|| format!("Failed to create audio context via {}", graph.name()))?;

            match mix_into_destination(context.as_mut(), &selected) {
                Ok(mixed) => CombinedStream {
                    stream: MediaStream::new(vec![video, mixed]),
                    context: Some(context),
                    sources,
                },
                Err(e) => {
                    if let Err(close_err) = context.close().await {
                        warn!("Failed to close audio context after mixing error: {}", close_err);
                    }
                    return Err(e);
                }
            }
        }
    };

    info!(
        "Combined stream built: {:?} from sources {:?}{}",
        combined.stream.layout(),
        combined.sources,
        if combined.is_mixed() { " (mixed)" } else { "" }
    );

    Ok(combined)
}

fn mix_into_destination(
    context: &mut dyn AudioContext,
    selected: &[(AudioStreamSource, MediaTrack)],
) -> Result<MediaTrack> {
    let destination = context
        .create_media_stream_destination()
        .context("Failed to create mixing destination")?;

    for (source, track) in selected {
        let wrapped = MediaStream::new(vec![track.clone()]);
        let node = context
            .create_media_stream_source(&wrapped)
            .with_context(|| format!("Failed to create {:?} source node", source))?;
        context
            .connect(&node, &destination)
            .with_context(|| format!("Failed to connect {:?} source", source))?;
    }

    destination
        .output_track()
        .context("Mixing destination has no output track")
}
