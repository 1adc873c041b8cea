pub mod graph;
pub mod mixer;
pub mod software;

pub use graph::{
    AudioContext, AudioFrame, AudioGraphFactory, AudioStreamSource, ContextState,
    DestinationNode, SourceNode,
};
pub use mixer::{combine_streams, select_audio_sources, CombinedStream};
pub use software::{SoftwareAudioContext, SoftwareAudioGraph};
