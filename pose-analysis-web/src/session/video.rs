//! Video lifecycle state machine
//!
//! Idle → Loading → Ready → Playing ⇄ Paused, with Seeking entered from
//! any drawable state and returning to where it came from. A media
//! error is terminal until teardown.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoState {
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Seeking,
    Failed,
}

impl VideoState {
    /// Whether the render loop draws in this state
    pub fn is_drawable(&self) -> bool {
        matches!(
            self,
            VideoState::Ready | VideoState::Playing | VideoState::Paused | VideoState::Seeking
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoState::Idle => "idle",
            VideoState::Loading => "loading",
            VideoState::Ready => "ready",
            VideoState::Playing => "playing",
            VideoState::Paused => "paused",
            VideoState::Seeking => "seeking",
            VideoState::Failed => "failed",
        }
    }
}

/// Media element events the lifecycle reacts to, plus subscribe/teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoEvent {
    Subscribe,
    LoadedMetadata,
    CanPlay,
    Play,
    Pause,
    Seeking,
    Seeked,
    Error,
    Teardown,
}

impl VideoEvent {
    /// DOM event name, for the events that come from the element
    pub fn dom_name(&self) -> Option<&'static str> {
        match self {
            VideoEvent::LoadedMetadata => Some("loadedmetadata"),
            VideoEvent::CanPlay => Some("canplay"),
            VideoEvent::Play => Some("play"),
            VideoEvent::Pause => Some("pause"),
            VideoEvent::Seeking => Some("seeking"),
            VideoEvent::Seeked => Some("seeked"),
            VideoEvent::Error => Some("error"),
            VideoEvent::Subscribe | VideoEvent::Teardown => None,
        }
    }

    /// Events subscribed on the video element
    pub const DOM_EVENTS: [VideoEvent; 7] = [
        VideoEvent::LoadedMetadata,
        VideoEvent::CanPlay,
        VideoEvent::Play,
        VideoEvent::Pause,
        VideoEvent::Seeking,
        VideoEvent::Seeked,
        VideoEvent::Error,
    ];
}

#[derive(Debug, Clone)]
pub struct VideoLifecycle {
    state: VideoState,
    /// State to restore when a seek completes
    before_seek: VideoState,
}

impl Default for VideoLifecycle {
    fn default() -> Self {
        Self { state: VideoState::Idle, before_seek: VideoState::Ready }
    }
}

impl VideoLifecycle {
    pub fn state(&self) -> VideoState {
        self.state
    }

    /// Apply `event`. Returns the new state when it changed.
    pub fn handle(&mut self, event: VideoEvent) -> Option<VideoState> {
        use VideoState as S;

        let next = match (self.state, event) {
            (_, VideoEvent::Teardown) => S::Idle,
            (_, VideoEvent::Error) => S::Failed,
            (S::Failed, _) => S::Failed,

            (S::Idle, VideoEvent::Subscribe) => S::Loading,
            (S::Idle, _) => S::Idle,

            (S::Loading, VideoEvent::LoadedMetadata | VideoEvent::CanPlay) => S::Ready,
            (S::Loading, _) => S::Loading,

            (S::Seeking, VideoEvent::Seeked) => self.before_seek,
            (S::Seeking, VideoEvent::Play) => {
                self.before_seek = S::Playing;
                S::Seeking
            }
            (S::Seeking, VideoEvent::Pause) => {
                self.before_seek = S::Paused;
                S::Seeking
            }
            (S::Seeking, _) => S::Seeking,

            (current, VideoEvent::Seeking) => {
                self.before_seek = current;
                S::Seeking
            }
            (_, VideoEvent::Play) => S::Playing,
            (S::Playing, VideoEvent::Pause) => S::Paused,
            (current, _) => current,
        };

        if next == self.state {
            return None;
        }
        log::debug!("video: {} -> {}", self.state.as_str(), next.as_str());
        self.state = next;
        Some(next)
    }
}
