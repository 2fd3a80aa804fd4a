//! Play/stop toggle for the spoken trip summary.

use crate::api::{ModelBackend, generate_spoken_summary};
use crate::audio::{PcmBuffer, PlaybackSink};
use crate::config::Config;
use crate::error::AppResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NarrationState {
    #[default]
    Idle,
    Loading,
    Playing,
}

/// What a press of the narration button did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    /// Audio must be fetched; hand the result to [`Narration::deliver`].
    Fetch,
    Stopped,
    /// A request is already in flight.
    Busy,
}

#[derive(Debug, Default)]
pub struct Narration {
    state: NarrationState,
    audio: Option<PcmBuffer>,
}

impl Narration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NarrationState {
        self.state
    }

    /// The last narration received, kept for saving to disk.
    pub fn audio(&self) -> Option<&PcmBuffer> {
        self.audio.as_ref()
    }

    pub fn press(&mut self, sink: &mut dyn PlaybackSink) -> Press {
        match self.state {
            NarrationState::Idle => {
                self.state = NarrationState::Loading;
                Press::Fetch
            }
            NarrationState::Loading => Press::Busy,
            NarrationState::Playing => {
                sink.stop();
                self.state = NarrationState::Idle;
                Press::Stopped
            }
        }
    }

    /// Completes a fetch started by [`Narration::press`]. A result arriving
    /// when no fetch is pending is discarded.
    pub fn deliver(
        &mut self,
        result: AppResult<PcmBuffer>,
        sink: &mut dyn PlaybackSink,
    ) -> AppResult<()> {
        if self.state != NarrationState::Loading {
            return Ok(());
        }
        match result {
            Ok(buffer) => {
                sink.stop();
                let start = sink.now();
                sink.play_at(start, &buffer);
                self.audio = Some(buffer);
                self.state = NarrationState::Playing;
                Ok(())
            }
            Err(e) => {
                self.state = NarrationState::Idle;
                Err(e)
            }
        }
    }

    /// Returns to idle once the sink has played everything.
    pub fn refresh(&mut self, sink: &dyn PlaybackSink) {
        if self.state == NarrationState::Playing && !sink.is_active() {
            self.state = NarrationState::Idle;
        }
    }

    /// One press with the fetch done inline.
    pub fn toggle(
        &mut self,
        backend: &dyn ModelBackend,
        config: &Config,
        summary: &str,
        sink: &mut dyn PlaybackSink,
    ) -> AppResult<Press> {
        self.refresh(sink);
        let press = self.press(sink);
        if press == Press::Fetch {
            let result = generate_spoken_summary(backend, config, summary);
            self.deliver(result, sink)?;
        }
        Ok(press)
    }
}
