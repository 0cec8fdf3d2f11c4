//! Audio playback through `<audio>` elements
//!
//! One looping music track plus a restartable blaster one-shot. Browsers may
//! refuse playback without a user gesture; that refusal is reported as
//! [`PlatformError::AudioBlocked`] and never stops the game.

use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, HtmlMediaElement};

use crate::platform::assets::{BLASTER_SOUND, MUSIC_TRACK};
use crate::platform::dom::{self, ids};
use crate::platform::error::describe;
use crate::platform::PlatformError;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship fired a bullet
    Blaster,
}

/// Audio manager for the game
pub struct AudioManager {
    music: Option<HtmlMediaElement>,
    blaster: Option<HtmlAudioElement>,
    music_gain: f64,
    sfx_gain: f64,
    /// Music was playing when the page lost focus
    suspended: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Prefer the page's element so its preload starts with the document
        let music = dom::element(ids::MUSIC)
            .ok()
            .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok())
            .or_else(|| {
                HtmlAudioElement::new_with_src(MUSIC_TRACK)
                    .ok()
                    .map(|a| a.unchecked_into::<HtmlMediaElement>())
            });
        if let Some(music) = &music {
            music.set_loop(true);
        } else {
            log::warn!("No music element - music disabled");
        }

        let blaster = HtmlAudioElement::new_with_src(BLASTER_SOUND).ok();
        if let Some(blaster) = &blaster {
            blaster.set_preload("auto");
        }

        let mut audio = Self {
            music,
            blaster,
            music_gain: 0.0,
            sfx_gain: 0.0,
            suspended: false,
        };
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.music_gain = settings.music_gain();
        self.sfx_gain = settings.sfx_gain();
        if let Some(music) = &self.music {
            music.set_volume(self.music_gain);
        }
    }

    /// Rewind and play the music track.
    ///
    /// The returned future owns its handles, so callers can await it without
    /// holding a borrow of the manager.
    pub fn start_music(&self) -> impl Future<Output = Result<(), PlatformError>> + 'static {
        let music = self.music.clone();
        let gain = self.music_gain;
        async move {
            let music = music.ok_or(PlatformError::MissingElement(ids::MUSIC))?;
            music.set_current_time(0.0);
            music.set_volume(gain);
            let promise = music
                .play()
                .map_err(|e| PlatformError::AudioBlocked(describe(&e)))?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| PlatformError::AudioBlocked(describe(&e)))
        }
    }

    pub fn stop_music(&mut self) {
        self.suspended = false;
        if let Some(music) = &self.music {
            let _ = music.pause();
            music.set_current_time(0.0);
        }
    }

    /// Page hidden or blurred
    pub fn suspend(&mut self, mute_on_blur: bool) {
        let Some(music) = &self.music else { return };
        if mute_on_blur && !music.paused() {
            let _ = music.pause();
            self.suspended = true;
        }
    }

    /// Page focused again; only resumes what [`suspend`](Self::suspend) paused
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        if let Some(music) = &self.music {
            if let Ok(promise) = music.play() {
                spawn_quiet(promise);
            }
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.sfx_gain <= 0.0 {
            return;
        }
        match effect {
            SoundEffect::Blaster => {
                let Some(blaster) = &self.blaster else { return };
                blaster.set_current_time(0.0);
                blaster.set_volume(self.sfx_gain);
                match blaster.play() {
                    Ok(promise) => spawn_quiet(promise),
                    Err(e) => log::debug!("Blaster play failed: {}", describe(&e)),
                }
            }
        }
    }
}

/// Await a play() promise in the background, logging a rejection
fn spawn_quiet(promise: js_sys::Promise) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::debug!("{}", PlatformError::AudioBlocked(describe(&e)));
        }
    });
}
