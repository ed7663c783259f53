//! Web Audio sound effects
//!
//! Every effect is synthesized from oscillators; there are no audio files.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round starts
    Start,
    /// Player leaves the ground
    Jump,
    /// Coin collected
    Coin,
    /// Ran into fire
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Owns the audio context and the effective effect volume
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_sfx_volume(),
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_sfx_volume();
    }

    pub fn play(&self, effect: SoundEffect) {
        let Some(ctx) = self.ctx.as_ref().filter(|_| self.volume > 0.0) else {
            return;
        };
        // Browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.play_notes(
                ctx,
                &[400.0, 500.0, 600.0, 800.0],
                Tone { wave: OscillatorType::Triangle, spacing: 0.07, peak: 0.25, decay: 0.2 },
            ),
            SoundEffect::Jump => self.play_jump(ctx),
            SoundEffect::Coin => self.play_notes(
                ctx,
                &[988.0, 1319.0],
                Tone { wave: OscillatorType::Square, spacing: 0.06, peak: 0.12, decay: 0.15 },
            ),
            SoundEffect::GameOver => self.play_notes(
                ctx,
                &[400.0, 350.0, 300.0, 200.0],
                Tone { wave: OscillatorType::Sine, spacing: 0.2, peak: 0.3, decay: 0.3 },
            ),
        }
    }

    // === Sound generators ===

    /// Oscillator routed through its own gain node to the speakers
    fn voice(
        &self,
        ctx: &AudioContext,
        freq: f32,
        wave: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(wave);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }

    /// Evenly spaced notes, each with a short exponential decay
    fn play_notes(&self, ctx: &AudioContext, notes: &[f32], tone: Tone) {
        let start = ctx.current_time();
        for (i, &freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.voice(ctx, freq, tone.wave) else {
                continue;
            };
            let at = start + i as f64 * tone.spacing;
            let level = gain.gain();
            level.set_value_at_time(self.volume * tone.peak, at).ok();
            level.exponential_ramp_to_value_at_time(0.01, at + tone.decay).ok();
            osc.start_with_when(at).ok();
            osc.stop_with_when(at + tone.decay + 0.05).ok();
        }
    }

    /// Single note gliding up an octave and a half
    fn play_jump(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.voice(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let now = ctx.current_time();
        let level = gain.gain();
        level.set_value_at_time(self.volume * 0.25, now).ok();
        level.exponential_ramp_to_value_at_time(0.01, now + 0.18).ok();
        let pitch = osc.frequency();
        pitch.set_value_at_time(220.0, now).ok();
        pitch.exponential_ramp_to_value_at_time(660.0, now + 0.12).ok();
        osc.start().ok();
        osc.stop_with_when(now + 0.2).ok();
    }
}

/// Envelope and timbre for a note sequence
#[derive(Debug, Clone, Copy)]
struct Tone {
    wave: OscillatorType,
    /// Seconds between note onsets
    spacing: f64,
    peak: f32,
    /// Seconds to fade out
    decay: f64,
}
