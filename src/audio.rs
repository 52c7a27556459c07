//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Snake ate food
    Eat,
    /// Snake crashed
    GameOver,
    /// New high score
    HighScore,
    /// Pause toggled on
    Pause,
    /// Pause toggled off / new run
    Resume,
}

impl SoundEffect {
    /// Effect to play for a session event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::FoodEaten { .. } => Some(SoundEffect::Eat),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::Paused => Some(SoundEffect::Pause),
            GameEvent::Resumed | GameEvent::Restarted => Some(SoundEffect::Resume),
        }
    }
}

/// One note of an arpeggio
struct Note {
    freq: f32,
    delay: f64,
    length: f64,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Set volume (0.0 - 1.0). Zero mutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Eat => self.play_eat(ctx, vol),
            SoundEffect::GameOver => self.play_notes(
                ctx,
                vol * 0.3,
                OscillatorType::Sine,
                &[
                    Note { freq: 400.0, delay: 0.0, length: 0.3 },
                    Note { freq: 350.0, delay: 0.2, length: 0.3 },
                    Note { freq: 300.0, delay: 0.4, length: 0.3 },
                    Note { freq: 200.0, delay: 0.6, length: 0.5 },
                ],
            ),
            SoundEffect::HighScore => self.play_notes(
                ctx,
                vol * 0.25,
                OscillatorType::Triangle,
                &[
                    Note { freq: 500.0, delay: 0.9, length: 0.25 },
                    Note { freq: 600.0, delay: 0.98, length: 0.25 },
                    Note { freq: 700.0, delay: 1.06, length: 0.25 },
                    Note { freq: 800.0, delay: 1.14, length: 0.25 },
                    Note { freq: 1000.0, delay: 1.22, length: 0.4 },
                ],
            ),
            SoundEffect::Pause => self.play_notes(
                ctx,
                vol * 0.2,
                OscillatorType::Sine,
                &[
                    Note { freq: 600.0, delay: 0.0, length: 0.08 },
                    Note { freq: 450.0, delay: 0.08, length: 0.1 },
                ],
            ),
            SoundEffect::Resume => self.play_notes(
                ctx,
                vol * 0.2,
                OscillatorType::Sine,
                &[
                    Note { freq: 450.0, delay: 0.0, length: 0.08 },
                    Note { freq: 600.0, delay: 0.08, length: 0.1 },
                ],
            ),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Eat - short rising blip
    fn play_eat(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1040.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Sequence of decaying notes
    fn play_notes(&self, ctx: &AudioContext, peak: f32, osc_type: OscillatorType, notes: &[Note]) {
        for note in notes {
            if let Some((osc, gain)) = self.create_osc(ctx, note.freq, osc_type) {
                let t = ctx.current_time() + note.delay;
                gain.gain().set_value_at_time(peak, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + note.length)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + note.length + 0.1).ok();
            }
        }
    }
}
