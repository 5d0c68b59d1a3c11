//! Audio system using Web Audio API
//!
//! Short procedurally generated chimes, no sound files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::SessionEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A step was completed ("pico")
    StepComplete,
    /// Picture fully revealed
    Goal,
    /// New stamp earned
    Stamp,
}

impl SoundEffect {
    /// The chime for a session event, if it has one
    pub fn for_event(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::StepCompleted { .. } => Some(SoundEffect::StepComplete),
            SessionEvent::Solved { .. } => Some(SoundEffect::Goal),
            SessionEvent::StampAwarded { .. } => Some(SoundEffect::Stamp),
            SessionEvent::ProgressReset => None,
        }
    }
}

const MASTER_VOLUME: f32 = 1.0;

/// C5, E5, G5, C6
const GOAL_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];

pub struct AudioManager {
    ctx: Option<AudioContext>,
    enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play(&self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::StepComplete => self.play_step(ctx, MASTER_VOLUME),
            SoundEffect::Goal => self.play_goal(ctx, MASTER_VOLUME),
            SoundEffect::Stamp => self.play_stamp(ctx, MASTER_VOLUME),
        }
    }

    /// Create an oscillator routed through a gain node
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

    /// Rising blip
    fn play_step(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1320.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Major arpeggio
    fn play_goal(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in GOAL_NOTES.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * 0.15;

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.25, t + 0.05)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.6).ok();
        }
    }

    /// Two bright taps, played after the goal arpeggio
    fn play_stamp(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [1568.0, 2093.0].iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                continue;
            };
            let t = ctx.current_time() + 0.8 + i as f64 * 0.12;

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}
