//! Procedural sound effects over Web Audio: a pop for hits and a rising
//! sparkle arpeggio for wins. No audio files are shipped.

use web_sys::{AudioContext, OscillatorType};

use crate::error::Result;

const POP_GAIN: f32 = 0.15;
const SPARKLE_GAIN: f32 = 0.12;
/// C5 E5 G5 C6
const SPARKLE_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];
const SPARKLE_STEP_S: f64 = 0.08;

/// Owns the (lazily created) audio context. When sound is disabled nothing
/// is ever created, and every failure is logged and swallowed.
#[derive(Default)]
pub struct Sfx {
    enabled: bool,
    ctx: Option<AudioContext>,
}

impl Sfx {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ctx: None }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if !self.enabled {
            return None;
        }
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("audio: AudioContext unavailable: {e:?}");
                    self.enabled = false;
                    return None;
                }
            }
        }
        self.ctx.as_ref()
    }

    pub fn pop(&mut self) {
        if let Some(ctx) = self.context() {
            if let Err(e) = play_pop(ctx) {
                log::warn!("audio: pop failed: {e}");
            }
        }
    }

    pub fn sparkle(&mut self) {
        if let Some(ctx) = self.context() {
            if let Err(e) = play_sparkle(ctx) {
                log::warn!("audio: sparkle failed: {e}");
            }
        }
    }
}

fn play_pop(ctx: &AudioContext) -> Result<()> {
    let now = ctx.current_time();
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value_at_time(880.0, now)?;
    osc.frequency().exponential_ramp_to_value_at_time(440.0, now + 0.08)?;
    gain.gain().set_value_at_time(POP_GAIN, now)?;
    gain.gain().exponential_ramp_to_value_at_time(0.001, now + 0.12)?;
    osc.start_with_when(now)?;
    osc.stop_with_when(now + 0.12)?;
    Ok(())
}

fn play_sparkle(ctx: &AudioContext) -> Result<()> {
    let now = ctx.current_time();
    for (i, freq) in SPARKLE_NOTES.iter().enumerate() {
        let t = now + i as f64 * SPARKLE_STEP_S;
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value_at_time(*freq, now)?;
        gain.gain().set_value_at_time(0.0, t)?;
        gain.gain().linear_ramp_to_value_at_time(SPARKLE_GAIN, t + 0.02)?;
        gain.gain().exponential_ramp_to_value_at_time(0.001, t + 0.25)?;
        osc.start_with_when(t)?;
        osc.stop_with_when(t + 0.25)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sfx_never_builds_a_context() {
        let mut sfx = Sfx::new(false);
        sfx.pop();
        sfx.sparkle();
        assert!(sfx.ctx.is_none());
        assert!(!sfx.enabled());
    }

    #[test]
    fn sparkle_notes_rise() {
        assert!(SPARKLE_NOTES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(SPARKLE_NOTES[3], SPARKLE_NOTES[0] * 2.0);
    }
}
