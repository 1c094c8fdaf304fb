//! Stepped color fades.
//!
//! A fade walks the lamp from one color to another one unit of channel
//! distance per step, all three channels in lockstep, one actuator call per
//! step. No easing, no skipped frames.

use tracing::error;

use crate::color::Rgb;
use crate::lamp::ActuatorSink;

/// Move one unit toward the target channel value.
fn step_toward(current: u8, target: u8) -> u8 {
    if current < target {
        current + 1
    } else if current > target {
        current - 1
    } else {
        target
    }
}

/// Fade the lamp from `from` to `to`.
///
/// Issues exactly `max(|ΔR|, |ΔG|, |ΔB|)` actuator calls; the last call's
/// argument is `to`. Equal endpoints issue no calls. Sink failures are logged
/// and ignored; the fade always runs its full step count.
pub async fn fade(sink: &dyn ActuatorSink, from: Rgb, to: Rgb) {
    let mut current = from;

    while current != to {
        current.r = step_toward(current.r, to.r);
        current.g = step_toward(current.g, to.g);
        current.b = step_toward(current.b, to.b);

        if let Err(e) = sink.set_color(current).await {
            error!("failed to set lamp color {current}: {e:#}");
        }
    }
}
