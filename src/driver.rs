//! Driver loop gluing the sampler subscription to the mapper and fader.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::color::{self, color_from_load};
use crate::fader::fade;
use crate::lamp::ActuatorSink;
use crate::sampler::SamplerHandle;

/// Consume load readings and drive the lamp.
///
/// The last color sent is bootstrapped from the lamp's own reported color
/// (black when that read fails). Each reading is mapped to a target color and
/// the lamp is faded there before the next reading is taken up, so a fade is
/// never interrupted by a newer sample. Returns when the subscription closes.
#[instrument(skip_all)]
pub async fn run(sampler: SamplerHandle, sink: Arc<dyn ActuatorSink>) {
    let mut subscription = sampler.subscribe().await;

    let mut current_color = match sink.current_color().await {
        Ok(color) => color,
        Err(e) => {
            warn!("failed to read current lamp color, assuming black: {e:#}");
            color::BLACK
        }
    };

    debug!("starting driver loop from {current_color}");

    while let Some(event) = subscription.recv().await {
        let target = color_from_load(event.load);
        info!("load {}% -> {target}", event.load);

        fade(sink.as_ref(), current_color, target).await;
        current_color = target;
    }

    debug!("subscription closed, driver loop done");
}
