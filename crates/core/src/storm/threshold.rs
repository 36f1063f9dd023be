//! Electrical buildup phase
//!
//! Charge accumulates every step and discharges as a lightning strike once it
//! crosses the strike threshold. Only part of the threshold is drained, so the
//! remainder carries into the next cycle and strikes arrive at uneven
//! intervals. Meanwhile the strikes close in, the thunder delay shrinks, and
//! the air saturates.

use super::StepContext;
use crate::core_types::{StormConstants, WeatherState};
use tracing::trace;

/// Lightning never gets closer than this.
pub(crate) const MIN_LIGHTNING_DISTANCE: f64 = 1.0;

pub(crate) fn update(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.threshold;
    let s = &mut *ctx.state;

    *ctx.charge += c.threshold_lightning_charge_gain;
    if *ctx.charge >= c.threshold_lightning_threshold {
        s.lightning_events += 1;
        *ctx.charge -= c.threshold_lightning_threshold * c.threshold_discharge_fraction;
        trace!(
            "Lightning strike #{} at step {}, residual charge {:.2}",
            s.lightning_events,
            ctx.iteration,
            *ctx.charge
        );
    }

    s.wind_speed += c.threshold_wind_gain;
    let jitter = ctx.rng.next_uniform();
    s.wind_direction = (s.wind_direction + c.threshold_direction_step + jitter).rem_euclid(360.0);
    s.wind_instability += c.threshold_instability_gain;

    *ctx.lightning_distance =
        (*ctx.lightning_distance - c.threshold_rain_distance_drop).max(MIN_LIGHTNING_DISTANCE);
    s.thunder_delay = *ctx.lightning_distance / c.sound_speed;
    if *ctx.lightning_distance <= c.threshold_rain_sound_distance {
        s.rain_sound_detected = true;
    }

    s.humidity = (s.humidity + c.threshold_humidity_gain).min(100.0);
}

pub(crate) fn is_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let c = &constants.threshold;
    s.lightning_events >= c.threshold_min_lightning
        && s.thunder_delay <= c.threshold_max_thunder_delay
        && s.wind_speed >= c.threshold_turbulent_wind
        && s.rain_sound_detected
        && s.humidity >= c.threshold_saturation
}
