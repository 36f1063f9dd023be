//! Full-intensity sub-stages
//!
//! Impact, downpour, frenzy, chaos and silence each have their own update and
//! advance predicate. Only the active sub-stage runs on a given step.

use super::StepContext;
use crate::core_types::{StormConstants, WeatherState};

pub(crate) fn impact(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.full_storm;
    let s = &mut *ctx.state;

    s.rain_intensity += c.full_vertical_burst;
    s.temperature = (s.temperature - c.impact_temp_drop).max(c.impact_temp_floor);
    s.downdraft_force += c.impact_downdraft_gain;
}

pub(crate) fn impact_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    s.rain_intensity >= constants.full_storm.full_vertical_burst
}

pub(crate) fn downpour(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.full_storm;
    let s = &mut *ctx.state;

    s.rain_intensity = (s.rain_intensity + c.downpour_rain_gain).min(c.full_downpour_intensity);
    let floor = c.downpour_lightning_base + ctx.rng.next_uniform();
    s.lightning_frequency = s.lightning_frequency.max(floor);
    s.wind_speed = (s.wind_speed + c.downpour_wind_gain).min(c.downpour_wind_cap);
    s.turbulence += c.downpour_turbulence_gain;
}

pub(crate) fn downpour_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let c = &constants.full_storm;
    s.rain_intensity >= c.full_downpour_intensity && s.turbulence >= c.downpour_turbulence_required
}

pub(crate) fn frenzy(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.full_storm;
    let s = &mut *ctx.state;

    let surge = ctx
        .rng
        .uniform(c.frenzy_lightning_gain_min, c.frenzy_lightning_gain_max);
    s.lightning_frequency = (s.lightning_frequency + surge).min(c.full_frenzy_frequency);
    s.turbulence = (s.turbulence + c.frenzy_turbulence_gain).min(c.full_turbulence_peak);
    s.rain_particle_density =
        (s.rain_particle_density + c.frenzy_particle_gain).min(c.full_particle_density_peak);
    s.rain_intensity = (s.rain_intensity + c.frenzy_rain_gain).min(c.frenzy_rain_cap);
}

pub(crate) fn frenzy_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let c = &constants.full_storm;
    s.lightning_frequency >= c.full_frenzy_frequency
        && s.turbulence >= c.frenzy_turbulence_required
}

pub(crate) fn chaos(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.full_storm;
    let s = &mut *ctx.state;

    s.turbulence = (s.turbulence + c.chaos_turbulence_gain).min(c.full_turbulence_peak);
    s.rain_particle_density =
        (s.rain_particle_density + c.chaos_particle_gain).min(c.full_particle_density_peak);
    s.wind_speed = (s.wind_speed + c.chaos_wind_gain).min(c.chaos_wind_cap);
    let floor = c.chaos_lightning_base + ctx.rng.uniform(0.0, c.chaos_lightning_spread);
    s.lightning_frequency = s.lightning_frequency.max(floor);
}

pub(crate) fn chaos_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let c = &constants.full_storm;
    s.turbulence >= c.full_turbulence_peak
        && s.rain_particle_density >= c.full_particle_density_peak
}

pub(crate) fn silence(ctx: &mut StepContext<'_>) {
    let decay = ctx.constants.silence.silence_decay;
    let s = &mut *ctx.state;

    for level in [
        &mut s.rain_intensity,
        &mut s.wind_speed,
        &mut s.turbulence,
        &mut s.lightning_frequency,
        &mut s.rain_particle_density,
        &mut s.downdraft_force,
    ] {
        *level = (*level - decay).max(0.0);
    }
}

pub(crate) fn silence_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let quiet = constants.silence.silence_quiet_level;
    s.activity_levels().iter().all(|&level| level <= quiet)
}
