//! Formation phase
//!
//! The air column cools and loses pressure while moisture, wind and cloud
//! build. Cooling soil under rising humidity releases petrichor, the last
//! ingredient before the storm can start charging.

use super::StepContext;
use crate::core_types::{StormConstants, WeatherState};

pub(crate) fn update(ctx: &mut StepContext<'_>) {
    let c = &ctx.constants.brewing;
    let turbulent_wind = ctx.constants.threshold.threshold_turbulent_wind;
    let s = &mut *ctx.state;

    s.temperature = (s.temperature - c.brew_temp_drop).max(c.brew_target_temp);
    s.pressure = (s.pressure - c.brew_pressure_drop).max(c.brew_pressure_threshold);
    s.wind_instability += c.brew_wind_gain;
    s.wind_speed = (s.wind_speed + c.brew_wind_gain).min(turbulent_wind);

    // Deterministic wobble keyed to the step index
    let wobble = (ctx.iteration as f64).sin();
    s.wind_direction = (s.wind_direction + c.brew_direction_step + wobble).rem_euclid(360.0);

    s.humidity = (s.humidity + c.brew_humidity_gain).min(100.0);
    s.soil_temperature = (s.soil_temperature - c.brew_soil_drop).max(c.brew_soil_floor);
    s.shadow_density = (s.shadow_density + c.brew_shadow_gain).min(1.0);

    if !s.petrichor_detected
        && s.humidity >= c.petrichor_humidity
        && s.soil_temperature <= c.petrichor_soil
    {
        s.petrichor_detected = true;
    }
}

pub(crate) fn is_complete(s: &WeatherState, constants: &StormConstants) -> bool {
    let c = &constants.brewing;
    s.temperature <= c.brew_target_temp
        && s.pressure <= c.brew_pressure_threshold
        && s.wind_instability >= c.brew_wind_instability_threshold
        && s.shadow_density >= c.brew_shadow_threshold
        && s.petrichor_detected
}
