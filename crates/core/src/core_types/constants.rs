//! Storm constant table
//!
//! Every tunable number the phase rules use, grouped by the phase that reads
//! it. The table is fixed at engine construction and never mutated.
//!
//! # Example
//! ```
//! use storm_sim_core::StormConstants;
//!
//! let mut constants = StormConstants::default();
//! constants.brewing.brew_pressure_threshold = 1000.0;
//! assert!(constants.validate().is_ok());
//! ```

use super::WeatherState;
use crate::error::ConstantsError;
use serde::{Deserialize, Serialize};

/// Formation-phase parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewingConstants {
    /// Temperature floor and completion target (°C)
    pub brew_target_temp: f64,
    /// Temperature drop per step (°C)
    pub brew_temp_drop: f64,
    /// Pressure drop per step (hPa)
    pub brew_pressure_drop: f64,
    /// Shadow density gain per step
    pub brew_shadow_gain: f64,
    /// Wind speed and instability gain per step
    pub brew_wind_gain: f64,
    /// Humidity gain per step (% points)
    pub brew_humidity_gain: f64,
    /// Humidity needed before petrichor can be smelled (%)
    pub petrichor_humidity: f64,
    /// Soil must cool to this before petrichor is released (°C)
    pub petrichor_soil: f64,
    /// Pressure floor and completion target (hPa)
    pub brew_pressure_threshold: f64,
    /// Wind instability needed to complete formation
    pub brew_wind_instability_threshold: f64,
    /// Shadow density needed to complete formation
    pub brew_shadow_threshold: f64,
    /// Fixed wind veer per step (degrees), before the sinusoidal wobble
    pub brew_direction_step: f64,
    /// Soil cooling per step (°C)
    pub brew_soil_drop: f64,
    /// Lowest soil temperature reached while brewing (°C)
    pub brew_soil_floor: f64,
}

impl Default for BrewingConstants {
    fn default() -> Self {
        Self {
            brew_target_temp: 12.0,
            brew_temp_drop: 0.3,
            brew_pressure_drop: 0.5,
            brew_shadow_gain: 0.05,
            brew_wind_gain: 0.2,
            brew_humidity_gain: 1.5,
            petrichor_humidity: 68.0,
            petrichor_soil: 18.0,
            brew_pressure_threshold: 990.0,
            brew_wind_instability_threshold: 5.0,
            brew_shadow_threshold: 0.9,
            brew_direction_step: 7.0,
            brew_soil_drop: 0.1,
            brew_soil_floor: 10.0,
        }
    }
}

/// Electrical-buildup parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConstants {
    /// Charge accumulated per step
    pub threshold_lightning_charge_gain: f64,
    /// Charge at which a strike occurs
    pub threshold_lightning_threshold: f64,
    /// Fraction of the strike threshold drained by each strike
    pub threshold_discharge_fraction: f64,
    /// Wind speed gain per step
    pub threshold_wind_gain: f64,
    /// Wind instability gain per step
    pub threshold_instability_gain: f64,
    /// Fixed wind veer per step (degrees), before the random jitter
    pub threshold_direction_step: f64,
    /// Humidity gain per step (% points)
    pub threshold_humidity_gain: f64,
    /// Humidity considered saturated (%)
    pub threshold_saturation: f64,
    /// Wind speed considered turbulent; also caps brewing wind speed
    pub threshold_turbulent_wind: f64,
    /// Strikes required before the storm breaks
    pub threshold_min_lightning: u32,
    /// Lightning approach per step (distance units)
    pub threshold_rain_distance_drop: f64,
    /// Lightning distance at which rain becomes audible
    pub threshold_rain_sound_distance: f64,
    /// Longest thunder delay that still counts as overhead
    pub threshold_max_thunder_delay: f64,
    /// Lightning distance when the run starts
    pub initial_lightning_distance: f64,
    /// Speed of sound (distance units per delay unit)
    pub sound_speed: f64,
}

impl Default for ThresholdConstants {
    fn default() -> Self {
        Self {
            threshold_lightning_charge_gain: 8.0,
            threshold_lightning_threshold: 24.0,
            threshold_discharge_fraction: 0.7,
            threshold_wind_gain: 1.1,
            threshold_instability_gain: 0.8,
            threshold_direction_step: 23.0,
            threshold_humidity_gain: 2.2,
            threshold_saturation: 98.0,
            threshold_turbulent_wind: 18.0,
            threshold_min_lightning: 4,
            threshold_rain_distance_drop: 1.7,
            threshold_rain_sound_distance: 8.0,
            threshold_max_thunder_delay: 20.0,
            initial_lightning_distance: 18.0,
            sound_speed: 0.34,
        }
    }
}

/// Full-intensity parameters for the impact, downpour, frenzy and chaos
/// sub-stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullStormConstants {
    /// Rain burst added on impact; also the impact advance level
    pub full_vertical_burst: f64,
    /// Downpour rain cap and advance level
    pub full_downpour_intensity: f64,
    /// Frenzy lightning cap and advance level
    pub full_frenzy_frequency: f64,
    /// Turbulence ceiling reached in chaos
    pub full_turbulence_peak: f64,
    /// Rain particle density ceiling reached in chaos
    pub full_particle_density_peak: f64,

    /// Temperature drop per impact step (°C)
    pub impact_temp_drop: f64,
    /// Temperature floor during impact (°C)
    pub impact_temp_floor: f64,
    /// Downdraft gain per impact step
    pub impact_downdraft_gain: f64,

    /// Rain gain per downpour step
    pub downpour_rain_gain: f64,
    /// Base of the randomized lightning floor during downpour
    pub downpour_lightning_base: f64,
    /// Wind gain per downpour step
    pub downpour_wind_gain: f64,
    /// Wind cap during downpour
    pub downpour_wind_cap: f64,
    /// Turbulence gain per downpour step
    pub downpour_turbulence_gain: f64,
    /// Turbulence needed to leave downpour
    pub downpour_turbulence_required: f64,

    /// Lower bound of the random lightning increment in frenzy
    pub frenzy_lightning_gain_min: f64,
    /// Upper bound of the random lightning increment in frenzy
    pub frenzy_lightning_gain_max: f64,
    /// Turbulence gain per frenzy step
    pub frenzy_turbulence_gain: f64,
    /// Particle density gain per frenzy step
    pub frenzy_particle_gain: f64,
    /// Rain gain per frenzy step
    pub frenzy_rain_gain: f64,
    /// Rain cap during frenzy
    pub frenzy_rain_cap: f64,
    /// Turbulence needed to leave frenzy
    pub frenzy_turbulence_required: f64,

    /// Turbulence gain per chaos step
    pub chaos_turbulence_gain: f64,
    /// Particle density gain per chaos step
    pub chaos_particle_gain: f64,
    /// Wind gain per chaos step
    pub chaos_wind_gain: f64,
    /// Wind cap during chaos
    pub chaos_wind_cap: f64,
    /// Base of the randomized lightning floor during chaos
    pub chaos_lightning_base: f64,
    /// Width of the random band added to the chaos lightning floor
    pub chaos_lightning_spread: f64,
}

impl Default for FullStormConstants {
    fn default() -> Self {
        Self {
            full_vertical_burst: 35.0,
            full_downpour_intensity: 60.0,
            full_frenzy_frequency: 12.0,
            full_turbulence_peak: 40.0,
            full_particle_density_peak: 85.0,
            impact_temp_drop: 1.8,
            impact_temp_floor: 5.0,
            impact_downdraft_gain: 6.0,
            downpour_rain_gain: 5.0,
            downpour_lightning_base: 4.0,
            downpour_wind_gain: 2.0,
            downpour_wind_cap: 40.0,
            downpour_turbulence_gain: 3.5,
            downpour_turbulence_required: 10.0,
            frenzy_lightning_gain_min: 1.5,
            frenzy_lightning_gain_max: 3.0,
            frenzy_turbulence_gain: 4.2,
            frenzy_particle_gain: 9.0,
            frenzy_rain_gain: 4.0,
            frenzy_rain_cap: 80.0,
            frenzy_turbulence_required: 24.0,
            chaos_turbulence_gain: 2.0,
            chaos_particle_gain: 4.0,
            chaos_wind_gain: 1.5,
            chaos_wind_cap: 50.0,
            chaos_lightning_base: 10.0,
            chaos_lightning_spread: 2.5,
        }
    }
}

/// Dissipation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilenceConstants {
    /// Decay applied to every activity level per step
    pub silence_decay: f64,
    /// Level at or below which an activity counts as quiet
    pub silence_quiet_level: f64,
}

impl Default for SilenceConstants {
    fn default() -> Self {
        Self {
            silence_decay: 4.5,
            silence_quiet_level: 0.1,
        }
    }
}

/// Complete, immutable parameter table for one storm run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StormConstants {
    /// Formation phase
    pub brewing: BrewingConstants,
    /// Electrical buildup phase
    pub threshold: ThresholdConstants,
    /// Full intensity sub-stages
    pub full_storm: FullStormConstants,
    /// Dissipation
    pub silence: SilenceConstants,
}

/// Most steps a single phase goal may need under a custom table.
///
/// Each phase ends once all of its goals hold, and every goal only moves
/// toward its target, so a validated table finishes each phase within about
/// twice this many steps.
pub const MAX_GOAL_STEPS: f64 = 1_000_000.0;

impl BrewingConstants {
    fn named_values(&self) -> [(&'static str, f64); 14] {
        [
            ("brew_target_temp", self.brew_target_temp),
            ("brew_temp_drop", self.brew_temp_drop),
            ("brew_pressure_drop", self.brew_pressure_drop),
            ("brew_shadow_gain", self.brew_shadow_gain),
            ("brew_wind_gain", self.brew_wind_gain),
            ("brew_humidity_gain", self.brew_humidity_gain),
            ("petrichor_humidity", self.petrichor_humidity),
            ("petrichor_soil", self.petrichor_soil),
            ("brew_pressure_threshold", self.brew_pressure_threshold),
            ("brew_wind_instability_threshold", self.brew_wind_instability_threshold),
            ("brew_shadow_threshold", self.brew_shadow_threshold),
            ("brew_direction_step", self.brew_direction_step),
            ("brew_soil_drop", self.brew_soil_drop),
            ("brew_soil_floor", self.brew_soil_floor),
        ]
    }
}

impl ThresholdConstants {
    fn named_values(&self) -> [(&'static str, f64); 14] {
        [
            ("threshold_lightning_charge_gain", self.threshold_lightning_charge_gain),
            ("threshold_lightning_threshold", self.threshold_lightning_threshold),
            ("threshold_discharge_fraction", self.threshold_discharge_fraction),
            ("threshold_wind_gain", self.threshold_wind_gain),
            ("threshold_instability_gain", self.threshold_instability_gain),
            ("threshold_direction_step", self.threshold_direction_step),
            ("threshold_humidity_gain", self.threshold_humidity_gain),
            ("threshold_saturation", self.threshold_saturation),
            ("threshold_turbulent_wind", self.threshold_turbulent_wind),
            ("threshold_rain_distance_drop", self.threshold_rain_distance_drop),
            ("threshold_rain_sound_distance", self.threshold_rain_sound_distance),
            ("threshold_max_thunder_delay", self.threshold_max_thunder_delay),
            ("initial_lightning_distance", self.initial_lightning_distance),
            ("sound_speed", self.sound_speed),
        ]
    }
}

impl FullStormConstants {
    fn named_values(&self) -> [(&'static str, f64); 27] {
        [
            ("full_vertical_burst", self.full_vertical_burst),
            ("full_downpour_intensity", self.full_downpour_intensity),
            ("full_frenzy_frequency", self.full_frenzy_frequency),
            ("full_turbulence_peak", self.full_turbulence_peak),
            ("full_particle_density_peak", self.full_particle_density_peak),
            ("impact_temp_drop", self.impact_temp_drop),
            ("impact_temp_floor", self.impact_temp_floor),
            ("impact_downdraft_gain", self.impact_downdraft_gain),
            ("downpour_rain_gain", self.downpour_rain_gain),
            ("downpour_lightning_base", self.downpour_lightning_base),
            ("downpour_wind_gain", self.downpour_wind_gain),
            ("downpour_wind_cap", self.downpour_wind_cap),
            ("downpour_turbulence_gain", self.downpour_turbulence_gain),
            ("downpour_turbulence_required", self.downpour_turbulence_required),
            ("frenzy_lightning_gain_min", self.frenzy_lightning_gain_min),
            ("frenzy_lightning_gain_max", self.frenzy_lightning_gain_max),
            ("frenzy_turbulence_gain", self.frenzy_turbulence_gain),
            ("frenzy_particle_gain", self.frenzy_particle_gain),
            ("frenzy_rain_gain", self.frenzy_rain_gain),
            ("frenzy_rain_cap", self.frenzy_rain_cap),
            ("frenzy_turbulence_required", self.frenzy_turbulence_required),
            ("chaos_turbulence_gain", self.chaos_turbulence_gain),
            ("chaos_particle_gain", self.chaos_particle_gain),
            ("chaos_wind_gain", self.chaos_wind_gain),
            ("chaos_wind_cap", self.chaos_wind_cap),
            ("chaos_lightning_base", self.chaos_lightning_base),
            ("chaos_lightning_spread", self.chaos_lightning_spread),
        ]
    }
}

impl SilenceConstants {
    fn named_values(&self) -> [(&'static str, f64); 2] {
        [
            ("silence_decay", self.silence_decay),
            ("silence_quiet_level", self.silence_quiet_level),
        ]
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConstantsError> {
    if !value.is_finite() {
        return Err(ConstantsError::NonFinite { name, value });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConstantsError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConstantsError::NonPositive { name, value });
    }
    Ok(())
}

fn within(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConstantsError> {
    if !(min..=max).contains(&value) {
        return Err(ConstantsError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn at_most(
    name: &'static str,
    value: f64,
    limit_name: &'static str,
    limit: f64,
) -> Result<(), ConstantsError> {
    if value.is_nan() || limit.is_nan() || value > limit {
        return Err(ConstantsError::Unreachable {
            name,
            value,
            limit_name,
            limit,
        });
    }
    Ok(())
}

/// A quantity climbing from `from` by `rate` per step must reach `to`
/// within [`MAX_GOAL_STEPS`].
fn rises(name: &'static str, from: f64, to: f64, rate: f64) -> Result<(), ConstantsError> {
    if to <= from {
        return Ok(());
    }
    // An increment below one ulp of the running value is rounded away
    let magnitude = from.abs().max(to.abs());
    let steps = if rate > magnitude * f64::EPSILON {
        (to - from) / rate
    } else {
        f64::INFINITY
    };
    if steps > MAX_GOAL_STEPS {
        return Err(ConstantsError::Stalled {
            name,
            steps,
            limit: MAX_GOAL_STEPS,
        });
    }
    Ok(())
}

/// Mirror of [`rises`] for a quantity falling by `rate` per step.
fn falls(name: &'static str, from: f64, to: f64, rate: f64) -> Result<(), ConstantsError> {
    rises(name, -from, -to, rate)
}

impl StormConstants {
    /// Check that every phase predicate stays reachable.
    ///
    /// The default table always passes. Custom tables are rejected when a
    /// value is NaN or infinite, when a driving rate is non-positive, when a
    /// cap sits below the level a transition waits for, or when a goal would
    /// take more than [`MAX_GOAL_STEPS`] steps (including rates too small to
    /// move the value they drive at all).
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstantsError`] found, checking phases in run order.
    pub fn validate(&self) -> Result<(), ConstantsError> {
        let values = self
            .brewing
            .named_values()
            .into_iter()
            .chain(self.threshold.named_values())
            .chain(self.full_storm.named_values())
            .chain(self.silence.named_values());
        for (name, value) in values {
            finite(name, value)?;
        }

        self.validate_brewing()?;
        self.validate_threshold()?;
        self.validate_full_storm()?;
        self.validate_silence()
    }

    fn validate_brewing(&self) -> Result<(), ConstantsError> {
        let b = &self.brewing;
        let start = WeatherState::initial();
        positive("brew_temp_drop", b.brew_temp_drop)?;
        positive("brew_pressure_drop", b.brew_pressure_drop)?;
        positive("brew_shadow_gain", b.brew_shadow_gain)?;
        positive("brew_wind_gain", b.brew_wind_gain)?;
        positive("brew_humidity_gain", b.brew_humidity_gain)?;
        positive("brew_soil_drop", b.brew_soil_drop)?;
        positive("brew_direction_step", b.brew_direction_step)?;
        within("petrichor_humidity", b.petrichor_humidity, 0.0, 100.0)?;
        within("brew_shadow_threshold", b.brew_shadow_threshold, 0.0, 1.0)?;
        at_most(
            "brew_soil_floor",
            b.brew_soil_floor,
            "petrichor_soil",
            b.petrichor_soil,
        )?;

        falls(
            "brew_target_temp",
            start.temperature,
            b.brew_target_temp,
            b.brew_temp_drop,
        )?;
        falls(
            "brew_pressure_threshold",
            start.pressure,
            b.brew_pressure_threshold,
            b.brew_pressure_drop,
        )?;
        rises(
            "brew_wind_instability_threshold",
            start.wind_instability,
            b.brew_wind_instability_threshold,
            b.brew_wind_gain,
        )?;
        rises(
            "brew_shadow_threshold",
            start.shadow_density,
            b.brew_shadow_threshold,
            b.brew_shadow_gain,
        )?;
        rises(
            "petrichor_humidity",
            start.humidity,
            b.petrichor_humidity,
            b.brew_humidity_gain,
        )?;
        falls(
            "petrichor_soil",
            start.soil_temperature,
            b.petrichor_soil,
            b.brew_soil_drop,
        )
    }

    fn validate_threshold(&self) -> Result<(), ConstantsError> {
        let t = &self.threshold;
        let start = WeatherState::initial();
        positive("threshold_lightning_charge_gain", t.threshold_lightning_charge_gain)?;
        positive("threshold_lightning_threshold", t.threshold_lightning_threshold)?;
        within(
            "threshold_discharge_fraction",
            t.threshold_discharge_fraction,
            f64::MIN_POSITIVE,
            1.0,
        )?;
        positive("threshold_wind_gain", t.threshold_wind_gain)?;
        positive("threshold_turbulent_wind", t.threshold_turbulent_wind)?;
        positive("threshold_direction_step", t.threshold_direction_step)?;
        positive("threshold_humidity_gain", t.threshold_humidity_gain)?;
        within("threshold_saturation", t.threshold_saturation, 0.0, 100.0)?;
        positive("threshold_rain_distance_drop", t.threshold_rain_distance_drop)?;
        positive("sound_speed", t.sound_speed)?;
        // Lightning distance bottoms out at 1.0
        at_most(
            "minimum thunder delay",
            1.0 / t.sound_speed,
            "threshold_max_thunder_delay",
            t.threshold_max_thunder_delay,
        )?;
        at_most(
            "closest lightning distance",
            1.0,
            "threshold_rain_sound_distance",
            t.threshold_rain_sound_distance,
        )?;

        // At most one strike per step, and every strike after the first
        // needs the drained part of the threshold charged back
        let strikes = f64::from(t.threshold_min_lightning);
        if strikes > MAX_GOAL_STEPS {
            return Err(ConstantsError::Stalled {
                name: "threshold_min_lightning",
                steps: strikes,
                limit: MAX_GOAL_STEPS,
            });
        }
        if t.threshold_min_lightning > 0 {
            let charge_needed = t.threshold_lightning_threshold
                * (1.0 + (strikes - 1.0) * t.threshold_discharge_fraction);
            rises(
                "threshold_min_lightning",
                0.0,
                charge_needed,
                t.threshold_lightning_charge_gain,
            )?;
        }

        let overhead_distance = (t.threshold_max_thunder_delay * t.sound_speed).max(1.0);
        falls(
            "threshold_max_thunder_delay",
            t.initial_lightning_distance,
            overhead_distance,
            t.threshold_rain_distance_drop,
        )?;
        falls(
            "threshold_rain_sound_distance",
            t.initial_lightning_distance,
            t.threshold_rain_sound_distance,
            t.threshold_rain_distance_drop,
        )?;
        // Brewing leaves wind between calm and the turbulent level
        rises(
            "threshold_turbulent_wind",
            start.wind_speed,
            t.threshold_turbulent_wind,
            t.threshold_wind_gain,
        )?;
        rises(
            "threshold_saturation",
            start.humidity,
            t.threshold_saturation,
            t.threshold_humidity_gain,
        )
    }

    fn validate_full_storm(&self) -> Result<(), ConstantsError> {
        let f = &self.full_storm;
        positive("full_vertical_burst", f.full_vertical_burst)?;
        positive("downpour_rain_gain", f.downpour_rain_gain)?;
        positive("downpour_turbulence_gain", f.downpour_turbulence_gain)?;
        positive("frenzy_lightning_gain_min", f.frenzy_lightning_gain_min)?;
        at_most(
            "frenzy_lightning_gain_min",
            f.frenzy_lightning_gain_min,
            "frenzy_lightning_gain_max",
            f.frenzy_lightning_gain_max,
        )?;
        positive("frenzy_turbulence_gain", f.frenzy_turbulence_gain)?;
        within("frenzy_particle_gain", f.frenzy_particle_gain, 0.0, f64::MAX)?;
        at_most(
            "frenzy_turbulence_required",
            f.frenzy_turbulence_required,
            "full_turbulence_peak",
            f.full_turbulence_peak,
        )?;
        at_most(
            "full_downpour_intensity",
            f.full_downpour_intensity,
            "frenzy_rain_cap",
            f.frenzy_rain_cap,
        )?;
        positive("chaos_turbulence_gain", f.chaos_turbulence_gain)?;
        positive("chaos_particle_gain", f.chaos_particle_gain)?;

        // Impact always takes one step and leaves exactly the burst as rain
        rises(
            "full_downpour_intensity",
            f.full_vertical_burst,
            f.full_downpour_intensity,
            f.downpour_rain_gain,
        )?;
        rises(
            "downpour_turbulence_required",
            0.0,
            f.downpour_turbulence_required,
            f.downpour_turbulence_gain,
        )?;
        rises(
            "full_frenzy_frequency",
            0.0,
            f.full_frenzy_frequency,
            f.frenzy_lightning_gain_min,
        )?;
        rises(
            "frenzy_turbulence_required",
            0.0,
            f.frenzy_turbulence_required,
            f.frenzy_turbulence_gain,
        )?;
        rises(
            "full_turbulence_peak",
            0.0,
            f.full_turbulence_peak,
            f.chaos_turbulence_gain,
        )?;
        rises(
            "full_particle_density_peak",
            0.0,
            f.full_particle_density_peak,
            f.chaos_particle_gain,
        )
    }

    /// Highest activity level the storm can carry into silence.
    fn loudest_level(&self) -> f64 {
        let f = &self.full_storm;
        [
            f.frenzy_rain_cap,
            f.chaos_wind_cap,
            f.full_turbulence_peak,
            f.full_frenzy_frequency,
            f.chaos_lightning_base + f.chaos_lightning_spread.max(0.0),
            f.full_particle_density_peak,
            f.impact_downdraft_gain,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }

    fn validate_silence(&self) -> Result<(), ConstantsError> {
        let s = &self.silence;
        positive("silence_decay", s.silence_decay)?;
        within("silence_quiet_level", s.silence_quiet_level, 0.0, f64::MAX)?;
        falls(
            "silence_decay",
            self.loudest_level(),
            s.silence_quiet_level,
            s.silence_decay,
        )
    }
}
