//! Storm weather state vector
//!
//! A flat aggregate of the scalar quantities that describe the storm at one
//! instant. The engine mutates it in place; callers only ever read it.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Instantaneous condition of the storm cell.
///
/// Bounded fields are clamped inline by the phase that updates them, so every
/// value read between steps is inside its documented interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Surface pressure (hPa)
    pub pressure: f64,
    /// Wind speed (arbitrary speed units)
    pub wind_speed: f64,
    /// Wind direction in degrees, always in [0, 360)
    pub wind_direction: f64,
    /// Accumulated wind instability
    pub wind_instability: f64,
    /// Relative humidity (%), bounded [0, 100]
    pub humidity: f64,
    /// Soil temperature (°C)
    pub soil_temperature: f64,
    /// Cloud-cover proxy, bounded [0, 1]
    pub shadow_density: f64,
    /// Latch: set once the damp-soil smell is detected
    pub petrichor_detected: bool,
    /// Number of lightning discharges so far
    pub lightning_events: u32,
    /// Seconds between flash and thunder, derived from lightning distance
    pub thunder_delay: f64,
    /// Latch: set once rain is audible
    pub rain_sound_detected: bool,
    /// Rain intensity, bounded [0, 80]
    pub rain_intensity: f64,
    /// Downdraft strength, never negative
    pub downdraft_force: f64,
    /// Lightning flashes per step
    pub lightning_frequency: f64,
    /// Turbulence level
    pub turbulence: f64,
    /// Rain particle density
    pub rain_particle_density: f64,
}

impl WeatherState {
    /// Calm pre-storm conditions every run starts from.
    pub fn initial() -> Self {
        Self {
            temperature: 20.0,
            pressure: 1012.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            wind_instability: 0.0,
            humidity: 45.0,
            soil_temperature: 20.0,
            shadow_density: 0.1,
            petrichor_detected: false,
            lightning_events: 0,
            thunder_delay: 0.0,
            rain_sound_detected: false,
            rain_intensity: 0.0,
            downdraft_force: 0.0,
            lightning_frequency: 0.0,
            turbulence: 0.0,
            rain_particle_density: 0.0,
        }
    }

    /// Wind as a 2D vector `(east, north)`.
    ///
    /// Direction is measured clockwise from north, matching the
    /// compass convention used for `wind_direction`.
    pub fn wind_vector(&self) -> Vector2<f64> {
        let radians = self.wind_direction.to_radians();
        Vector2::new(
            self.wind_speed * radians.sin(),
            self.wind_speed * radians.cos(),
        )
    }

    /// The six quantities that must die down before the storm ends.
    pub fn activity_levels(&self) -> [f64; 6] {
        [
            self.rain_intensity,
            self.wind_speed,
            self.turbulence,
            self.lightning_frequency,
            self.rain_particle_density,
            self.downdraft_force,
        ]
    }
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::initial()
    }
}
