//! Brewing completion gate
//!
//! Runs only the formation phase with constants chosen so that temperature,
//! pressure, shadow and petrichor are all satisfied on the first step. Wind
//! instability is then the last condition standing, which shows the
//! transition waits for the whole conjunction.

use storm_sim_core::{Phase, StormConstants, StormEngine};

fn quick_brewing_constants() -> StormConstants {
    let mut constants = StormConstants::default();
    let b = &mut constants.brewing;
    b.brew_target_temp = 19.8;
    b.brew_pressure_threshold = 1011.5;
    b.brew_shadow_threshold = 0.12;
    b.petrichor_humidity = 46.0;
    b.petrichor_soil = 19.95;
    constants
}

/// Step while brewing; return the index of the step that left it.
fn brew_until_complete(engine: &mut StormEngine) -> u64 {
    loop {
        let iteration = engine.iteration();
        let transition = engine.step();

        let s = engine.state();
        let c = &engine.constants().brewing;
        // Everything but instability holds from the first step on
        assert!(s.temperature <= c.brew_target_temp);
        assert!(s.pressure <= c.brew_pressure_threshold);
        assert!(s.shadow_density >= c.brew_shadow_threshold);
        assert!(s.petrichor_detected);

        if let Some(t) = transition {
            assert_eq!(t.from, Phase::Brewing);
            assert_eq!(t.to, Phase::Threshold);
            return iteration;
        }
        assert!(
            s.wind_instability < c.brew_wind_instability_threshold,
            "instability met at step {iteration} without a transition"
        );
    }
}

#[test]
fn wind_instability_gates_the_transition() {
    let mut engine = StormEngine::with_constants(quick_brewing_constants(), 0).unwrap();
    let done_at = brew_until_complete(&mut engine);

    // ceil(5.0 / 0.2) = 25 steps at the earliest; float accumulation may add one
    let steps = done_at + 1;
    assert!((25..=26).contains(&steps), "brewing took {steps} steps");
    assert!(engine.state().wind_instability >= 5.0);
    assert_eq!(engine.phase(), Phase::Threshold);
}

#[test]
fn exact_gain_completes_on_the_exact_step() {
    let mut constants = quick_brewing_constants();
    constants.brewing.brew_wind_gain = 0.25;
    let mut engine = StormEngine::with_constants(constants, 0).unwrap();

    let done_at = brew_until_complete(&mut engine);
    assert_eq!(done_at + 1, 20);
    assert_eq!(engine.state().wind_instability, 5.0);
}

#[test]
fn no_randomness_is_consumed_while_brewing() {
    // Brewing output is identical across seeds
    let mut a = StormEngine::with_constants(quick_brewing_constants(), 1).unwrap();
    let mut b = StormEngine::with_constants(quick_brewing_constants(), 2).unwrap();
    brew_until_complete(&mut a);
    brew_until_complete(&mut b);
    assert_eq!(a.state(), b.state());
}
