use super::*;
use crate::container::{ApiVersion, Trace};
use crate::model::{
    AnalysisConfig, BlockTemplate, CaSensor, EnergyParameters, FusionModel, PulseSchedule,
    SensorTopology,
};
use proptest::prelude::*;

const SEED: u32 = 1;
const STEP: f64 = 1e-6;

fn config(
    vesicles: &[&str],
    sensors: Vec<CaSensor>,
    fusion: FusionModel,
    pulses: PulseSchedule,
) -> AnalysisConfig {
    let topology = SensorTopology::new(
        vesicles.iter().map(|v| v.to_string()).collect(),
        sensors,
        BlockTemplate::default(),
    )
    .unwrap();
    AnalysisConfig::new(topology, fusion, pulses).unwrap()
}

/// Trace holding one block per (vesicle, site) of `config`, filled by `sample`
fn synthetic_trace(
    config: &AnalysisConfig,
    iterations: usize,
    sample: impl Fn(&str, usize, u32, usize) -> f64,
) -> Trace {
    let topology = config.topology();
    let mut blocks = Vec::new();
    for vesicle in topology.vesicle_ids() {
        for (sensor_index, sensor) in topology.sensors().iter().enumerate() {
            for &site in &sensor.sites {
                let name = topology.block_name(vesicle, sensor.site_type, site, SEED);
                let values = (0..iterations)
                    .map(|t| sample(vesicle, sensor_index, site, t))
                    .collect();
                blocks.push((name, values));
            }
        }
    }
    Trace::new(ApiVersion::V2, STEP, iterations as u64, blocks).unwrap()
}

#[test]
fn test_constant_occupancy_releases_immediately() {
    let config = config(
        &["1_1"],
        vec![CaSensor::syt(&[0, 1, 2])],
        FusionModel::deterministic(1, 1, 1),
        PulseSchedule::default(),
    );
    let trace = synthetic_trace(&config, 10, |_, _, _, _| 1.0);

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].released());
    assert_eq!(outcomes[0].latency(), Some(0.0));
    assert!(outcomes[0].failure().is_none());
}

#[test]
fn test_missing_block_fails_only_that_vesicle() {
    let config = config(
        &["1_1", "1_2", "2_1"],
        vec![CaSensor::syt(&[3, 4])],
        FusionModel::deterministic(1, 1, 2),
        PulseSchedule::default(),
    );
    let full = synthetic_trace(&config, 5, |_, _, _, t| if t >= 2 { 1.0 } else { 0.0 });
    let dropped = config
        .topology()
        .block_name("1_2", crate::model::SiteType::Syt, 4, SEED);
    let blocks = full
        .blocks()
        .filter(|(name, _)| *name != dropped)
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect();
    let trace = Trace::new(ApiVersion::V1, STEP, 5, blocks).unwrap();

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    let ids: Vec<_> = outcomes.iter().map(|o| o.vesicle_id.as_str()).collect();
    assert_eq!(ids, ["1_1", "1_2", "2_1"]);

    assert_eq!(
        outcomes[1].failure(),
        Some(&AnalysisFailure::MissingData { block: dropped })
    );
    assert!(!outcomes[1].released());
    for outcome in [&outcomes[0], &outcomes[2]] {
        assert!(outcome.released());
        assert!((outcome.latency().unwrap() - 2.0 * STEP).abs() < 1e-15);
    }
}

#[test]
fn test_no_activation_is_not_released_rather_than_failed() {
    let config = config(
        &["1_1"],
        vec![CaSensor::syt(&[0, 1]), CaSensor::syt(&[2, 3])],
        FusionModel::deterministic(2, 2, 2),
        PulseSchedule::default(),
    );
    // Sensor 0 is fully bound throughout, sensor 1 never more than one site
    let trace = synthetic_trace(&config, 20, |_, sensor, site, _| {
        if sensor == 0 || site == 2 {
            1.0
        } else {
            0.0
        }
    });

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    assert_eq!(outcomes[0].outcome, Outcome::NotReleased);
    assert_eq!(outcomes[0].latency(), None);
    assert!(outcomes[0].failure().is_none());
}

#[test]
fn test_analysis_is_idempotent() {
    let config = config(
        &["a", "b"],
        vec![CaSensor::syt(&[0, 1]), CaSensor::syt(&[2, 3])],
        FusionModel::deterministic(2, 1, 2)
            .with_energy_model(EnergyParameters::default(), 99),
        PulseSchedule::default(),
    );
    let trace = synthetic_trace(&config, 200, |vesicle, _, site, t| {
        ((t + site as usize + vesicle.len()) % 3 == 0) as u8 as f64
    });

    let detector = ReleaseDetector::new(&config);
    let first = detector.analyze(&trace, SEED);
    let second = detector.analyze(&trace, SEED);
    assert_eq!(first, second);
}

#[test]
fn test_latency_is_measured_from_pulse_onset() {
    let config = config(
        &["1_1"],
        vec![CaSensor::syt(&[0])],
        FusionModel::deterministic(1, 1, 1),
        PulseSchedule::new(3.0 * STEP, 2),
    );
    let trace = synthetic_trace(&config, 10, |_, _, _, t| (t >= 4) as u8 as f64);

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    match outcomes[0].outcome {
        Outcome::Released {
            iteration,
            time,
            latency,
            pulse,
        } => {
            assert_eq!(iteration, 4);
            assert!((time - 4.0 * STEP).abs() < 1e-15);
            assert_eq!(pulse, 1);
            assert!((latency - STEP).abs() < 1e-15);
        }
        ref other => panic!("expected release, got {:?}", other),
    }
}

#[test]
fn test_y_sites_do_not_count_toward_threshold() {
    let config = config(
        &["1_1"],
        vec![CaSensor::syt(&[0]), CaSensor::y(&[0, 1])],
        FusionModel::deterministic(1, 1, 1),
        PulseSchedule::default(),
    );
    // Only Y sites are ever bound
    let trace = synthetic_trace(&config, 10, |_, sensor, _, _| (sensor == 1) as u8 as f64);

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    assert_eq!(outcomes[0].outcome, Outcome::NotReleased);
}

#[test]
fn test_energy_model_uses_custom_hazard() {
    let config = config(
        &["1_1"],
        vec![CaSensor::syt(&[0]), CaSensor::y(&[5])],
        FusionModel::deterministic(1, 1, 1).with_energy_model(EnergyParameters::default(), 7),
        PulseSchedule::default(),
    );
    // Y site binds at iteration 6; the hazard is infinite once it does
    let trace = synthetic_trace(&config, 10, |_, sensor, _, t| {
        (sensor == 1 && t >= 6) as u8 as f64
    });
    let hazard = |activity: &ActivitySnapshot| {
        if activity.bound_y_sites >= 1.0 {
            f64::INFINITY
        } else {
            0.0
        }
    };

    let outcomes = ReleaseDetector::with_hazard(&config, hazard).analyze(&trace, SEED);
    assert!(matches!(
        outcomes[0].outcome,
        Outcome::Released { iteration: 6, .. }
    ));
}

#[test]
fn test_energy_model_zero_rate_never_fires() {
    let energy = EnergyParameters {
        base_rate: 0.0,
        ..Default::default()
    };
    let config = config(
        &["1_1", "1_2"],
        vec![CaSensor::syt(&[0, 1])],
        FusionModel::deterministic(1, 1, 1).with_energy_model(energy, 3),
        PulseSchedule::default(),
    );
    let trace = synthetic_trace(&config, 50, |_, _, _, _| 1.0);

    let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
    assert!(outcomes.iter().all(|o| o.outcome == Outcome::NotReleased));
}

#[test]
fn test_energy_model_is_reproducible_per_seed() {
    let energy = EnergyParameters {
        base_rate: 2.0e4,
        syt_energy: 1.0,
        y_site_energy: 0.0,
    };
    let config = config(
        &["1", "2", "3", "4", "5", "6"],
        vec![CaSensor::syt(&[0, 1])],
        FusionModel::deterministic(1, 1, 1).with_energy_model(energy, 11),
        PulseSchedule::default(),
    );
    let trace = synthetic_trace(&config, 500, |_, _, site, t| ((t / 7 + site as usize) % 2) as f64);

    let a = ReleaseDetector::new(&config).analyze(&trace, SEED);
    let b = ReleaseDetector::new(&config).analyze(&trace, SEED);
    assert_eq!(a, b);
    // Cumulative hazard reaches ~27 by the end, so every vesicle fuses
    assert!(a.iter().all(|o| o.released()));
}

proptest! {
    /// The threshold rule fires exactly at the first iteration where enough
    /// sensors are active, whatever sub-threshold noise precedes it.
    #[test]
    fn prop_threshold_first_passage(
        iterations in 1usize..60,
        activation_fraction in 0.0f64..1.0,
        noise in prop::collection::vec(any::<bool>(), 60),
    ) {
        let activation = ((iterations as f64) * activation_fraction) as usize;
        let config = config(
            &["v"],
            vec![CaSensor::syt(&[0, 1]), CaSensor::syt(&[2, 3])],
            FusionModel::deterministic(2, 2, 2),
            PulseSchedule::default(),
        );
        // Before activation only sensor 0 may be fully bound; sensor 1 never
        // has more than site 2 bound.
        let trace = synthetic_trace(&config, iterations, |_, sensor, site, t| {
            if t >= activation {
                1.0
            } else if sensor == 0 {
                noise[t] as u8 as f64
            } else {
                (site == 2 && noise[t]) as u8 as f64
            }
        });

        let outcomes = ReleaseDetector::new(&config).analyze(&trace, SEED);
        let released_at = match outcomes[0].outcome {
            Outcome::Released { iteration, .. } => Some(iteration),
            _ => None,
        };
        prop_assert_eq!(released_at, Some(activation as u64));
    }

    /// With zero hazard before activation, stochastic release can never
    /// precede it and fires at most once.
    #[test]
    fn prop_hazard_release_not_before_activation(
        activation in 0usize..40,
        rng_seed in any::<u64>(),
        realization in 1u32..10_000,
    ) {
        let config = config(
            &["v1", "v2"],
            vec![CaSensor::syt(&[0])],
            FusionModel::deterministic(1, 1, 1)
                .with_energy_model(EnergyParameters::default(), rng_seed),
            PulseSchedule::default(),
        );
        let topology = config.topology();
        let blocks = topology
            .vesicle_ids()
            .iter()
            .map(|v| {
                let name = topology.block_name(v, crate::model::SiteType::Syt, 0, realization);
                (name, (0..40).map(|t| (t >= activation) as u8 as f64).collect())
            })
            .collect();
        let trace = Trace::new(ApiVersion::V1, 1e-3, 40, blocks).unwrap();
        let hazard = |activity: &ActivitySnapshot| activity.active_syt as f64 * 500.0;

        let outcomes = ReleaseDetector::with_hazard(&config, hazard).analyze(&trace, realization);
        prop_assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            if let Outcome::Released { iteration, .. } = outcome.outcome {
                prop_assert!(iteration >= activation as u64);
            }
        }
    }
}
