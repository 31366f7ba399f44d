use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::hazard::{ActivitySnapshot, EnergyHazard, HazardModel};
use super::outcome::{AnalysisFailure, Outcome, ReleaseOutcome};
use crate::container::Trace;
use crate::model::{AnalysisConfig, SiteType};

/// Per-vesicle scan state. Scans only move forward in iteration order and
/// every state except `Pending` is terminal.
#[derive(Debug, Clone, PartialEq)]
enum VesicleState {
    Pending,
    Released(u64),
    Exhausted,
    Failed(AnalysisFailure),
}

/// Occupancy series of one sensor on one vesicle
struct SensorSeries<'t> {
    site_type: SiteType,
    sites: Vec<&'t [f64]>,
}

/// Release rule being applied to one vesicle
enum FiringRule {
    Threshold { required_active: usize },
    Hazard { threshold: f64, cumulative: f64, step_size: f64 },
}

impl FiringRule {
    fn fires(&mut self, activity: &ActivitySnapshot, hazard: &dyn HazardModel) -> bool {
        match self {
            FiringRule::Threshold { required_active } => activity.active_syt >= *required_active,
            FiringRule::Hazard {
                threshold,
                cumulative,
                step_size,
            } => {
                // max() also maps NaN to zero
                let increment = hazard.rate(activity).max(0.0) * *step_size;
                if increment > 0.0 {
                    *cumulative += increment;
                }
                *cumulative >= *threshold
            }
        }
    }
}

/// Detects vesicle fusion in decoded traces.
///
/// The detector holds no mutable state: analyzing the same trace twice with
/// the same seed gives identical outcomes.
pub struct ReleaseDetector<'a> {
    config: &'a AnalysisConfig,
    hazard: Box<dyn HazardModel + 'a>,
}

impl<'a> ReleaseDetector<'a> {
    /// Detector using the energy hazard configured in the fusion model
    pub fn new(config: &'a AnalysisConfig) -> Self {
        let hazard = EnergyHazard::new(config.fusion().energy);
        Self::with_hazard(config, hazard)
    }

    /// Detector with a custom energy → rate mapping for the stochastic rule
    pub fn with_hazard(config: &'a AnalysisConfig, hazard: impl HazardModel + 'a) -> Self {
        Self {
            config,
            hazard: Box::new(hazard),
        }
    }

    /// Configuration this detector applies
    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Analyze every vesicle of the topology, in topology order.
    ///
    /// `seed` is the realization seed of the trace; it selects block names and
    /// seeds stochastic sampling.
    pub fn analyze(&self, trace: &Trace, seed: u32) -> Vec<ReleaseOutcome> {
        let outcomes: Vec<ReleaseOutcome> = self
            .config
            .topology()
            .vesicle_ids()
            .iter()
            .enumerate()
            .map(|(index, vesicle_id)| self.analyze_vesicle(trace, seed, index, vesicle_id))
            .collect();

        debug!(
            "seed {}: {} of {} vesicles released",
            seed,
            outcomes.iter().filter(|o| o.released()).count(),
            outcomes.len()
        );
        outcomes
    }

    fn analyze_vesicle(
        &self,
        trace: &Trace,
        seed: u32,
        index: usize,
        vesicle_id: &str,
    ) -> ReleaseOutcome {
        let state = match self.resolve(trace, vesicle_id, seed) {
            Ok(sensors) => self.scan(trace, &sensors, self.firing_rule(trace, seed, index)),
            Err(failure) => VesicleState::Failed(failure),
        };

        let outcome = match state {
            VesicleState::Released(iteration) => {
                let time = iteration as f64 * trace.metadata().step_size;
                let (pulse, latency) = self.config.pulses().locate(time);
                Outcome::Released {
                    iteration,
                    time,
                    latency,
                    pulse,
                }
            }
            VesicleState::Exhausted | VesicleState::Pending => Outcome::NotReleased,
            VesicleState::Failed(failure) => Outcome::Failed(failure),
        };

        ReleaseOutcome {
            vesicle_id: vesicle_id.to_string(),
            outcome,
        }
    }

    /// Look up every site block of every sensor; the first missing one fails
    /// the vesicle.
    fn resolve<'t>(
        &self,
        trace: &'t Trace,
        vesicle_id: &str,
        seed: u32,
    ) -> Result<Vec<SensorSeries<'t>>, AnalysisFailure> {
        let topology = self.config.topology();
        topology
            .sensors()
            .iter()
            .map(|sensor| -> Result<SensorSeries<'t>, AnalysisFailure> {
                let sites = sensor
                    .sites
                    .iter()
                    .map(|&site| {
                        let block = topology.block_name(vesicle_id, sensor.site_type, site, seed);
                        trace
                            .block(&block)
                            .ok_or(AnalysisFailure::MissingData { block })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SensorSeries {
                    site_type: sensor.site_type,
                    sites,
                })
            })
            .collect()
    }

    fn firing_rule(&self, trace: &Trace, seed: u32, index: usize) -> FiringRule {
        let fusion = self.config.fusion();
        if !fusion.energy_model {
            return FiringRule::Threshold {
                required_active: fusion.num_sensors_required_active,
            };
        }

        let mut rng = StdRng::seed_from_u64(stream_seed(fusion.rng_seed, seed, index));
        // u in (0, 1) so the Exp(1) threshold is strictly positive
        let u: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
        FiringRule::Hazard {
            threshold: -u.ln(),
            cumulative: 0.0,
            step_size: trace.metadata().step_size,
        }
    }

    fn scan(&self, trace: &Trace, sensors: &[SensorSeries<'_>], mut rule: FiringRule) -> VesicleState {
        let mut state = VesicleState::Pending;
        for t in 0..trace.metadata().iteration_count {
            let activity = self.activity(sensors, t as usize);
            if rule.fires(&activity, &*self.hazard) {
                state = VesicleState::Released(t);
                break;
            }
        }
        match state {
            VesicleState::Pending => VesicleState::Exhausted,
            terminal => terminal,
        }
    }

    fn activity(&self, sensors: &[SensorSeries<'_>], t: usize) -> ActivitySnapshot {
        let required = self.config.fusion().num_sites_required_per_sensor as f64;
        let mut snapshot = ActivitySnapshot::default();
        for sensor in sensors {
            let occupied: f64 = sensor.sites.iter().map(|samples| samples[t]).sum();
            match sensor.site_type {
                SiteType::Syt => {
                    snapshot.bound_syt_sites += occupied;
                    if occupied >= required {
                        snapshot.active_syt += 1;
                    }
                }
                SiteType::Y => snapshot.bound_y_sites += occupied,
            }
        }
        snapshot
    }
}

/// Independent RNG stream per (model seed, realization, vesicle)
fn stream_seed(rng_seed: u64, realization: u32, vesicle: usize) -> u64 {
    rng_seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((realization as u64) << 32) ^ vesicle as u64
}
