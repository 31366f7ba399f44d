use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use mcellrel::container::{ApiVersion, Trace, TraceWriter};
use mcellrel::model::{presets, SensorTopology};

/// Simulation time step of the generated traces, in seconds
const STEP_SIZE: f64 = 1e-6;

/// Per-step probability that an empty site binds calcium, at peak influx
const PEAK_BINDING_PROBABILITY: f64 = 5e-3;

/// Per-step probability that a bound site releases its calcium
const UNBINDING_PROBABILITY: f64 = 2e-3;

/// Generate synthetic output files for the mouse NMJ model
pub fn run(output_dir: PathBuf, count: u32, api: ApiVersion, iterations: u64) -> Result<()> {
    info!("mcellrel - Synthetic MCell Output");
    info!("=================================");

    let config = presets::mouse_nmj(2).context("Invalid built-in model")?;
    let topology = config.topology();
    let writer = TraceWriter::new(api);

    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    for seed in 1..=count {
        let blocks = realization_blocks(topology, seed, iterations);
        let trace = Trace::new(api, STEP_SIZE, iterations, blocks)
            .context("Failed to assemble synthetic trace")?;
        let path = output_dir.join(format!(
            "run.{:04}.bin{}",
            seed,
            writer.compression.extension()
        ));
        writer
            .write_file(&trace, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if seed % 10 == 0 {
            info!("  Written {} files...", seed);
        }
    }

    info!(
        "Wrote {} {} files of {} iterations to {}",
        count,
        api,
        iterations,
        output_dir.display()
    );

    Ok(())
}

/// One occupancy block per site of every sensor on every vesicle
fn realization_blocks(
    topology: &SensorTopology,
    seed: u32,
    iterations: u64,
) -> Vec<(String, Vec<f64>)> {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut blocks = Vec::new();
    for vesicle in topology.vesicle_ids() {
        for sensor in topology.sensors() {
            for &site in &sensor.sites {
                let name = topology.block_name(vesicle, sensor.site_type, site, seed);
                blocks.push((name, binding_series(&mut rng, iterations)));
            }
        }
    }
    blocks
}

/// Two-state occupancy of one site while calcium influx ramps up
fn binding_series(rng: &mut StdRng, iterations: u64) -> Vec<f64> {
    let mut bound = false;
    (0..iterations)
        .map(|t| {
            let influx = t as f64 / iterations.max(1) as f64;
            let p = if bound {
                UNBINDING_PROBABILITY
            } else {
                PEAK_BINDING_PROBABILITY * influx
            };
            if rng.gen::<f64>() < p {
                bound = !bound;
            }
            bound as u8 as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcellrel::model::{BlockTemplate, CaSensor, SiteType};

    #[test]
    fn test_blocks_are_named_by_site_type() {
        let topology = SensorTopology::new(
            vec!["1_1".to_string()],
            vec![CaSensor::syt(&[3, 4]), CaSensor::y(&[3])],
            BlockTemplate::default(),
        )
        .unwrap();

        let blocks = realization_blocks(&topology, 7, 10);
        let names: Vec<&str> = blocks.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            [
                topology.block_name("1_1", SiteType::Syt, 3, 7),
                topology.block_name("1_1", SiteType::Syt, 4, 7),
                topology.block_name("1_1", SiteType::Y, 3, 7),
            ]
        );
        assert!(blocks.iter().all(|(_, values)| values.len() == 10));
    }

    #[test]
    fn test_blocks_are_reproducible_per_seed() {
        let config = presets::mouse_nmj(2).unwrap();
        let a = realization_blocks(config.topology(), 3, 200);
        let b = realization_blocks(config.topology(), 3, 200);
        assert_eq!(a, b);
        assert!(a
            .iter()
            .flat_map(|(_, values)| values)
            .all(|&v| v == 0.0 || v == 1.0));
    }
}
