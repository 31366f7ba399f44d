use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mcellrel::batch::BatchRunner;
use mcellrel::model::{presets, AnalysisConfig, ModelFile};

use super::config::Config;

/// Sites per sensor assumed when neither flags nor files give one
const DEFAULT_SITES_REQUIRED: usize = 2;

/// Arguments of the analyze command
pub struct AnalyzeArgs {
    pub files: Vec<PathBuf>,
    pub threads: Option<usize>,
    pub sites_required: Option<usize>,
    pub sensors_required_active: Option<usize>,
    pub model: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub energy: bool,
    pub rng_seed: Option<u64>,
    pub json: bool,
}

/// Detect vesicle release across a batch of files
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Config::from_file(path)?.analysis,
        None => Default::default(),
    };

    let threads = args.threads.or(settings.threads).unwrap_or(1);
    let sites_required = args.sites_required.or(settings.sites_required);
    let sensors_required_active = args
        .sensors_required_active
        .or(settings.sensors_required_active);
    let energy = args.energy || settings.energy_model.unwrap_or(false);
    let rng_seed = args.rng_seed.or(settings.rng_seed);
    let json = args.json || settings.json.unwrap_or(false);

    let base = match args.model.as_ref().or(settings.model.as_ref()) {
        Some(path) => {
            info!("Model: {}", path.display());
            ModelFile::from_file(path)?
                .into_config()
                .with_context(|| format!("Invalid model file: {}", path.display()))?
        }
        None => {
            info!("Model: built-in mouse NMJ");
            presets::mouse_nmj(sites_required.unwrap_or(DEFAULT_SITES_REQUIRED))
                .context("Invalid built-in model")?
        }
    };

    let mut fusion = *base.fusion();
    if let Some(sites) = sites_required {
        fusion.num_sites_required_per_sensor = sites;
    }
    if let Some(active) = sensors_required_active {
        fusion.num_sensors_required_active = active;
    }
    if energy {
        fusion = fusion.with_energy_model(fusion.energy, rng_seed.unwrap_or(fusion.rng_seed));
    }
    let config = AnalysisConfig::new(base.topology().clone(), fusion, *base.pulses())
        .context("Invalid fusion model")?;

    info!(
        "Fusion model: {} of {} sensors active, {} sites per sensor, {}",
        fusion.num_sensors_required_active,
        fusion.num_sensors_total,
        fusion.num_sites_required_per_sensor,
        if fusion.energy_model {
            "energy model"
        } else {
            "threshold rule"
        }
    );

    let report = BatchRunner::new(&config)
        .run(&args.files, threads)
        .context("Batch analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
