//! # mcellrel - Vesicle Release Analysis for MCell Reaction Output
//!
//! `mcellrel` reads the binary reaction-data containers MCell writes for
//! every simulated realization and decides, for each synaptic vesicle,
//! whether and when it fused.
//!
//! ## Key Features
//!
//! - **Versioned Containers**: Both `MCELL_BINARY_API_1` and
//!   `MCELL_BINARY_API_2` layouts are decoded into one [`container::Trace`]
//!   model. Compression (bzip2, gzip or none) is detected from the file itself.
//!
//! - **Header-Only Reads**: Step size, iteration count and block names can be
//!   inspected without decoding the payload.
//!
//! - **Threshold and Energy Models**: Release fires either when enough
//!   calcium sensors are active at once, or stochastically from a pluggable
//!   hazard driven by sensor activity.
//!
//! - **Parallel Batches**: Thousands of realizations are analyzed on a fixed
//!   worker pool with results that do not depend on the worker count.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcellrel::batch::BatchRunner;
//! use mcellrel::model::presets;
//!
//! // Mouse NMJ model, 2 bound sites make a sensor active
//! let config = presets::mouse_nmj(2)?;
//!
//! let paths = vec!["run.0001.bin.bz2".into(), "run.0002.bin.bz2".into()];
//! let report = BatchRunner::new(&config).run(&paths, 4)?;
//!
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Single Traces
//!
//! ```rust,no_run
//! use mcellrel::container::ContainerReader;
//! use mcellrel::model::presets;
//! use mcellrel::release::ReleaseDetector;
//!
//! let config = presets::mouse_nmj(2)?;
//! let trace = ContainerReader::open_full("run.0042.bin.bz2")?;
//!
//! for outcome in ReleaseDetector::new(&config).analyze(&trace, 42) {
//!     println!("{}", outcome);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod container;
pub mod model;
pub mod release;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{AggregateReport, BatchError, BatchRunner, FileReport, FileResult};
    pub use crate::container::{
        ApiVersion, Compression, ContainerError, ContainerReader, FormatError, Trace,
        TraceHeader, TraceMetadata, TraceWriter,
    };
    pub use crate::model::{
        AnalysisConfig, CaSensor, ConfigError, EnergyParameters, FusionModel, ModelFile,
        PulseSchedule, SensorTopology, SiteType,
    };
    pub use crate::release::{
        ActivitySnapshot, HazardModel, Outcome, ReleaseDetector, ReleaseOutcome,
    };
}
