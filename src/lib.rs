//! Parsing and statistics for cryo-EM particle picking results.
//!
//! Three loosely-specified text formats (RELION STAR, delimited CSV, EMAN
//! box) are normalized into a uniform record model, then a statistics engine
//! infers the semantically interesting columns by name and derives
//! per-micrograph distributions, summary statistics and coordinate extracts.
//! The crate is a pure in-process transformation library: no file-system or
//! network access, no rendering — presentation layers consume the returned
//! data structures read-only.
//!
//! ```
//! use particle_stats::{parse, FormatKind, ParticleStatistics};
//!
//! let content = b"CoordinateX,CoordinateY,MicrographName\n\
//!                 1234.5,2345.6,mic_001.mrc\n\
//!                 1456.7,3456.8,mic_001.mrc\n";
//! let particles = parse(content, FormatKind::Csv)?;
//!
//! let stats = ParticleStatistics::new(&particles);
//! let summary = stats.summary_statistics();
//! assert_eq!(summary.total_particles, 2);
//! assert_eq!(summary.total_micrographs, 1);
//! # Ok::<(), particle_stats::ParseError>(())
//! ```

pub mod data;
pub mod error;
pub mod stats;

pub use data::model::{FieldValue, Particle, ParticleSet};
pub use data::parser::{parse, FormatKind};
pub use error::ParseError;
pub use stats::{
    ColumnStatistics, CoordinateExtract, CoordinateHeatmap, Distribution, ParticleStatistics,
    SummaryStatistics,
};
