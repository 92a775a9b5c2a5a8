//! End-to-end workflow: raw file content → parser → statistics engine.

use anyhow::Result;

use particle_stats::{parse, FormatKind, ParseError, ParticleStatistics};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SAMPLE_STAR: &str = "
data_optics

loop_
_rlnVoltage #1
_rlnImagePixelSize #2
_rlnOpticsGroup #3
300.000000 1.770000 1

data_particles

loop_
_rlnCoordinateX #1
_rlnCoordinateY #2
_rlnMicrographName #3
_rlnDefocusU #4
_rlnDefocusV #5
1234.5 2345.6 micrograph_001.mrc 28000.0 27500.0
1456.7 3456.8 micrograph_001.mrc 28000.0 27500.0
2000.0 3000.0 micrograph_002.mrc 29000.0 28500.0
2500.0 3500.0 micrograph_002.mrc 29000.0 28500.0
";

const SAMPLE_CSV: &str = "CoordinateX,CoordinateY,MicrographName
1234.5,2345.6,micrograph_001.mrc
1456.7,3456.8,micrograph_001.mrc
2000.0,3000.0,micrograph_002.mrc
2500.0,3500.0,micrograph_002.mrc
";

const SAMPLE_BOX: &str = "1234 2345 100 100
1456 3456 100 100
2000 3000 100 100
2500 3500 100 100
";

#[test]
fn star_to_statistics_workflow() -> Result<()> {
    init_logging();
    let particles = parse(SAMPLE_STAR.as_bytes(), FormatKind::Star)?.require_non_empty()?;

    let stats = ParticleStatistics::new(&particles);
    let summary = stats.summary_statistics();
    assert_eq!(summary.total_particles, 4);
    assert_eq!(summary.total_micrographs, 2);
    assert_eq!(summary.avg_particles_per_micrograph, 2.0);
    assert_eq!(summary.min_particles_per_micrograph, 2);
    assert_eq!(summary.max_particles_per_micrograph, 2);

    let distribution = stats.distribution_per_micrograph();
    assert_eq!(distribution.len(), 2);
    assert_eq!(distribution["micrograph_001.mrc"], 2);
    assert_eq!(distribution["micrograph_002.mrc"], 2);

    let coords = stats.coordinates().expect("coordinate columns inferred");
    assert_eq!(coords.x_column, "CoordinateX");
    assert_eq!(coords.y_column, "CoordinateY");
    assert_eq!(coords.x, vec![1234.5, 1456.7, 2000.0, 2500.0]);
    assert_eq!(coords.y.len(), 4);

    assert!(stats.defocus_statistics().contains_key("DefocusU"));
    assert!(stats.defocus_statistics().contains_key("DefocusV"));
    Ok(())
}

#[test]
fn multiple_parsers_same_data() -> Result<()> {
    init_logging();
    let star = parse(SAMPLE_STAR.as_bytes(), FormatKind::Star)?;
    let csv = parse(SAMPLE_CSV.as_bytes(), FormatKind::Csv)?;

    let star_stats = ParticleStatistics::new(&star);
    let csv_stats = ParticleStatistics::new(&csv);

    let star_summary = star_stats.summary_statistics();
    let csv_summary = csv_stats.summary_statistics();
    assert_eq!(star_summary.total_particles, csv_summary.total_particles);
    assert_eq!(star_summary.total_micrographs, csv_summary.total_micrographs);
    assert_eq!(
        star_stats.micrograph_names(),
        csv_stats.micrograph_names()
    );
    Ok(())
}

#[test]
fn box_workflow_uses_fixed_columns() -> Result<()> {
    init_logging();
    let particles = parse(SAMPLE_BOX.as_bytes(), FormatKind::Box)?;
    assert_eq!(particles.len(), 4);
    assert_eq!(
        particles.column_names(),
        vec!["x", "y", "width", "height"]
    );

    let stats = ParticleStatistics::new(&particles);
    // Box files carry no micrograph information.
    assert_eq!(stats.micrograph_column(), None);
    assert!(stats.distribution_per_micrograph().is_empty());
    assert_eq!(stats.summary_statistics().total_particles, 4);

    let coords = stats.coordinates().expect("x/y columns present");
    assert_eq!(coords.x, vec![1234.0, 1456.0, 2000.0, 2500.0]);
    assert_eq!(coords.y, vec![2345.0, 3456.0, 3000.0, 3500.0]);
    Ok(())
}

#[test]
fn empty_file_surfaces_as_opt_in_error() {
    let particles = parse(b"", FormatKind::Star).expect("empty input parses");
    assert!(matches!(
        particles.require_non_empty(),
        Err(ParseError::EmptyResult)
    ));
}
