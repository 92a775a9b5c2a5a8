use indexmap::IndexMap;
use log::{debug, warn};

use super::model::{FieldValue, Particle, ParticleSet};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// The three supported particle-coordinate file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// RELION-style STAR file: named data blocks with `loop_` column tables.
    Star,
    /// Delimited table with a header row.
    Csv,
    /// EMAN-style box file: whitespace columns `x y width height`.
    Box,
}

impl FormatKind {
    /// Map a file-name extension to a format kind. The extension is chosen
    /// by the caller (the core itself never touches the file system).
    pub fn from_extension(ext: &str) -> Option<FormatKind> {
        match ext.to_ascii_lowercase().as_str() {
            "star" => Some(FormatKind::Star),
            "csv" => Some(FormatKind::Csv),
            "box" => Some(FormatKind::Box),
            _ => None,
        }
    }
}

/// Parse raw file content into a [`ParticleSet`].
///
/// Fails only when the bytes cannot be decoded as UTF-8 text. Schema
/// mismatches never fail the call: malformed or short lines are skipped, and
/// unparseable input simply yields an empty set. One call produces one
/// complete result — there is no streaming and no partial delivery.
pub fn parse(content: &[u8], kind: FormatKind) -> Result<ParticleSet, ParseError> {
    let text = std::str::from_utf8(content)?;
    let set = match kind {
        FormatKind::Star => parse_star(text),
        FormatKind::Csv => parse_csv(text),
        FormatKind::Box => parse_box(text),
    };
    debug!("parsed {} particles ({kind:?})", set.len());
    Ok(set)
}

// ---------------------------------------------------------------------------
// STAR parser
// ---------------------------------------------------------------------------

const PARTICLES_BLOCK: &str = "data_particles";
const BLOCK_PREFIX: &str = "data_";
const LOOP_MARKER: &str = "loop_";
const FIELD_PREFIX: &str = "_rln";

/// Where we are inside the STAR file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// Before the particles block.
    Seeking,
    /// Inside the particles block, before its `loop_` line.
    AwaitingLoop,
    /// Collecting `_rln...` column labels.
    ReadingHeaders,
    /// Zipping data rows against the collected labels.
    ReadingData,
}

/// Parse the `data_particles` block of a STAR file.
///
/// Header lines bind positionally: the first `_rln` label names the first
/// whitespace token of every data row, and rows with fewer tokens than
/// labels are dropped. A second `data_particles` line restarts the block; any
/// *other* `data_` block encountered after the particles block ends parsing
/// (the particle table cannot resume later in the file).
fn parse_star(text: &str) -> ParticleSet {
    let mut state = BlockState::Seeking;
    let mut headers: Vec<String> = Vec::new();
    let mut particles: Vec<Particle> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if line.starts_with(PARTICLES_BLOCK) {
            debug!("entering {PARTICLES_BLOCK} block");
            headers.clear();
            state = BlockState::AwaitingLoop;
            continue;
        }

        match state {
            BlockState::Seeking => {}
            BlockState::AwaitingLoop => {
                if line == LOOP_MARKER {
                    state = BlockState::ReadingHeaders;
                } else if line.starts_with(BLOCK_PREFIX) {
                    break;
                }
            }
            BlockState::ReadingHeaders => {
                if line.starts_with(BLOCK_PREFIX) {
                    break;
                }
                if let Some(rest) = line.strip_prefix(FIELD_PREFIX) {
                    // Labels look like `_rlnCoordinateX #1`; keep the name only.
                    if let Some(name) = rest.split_whitespace().next() {
                        headers.push(name.to_string());
                    }
                } else if !line.starts_with('_')
                    && !line.starts_with('#')
                    && line != LOOP_MARKER
                    && !headers.is_empty()
                {
                    // First data row; the header list is complete.
                    debug!("collected {} column labels", headers.len());
                    state = BlockState::ReadingData;
                    if let Some(p) = star_data_row(line, &headers) {
                        particles.push(p);
                    }
                }
            }
            BlockState::ReadingData => {
                if line.starts_with(BLOCK_PREFIX) {
                    debug!("new data block ends the particle table");
                    break;
                }
                if line.starts_with('_') || line.starts_with('#') || line == LOOP_MARKER {
                    continue;
                }
                if let Some(p) = star_data_row(line, &headers) {
                    particles.push(p);
                }
            }
        }
    }

    ParticleSet::from_particles(particles)
}

/// Zip one data row against the header list. Rows with fewer tokens than
/// headers are rejected; extra trailing tokens are ignored.
fn star_data_row(line: &str, headers: &[String]) -> Option<Particle> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < headers.len() {
        warn!(
            "skipping short data row: {} tokens, {} columns",
            tokens.len(),
            headers.len()
        );
        return None;
    }
    Some(
        headers
            .iter()
            .zip(&tokens)
            .map(|(header, token)| (header.clone(), coerce(token)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// Parse a delimited table: first row is the column names, every cell is
/// type-coerced individually. Blank lines are skipped and ragged rows are
/// tolerated (short rows just produce fewer fields).
fn parse_csv(text: &str) -> ParticleSet {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(row) => row.iter().map(str::to_string).collect(),
        Err(err) => {
            warn!("could not read CSV header row: {err}");
            return ParticleSet::default();
        }
    };

    let mut particles = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping CSV row {row_no}: {err}");
                continue;
            }
        };
        let particle: Particle = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), coerce(cell)))
            .collect();
        particles.push(particle);
    }

    ParticleSet::from_particles(particles)
}

// ---------------------------------------------------------------------------
// BOX parser
// ---------------------------------------------------------------------------

/// Fixed field names of the box format: lower-left corner plus box extent.
const BOX_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

/// Parse an EMAN-style box file. A line produces a particle only when its
/// first four tokens all parse as floats; anything else skips the whole line
/// (no partial records). Trailing columns are ignored.
fn parse_box(text: &str) -> ParticleSet {
    let mut particles = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < BOX_FIELDS.len() {
            continue;
        }
        let mut fields = IndexMap::new();
        for (name, token) in BOX_FIELDS.iter().zip(&tokens) {
            match token.parse::<f64>() {
                Ok(value) => {
                    fields.insert((*name).to_string(), FieldValue::Number(value));
                }
                Err(_) => {
                    warn!("skipping box line with non-numeric token {token:?}");
                    fields.clear();
                    break;
                }
            }
        }
        if !fields.is_empty() {
            particles.push(fields.into_iter().collect());
        }
    }

    ParticleSet::from_particles(particles)
}

// ---------------------------------------------------------------------------
// Type coercion
// ---------------------------------------------------------------------------

/// The single ingestion-time coercion point: a token that parses as a float
/// becomes a number, everything else stays text. A literal "nan" stays text
/// so that downstream numeric filters see it as non-numeric.
fn coerce(token: &str) -> FieldValue {
    match token.parse::<f64>() {
        Ok(n) if !n.is_nan() => FieldValue::Number(n),
        _ => FieldValue::Text(token.to_string()),
    }
}
