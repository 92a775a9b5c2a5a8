use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a particle record
// ---------------------------------------------------------------------------

/// A dynamically-typed field value. Every token is coerced exactly once at
/// ingestion: if it parses as a float it becomes `Number`, otherwise the
/// original text is kept. Values are never re-typed after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value. `Text` never converts, even when it looks
    /// numeric (coercion already happened at ingestion), and NaN is treated
    /// as non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Truthiness used when counting group membership: empty text and
    /// zero-equivalent numbers do not count.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Particle – one parsed record
// ---------------------------------------------------------------------------

/// One parsed particle/coordinate entry: field name → value.
///
/// Fields keep their file appearance order, which matters for the
/// column-inference fallbacks (first matching field name wins, enumerated in
/// appearance order).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Particle {
    fields: IndexMap<String, FieldValue>,
}

impl Particle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in file appearance order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FieldValue)> for Particle {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Particle {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ParticleSet – the complete parsed file
// ---------------------------------------------------------------------------

/// All particles parsed from one file, in file appearance order. Immutable
/// once returned by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        ParticleSet { particles }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Field names of the first particle, in file appearance order. Column
    /// inference works off the first record; later records are expected (not
    /// guaranteed) to share the same field set.
    pub fn column_names(&self) -> Vec<&str> {
        self.particles
            .first()
            .map(|p| p.field_names().collect())
            .unwrap_or_default()
    }

    /// Opt-in emptiness check: parsing an empty file is not an error, but
    /// callers that need data can turn it into one.
    pub fn require_non_empty(self) -> Result<Self, ParseError> {
        if self.particles.is_empty() {
            Err(ParseError::EmptyResult)
        } else {
            Ok(self)
        }
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
