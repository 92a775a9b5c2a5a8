/// Data layer: record model and the multi-format particle parsers.
///
/// Architecture:
/// ```text
///  .star / .csv / .box
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  parse(content, kind) → ParticleSet
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ ParticleSet  │  Vec<Particle>, field name → value
///   └─────────────┘
/// ```
pub mod model;
pub mod parser;
