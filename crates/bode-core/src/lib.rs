//! bode-core: Frequency-response analysis of open-loop transfer functions
//!
//! Samples a complex response `G(jω)` on a logarithmic grid, unwraps its
//! phase and locates the two classical crossover points.
//!
//! ## Modules
//!
//! - `frequency` - Logarithmic frequency grid
//! - `response` - The `ResponseFunction` capability
//! - `sampler` - Magnitude/phase sampling over a grid
//! - `math` - Unit conversions, phase unwrapping, phase interpolation
//! - `roots` - Bracketed scalar root finders
//! - `crossover` - Phase and gain crossover search
//! - `analysis` - The `analyze` pipeline and its result record

pub mod analysis;
pub mod constants;
pub mod crossover;
pub mod error;
pub mod frequency;
pub mod math;
pub mod response;
pub mod roots;
pub mod sampler;

pub use analysis::{analyze, analyze_with, AnalysisOptions, BodeAnalysisResult};
pub use crossover::{
    BracketStrategy, CrossoverKind, CrossoverOutcome, CrossoverPoint, CrossoverSolver,
};
pub use error::{BodeError, Result};
pub use frequency::FrequencyGrid;
pub use response::ResponseFunction;
pub use roots::{FrequencyTolerance, RootMethod, RootOptions};
pub use sampler::FrequencyResponse;
