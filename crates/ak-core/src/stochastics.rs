//! Seeded, deterministic random-number facade used by the kernel and by
//! components.
//!
//! # Determinism strategy
//!
//! Each agent owns one `StochasticsService` seeded with:
//!
//!   seed = run_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//!
//! The generator is `ChaCha8Rng`, whose output stream is specified
//! independently of platform word size and endianness.  For a fixed seed and
//! a fixed sequence of calls the samples are bit-identical across runs and
//! across machines.  The service is only ever driven from the thread that is
//! executing its agent, so thread interleaving cannot reorder draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution as _;
use rand_distr::{Binomial, Exp, Gamma, LogNormal, Normal};

use crate::{AgentId, ValidationError};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Upper bound on redraws when sampling a truncated [`Distribution`].
pub const MAX_TRUNCATION_DRAWS: u32 = 1_000;

// ── Distribution ──────────────────────────────────────────────────────────────

/// A parameterised distribution as it appears in component parameters.
///
/// Every variant except `Uniform` carries a `[min, max]` truncation window;
/// samples outside the window are redrawn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Distribution {
    Uniform     { min: f64, max: f64 },
    Normal      { mean: f64, sd: f64, min: f64, max: f64 },
    LogNormal   { mu: f64, sigma: f64, min: f64, max: f64 },
    Exponential { lambda: f64, min: f64, max: f64 },
    Gamma       { mean: f64, sd: f64, min: f64, max: f64 },
}

impl Distribution {
    /// The truncation window of this distribution.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Distribution::Uniform { min, max }
            | Distribution::Normal { min, max, .. }
            | Distribution::LogNormal { min, max, .. }
            | Distribution::Exponential { min, max, .. }
            | Distribution::Gamma { min, max, .. } => (min, max),
        }
    }
}

// ── StochasticsInterface ──────────────────────────────────────────────────────

/// The sampling surface seen by components.
///
/// Every sampling call validates its parameters first and returns a
/// [`ValidationError`] instead of drawing when they are invalid.  A failed
/// call consumes no randomness.
pub trait StochasticsInterface {
    /// The seed the generator was last (re)seeded with.
    fn random_seed(&self) -> u64;

    /// Reseed, restarting the sample sequence.
    fn set_random_seed(&mut self, seed: u64);

    /// Uniform sample in `[min, max)`; exactly `min` when `min == max`.
    fn uniform(&mut self, min: f64, max: f64) -> Result<f64, ValidationError>;

    fn normal(&mut self, mean: f64, sd: f64) -> Result<f64, ValidationError>;

    /// Log-normal sample parameterised by the underlying normal's `mu`/`sigma`.
    fn log_normal(&mut self, mu: f64, sigma: f64) -> Result<f64, ValidationError>;

    /// Exponential sample with rate `lambda`.
    fn exponential(&mut self, lambda: f64) -> Result<f64, ValidationError>;

    /// Gamma sample parameterised by mean and standard deviation.
    fn gamma(&mut self, mean: f64, sd: f64) -> Result<f64, ValidationError>;

    /// Number of successes in `n` Bernoulli trials with probability `p`.
    fn binomial(&mut self, n: u64, p: f64) -> Result<u64, ValidationError>;

    /// Sample a parameter distribution, redrawing outside its window.
    fn sample(&mut self, distribution: &Distribution) -> Result<f64, ValidationError> {
        let (min, max) = distribution.bounds();
        check_range(min, max)?;

        for _ in 0..MAX_TRUNCATION_DRAWS {
            let value = match *distribution {
                Distribution::Uniform { min, max }         => self.uniform(min, max)?,
                Distribution::Normal { mean, sd, .. }      => self.normal(mean, sd)?,
                Distribution::LogNormal { mu, sigma, .. }  => self.log_normal(mu, sigma)?,
                Distribution::Exponential { lambda, .. }   => self.exponential(lambda)?,
                Distribution::Gamma { mean, sd, .. }       => self.gamma(mean, sd)?,
            };
            if (min..=max).contains(&value) {
                return Ok(value);
            }
        }
        Err(ValidationError::TruncationExhausted { min, max, attempts: MAX_TRUNCATION_DRAWS })
    }
}

// ── StochasticsService ────────────────────────────────────────────────────────

/// Agent-scoped deterministic generator.
///
/// Deliberately not `Clone`: two copies would silently replay the same
/// sequence.
#[derive(Debug)]
pub struct StochasticsService {
    seed: u64,
    rng:  ChaCha8Rng,
}

impl StochasticsService {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Seed deterministically from the run's seed and an agent ID.
    pub fn for_agent(run_seed: u64, agent: AgentId) -> Self {
        Self::new(run_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT))
    }

    /// `true` with probability `p`.
    pub fn bernoulli(&mut self, p: f64) -> Result<bool, ValidationError> {
        check_probability(p)?;
        Ok(self.rng.gen_bool(p))
    }

    /// Expose the inner generator for use with other `rand` distribution
    /// types.  Draws made here are part of the same deterministic sequence.
    #[inline]
    pub fn inner(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

impl StochasticsInterface for StochasticsService {
    fn random_seed(&self) -> u64 {
        self.seed
    }

    fn set_random_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn uniform(&mut self, min: f64, max: f64) -> Result<f64, ValidationError> {
        check_finite("min", min)?;
        check_finite("max", max)?;
        check_range(min, max)?;
        let span = max - min;
        if !span.is_finite() {
            return Err(ValidationError::SpanOverflow { min, max });
        }
        let unit: f64 = self.rng.r#gen();
        Ok(min + span * unit)
    }

    fn normal(&mut self, mean: f64, sd: f64) -> Result<f64, ValidationError> {
        check_finite("mean", mean)?;
        check_non_negative("standard deviation", sd)?;
        let dist = Normal::new(mean, sd)
            .map_err(|_| ValidationError::NotFinite { what: "standard deviation", value: sd })?;
        Ok(dist.sample(&mut self.rng))
    }

    fn log_normal(&mut self, mu: f64, sigma: f64) -> Result<f64, ValidationError> {
        check_finite("mu", mu)?;
        check_non_negative("sigma", sigma)?;
        let dist = LogNormal::new(mu, sigma)
            .map_err(|_| ValidationError::NotFinite { what: "sigma", value: sigma })?;
        Ok(dist.sample(&mut self.rng))
    }

    fn exponential(&mut self, lambda: f64) -> Result<f64, ValidationError> {
        check_positive("lambda", lambda)?;
        let dist = Exp::new(lambda)
            .map_err(|_| ValidationError::NotPositive { what: "lambda", value: lambda })?;
        Ok(dist.sample(&mut self.rng))
    }

    fn gamma(&mut self, mean: f64, sd: f64) -> Result<f64, ValidationError> {
        check_positive("mean", mean)?;
        check_positive("standard deviation", sd)?;
        let shape = (mean * mean) / (sd * sd);
        let scale = (sd * sd) / mean;
        let dist = Gamma::new(shape, scale)
            .map_err(|_| ValidationError::NotFinite { what: "gamma shape", value: shape })?;
        Ok(dist.sample(&mut self.rng))
    }

    fn binomial(&mut self, n: u64, p: f64) -> Result<u64, ValidationError> {
        check_probability(p)?;
        let dist = Binomial::new(n, p).map_err(|_| ValidationError::Probability(p))?;
        Ok(dist.sample(&mut self.rng))
    }
}

// ── Parameter checks ──────────────────────────────────────────────────────────

fn check_finite(what: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { what, value })
    }
}

fn check_non_negative(what: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(what, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { what, value });
    }
    Ok(())
}

fn check_positive(what: &'static str, value: f64) -> Result<(), ValidationError> {
    check_finite(what, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { what, value });
    }
    Ok(())
}

fn check_range(min: f64, max: f64) -> Result<(), ValidationError> {
    // NaN bounds fail this comparison as well.
    if min <= max {
        Ok(())
    } else {
        Err(ValidationError::InvalidRange { min, max })
    }
}

fn check_probability(p: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ValidationError::Probability(p))
    }
}
