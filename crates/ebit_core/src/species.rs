use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{check_species, SpeciesConfig};
use crate::error::{EbitError, Result};
use crate::solvers::RK4;

/// One recorded population value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub population: f64,
}

/// Time trace of a single tracked charge state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeStateTrace {
    pub charge_state: usize,
    pub samples: Vec<Sample>,
}

impl ChargeStateTrace {
    pub fn new(charge_state: usize) -> Self {
        Self {
            charge_state,
            samples: Vec::new(),
        }
    }
}

/// Rate arrays of one species, indexed by charge state 0..=Z+1.
/// Written once at initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateArrays {
    pub ionization: Vec<f64>,
    pub radiative_recombination: Vec<f64>,
    pub charge_exchange: Vec<f64>,
}

/// An ion species and all of its integration state.
///
/// Every buffer is allocated per instance by [`Species::allocate`], so no two species
/// ever share scratch storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub z: u32,
    pub a: u32,
    pub decays_to: Option<u32>,
    pub beta_half_life: f64,
    pub initial_population: f64,
    pub decay_constant: f64,
    pub charge_states: Vec<usize>,
    pub population: Vec<f64>,
    pub rates: RateArrays,
    pub rk4: RK4,
    /// Result of one full step of size 2h.
    pub y1: Vec<f64>,
    /// Intermediate result after the first half step.
    pub y12: Vec<f64>,
    /// Result after the second half step.
    pub y22: Vec<f64>,
    pub results: Vec<ChargeStateTrace>,
}

impl Species {
    pub fn new(z: u32, a: u32) -> Self {
        Self::from(SpeciesConfig::new(z, a))
    }

    /// Sizes every population-shaped buffer to `len`, seeds charge state 1 and clears
    /// recorded samples.
    pub fn allocate(&mut self, len: usize) {
        self.population = vec![0.0; len];
        if len > 1 {
            self.population[1] = self.initial_population;
        }
        self.rk4 = RK4::new(len);
        self.y1 = vec![0.0; len];
        self.y12 = vec![0.0; len];
        self.y22 = vec![0.0; len];

        for &q in &self.charge_states {
            if q > self.z as usize {
                warn!(
                    "Tracked charge state {} exceeds Z = {}; its population stays zero",
                    q, self.z
                );
            }
        }
        self.results = self
            .charge_states
            .iter()
            .map(|&q| ChargeStateTrace::new(q))
            .collect();
    }

    /// Checks identity and seeding, and that every tracked charge state indexes into a
    /// population vector of length `len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        check_species(
            self.z,
            self.a,
            self.beta_half_life,
            self.initial_population,
        )?;
        if let Some(&q) = self.charge_states.iter().find(|&&q| q >= len) {
            return Err(EbitError::InvalidSpecies {
                z: self.z,
                reason: format!(
                    "tracked charge state {q} is outside the population vector (length {len})"
                ),
            });
        }
        Ok(())
    }

    /// Appends the current population of each tracked charge state.
    pub fn record_sample(&mut self, time: f64) {
        for trace in &mut self.results {
            let population = self
                .population
                .get(trace.charge_state)
                .copied()
                .unwrap_or(0.0);
            trace.samples.push(Sample { time, population });
        }
    }

    pub fn total_population(&self) -> f64 {
        self.population.iter().sum()
    }

    pub fn trace(&self, charge_state: usize) -> Option<&ChargeStateTrace> {
        self.results
            .iter()
            .find(|trace| trace.charge_state == charge_state)
    }
}

impl From<SpeciesConfig> for Species {
    fn from(config: SpeciesConfig) -> Self {
        Self {
            z: config.z,
            a: config.a,
            decays_to: config.decays_to,
            beta_half_life: config.beta_half_life,
            initial_population: config.initial_population,
            decay_constant: 0.0,
            charge_states: config.charge_states,
            population: Vec::new(),
            rates: RateArrays::default(),
            rk4: RK4::default(),
            y1: Vec::new(),
            y12: Vec::new(),
            y22: Vec::new(),
            results: Vec::new(),
        }
    }
}
