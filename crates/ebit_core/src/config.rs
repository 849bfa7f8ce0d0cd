use serde::{Deserialize, Serialize};

use crate::error::{EbitError, Result};
use crate::rates::TabulatedCrossSections;

/// Step-size control settings for the adaptive RK4 integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RkStepParams {
    /// Population threshold below which a charge state is considered empty.
    /// Carried for downstream consumers; the integrator does not consult it.
    pub min_charge: f64,
    /// Initial trial step size in seconds.
    pub time_step: f64,
    /// Desired absolute accuracy per charge state.
    pub desired_accuracy_per_charge_state: f64,
    /// Derived at initialization: per-state accuracy divided by the largest Z.
    pub desired_accuracy: f64,
}

impl Default for RkStepParams {
    fn default() -> Self {
        Self {
            min_charge: 5e-5,
            time_step: 1e-6,
            desired_accuracy_per_charge_state: 1e-7,
            desired_accuracy: 0.0,
        }
    }
}

impl RkStepParams {
    pub fn validate(&self) -> Result<()> {
        positive("time_step", self.time_step)?;
        positive(
            "desired_accuracy_per_charge_state",
            self.desired_accuracy_per_charge_state,
        )?;
        Ok(())
    }
}

/// Physical trap parameters shared by every species.
///
/// Units follow the rate formulas: eV for energies, A for current, cm for lengths,
/// torr for pressure and seconds for times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbitParams {
    pub breeding_time: f64,
    pub probe_every: f64,
    pub ion_ebeam_overlap: f64,
    pub beam_energy: f64,
    pub beam_current: f64,
    pub beam_radius: f64,
    pub pressure: f64,
    pub ion_temperature: f64,
    pub rk: RkStepParams,
    /// Derived: overlap * current / (pi * radius^2), in A/cm^2.
    pub current_density: f64,
    /// Derived: one decay constant per species, in descending-Z order.
    pub decay_constants: Vec<f64>,
    /// Derived: true when at least one species has a nonzero decay constant.
    pub beta_decay_active: bool,
}

impl Default for EbitParams {
    fn default() -> Self {
        Self {
            breeding_time: 0.1,
            probe_every: 0.1,
            ion_ebeam_overlap: 1.0,
            beam_energy: 3000.0,
            beam_current: 0.1,
            beam_radius: 200.0e-4,
            pressure: 1e-12,
            ion_temperature: 100.0,
            rk: RkStepParams::default(),
            current_density: 0.0,
            decay_constants: Vec::new(),
            beta_decay_active: false,
        }
    }
}

impl EbitParams {
    pub fn validate(&self) -> Result<()> {
        non_negative("breeding_time", self.breeding_time)?;
        positive("probe_every", self.probe_every)?;
        positive("ion_ebeam_overlap", self.ion_ebeam_overlap)?;
        positive("beam_energy", self.beam_energy)?;
        non_negative("beam_current", self.beam_current)?;
        positive("beam_radius", self.beam_radius)?;
        non_negative("pressure", self.pressure)?;
        positive("ion_temperature", self.ion_temperature)?;
        self.rk.validate()
    }

    /// Electron current density of the beam seen by the ions.
    pub fn compute_current_density(&self) -> f64 {
        (self.ion_ebeam_overlap * self.beam_current)
            / (std::f64::consts::PI * self.beam_radius.powi(2))
    }
}

/// Description of one ion species before initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub z: u32,
    pub a: u32,
    /// Declared decay daughter. Informational only: decay feeds population by list
    /// position after the descending-Z sort.
    #[serde(default)]
    pub decays_to: Option<u32>,
    #[serde(default)]
    pub beta_half_life: f64,
    #[serde(default = "default_initial_population")]
    pub initial_population: f64,
    #[serde(default)]
    pub charge_states: Vec<usize>,
}

fn default_initial_population() -> f64 {
    1.0
}

impl SpeciesConfig {
    pub fn new(z: u32, a: u32) -> Self {
        Self {
            z,
            a,
            decays_to: None,
            beta_half_life: 0.0,
            initial_population: default_initial_population(),
            charge_states: Vec::new(),
        }
    }

    pub fn with_half_life(mut self, half_life: f64) -> Self {
        self.beta_half_life = half_life;
        self
    }

    pub fn with_initial_population(mut self, population: f64) -> Self {
        self.initial_population = population;
        self
    }

    pub fn with_charge_states(mut self, charge_states: Vec<usize>) -> Self {
        self.charge_states = charge_states;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_species(
            self.z,
            self.a,
            self.beta_half_life,
            self.initial_population,
        )
    }
}

/// Range checks on the identity and seeding of one species.
pub(crate) fn check_species(
    z: u32,
    a: u32,
    beta_half_life: f64,
    initial_population: f64,
) -> Result<()> {
    let invalid = |reason: &str| EbitError::InvalidSpecies {
        z,
        reason: reason.to_string(),
    };
    if z == 0 {
        return Err(invalid("atomic number must be positive"));
    }
    // the ion mass enters the charge-exchange velocity as a divisor
    if a == 0 {
        return Err(invalid("mass number must be positive"));
    }
    if !beta_half_life.is_finite() || beta_half_life < 0.0 {
        return Err(invalid("beta half-life must be finite and non-negative"));
    }
    if !initial_population.is_finite() || initial_population < 0.0 {
        return Err(invalid("initial population must be finite and non-negative"));
    }
    Ok(())
}

/// A complete, serializable simulation description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub species: Vec<SpeciesConfig>,
    #[serde(default)]
    pub params: EbitParams,
    #[serde(default)]
    pub ionization: TabulatedCrossSections,
    #[serde(default)]
    pub radiative_recombination: TabulatedCrossSections,
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EbitError::InvalidParameter {
            name,
            reason: format!("must be finite and positive, got {value}"),
        });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EbitError::InvalidParameter {
            name,
            reason: format!("must be finite and non-negative, got {value}"),
        });
    }
    Ok(())
}
