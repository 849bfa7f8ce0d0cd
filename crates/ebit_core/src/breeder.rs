//! The simulation session: one-time rate initialization followed by sequential
//! per-species integration.

use log::{info, warn};

use crate::adaptive::{integrate_species, IntegrationStats};
use crate::config::{EbitParams, SimulationConfig, SpeciesConfig};
use crate::error::{EbitError, Result};
use crate::rates::{decay_constant, RateModel};
use crate::species::{ChargeStateTrace, RateArrays, Species};
use crate::traits::{CrossSectionProvider, PopulationProbe, SampleProbe};

/// Owns every species, the shared trap parameters and the cross-section providers.
///
/// Initialization runs at most once per session; [`ChargeBreeder::reset`] re-arms it.
pub struct ChargeBreeder {
    species: Vec<Species>,
    params: EbitParams,
    ionization: Box<dyn CrossSectionProvider>,
    recombination: Box<dyn CrossSectionProvider>,
    initialized: bool,
}

impl ChargeBreeder {
    pub fn new<I, R>(
        species: Vec<SpeciesConfig>,
        params: EbitParams,
        ionization: I,
        recombination: R,
    ) -> Self
    where
        I: CrossSectionProvider + 'static,
        R: CrossSectionProvider + 'static,
    {
        Self {
            species: species.into_iter().map(Species::from).collect(),
            params,
            ionization: Box::new(ionization),
            recombination: Box::new(recombination),
            initialized: false,
        }
    }

    pub fn from_config(config: SimulationConfig) -> Self {
        Self::new(
            config.species,
            config.params,
            config.ionization,
            config.radiative_recombination,
        )
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn params(&self) -> &EbitParams {
        &self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Trace of `charge_state` for the first species with atomic number `z`.
    pub fn trace(&self, z: u32, charge_state: usize) -> Option<&ChargeStateTrace> {
        self.species
            .iter()
            .find(|species| species.z == z)
            .and_then(|species| species.trace(charge_state))
    }

    /// Clears the initialization guard; the next run rebuilds every buffer and rate.
    pub fn reset(&mut self) {
        self.initialized = false;
    }

    /// Sorts species by descending Z, allocates buffers and computes all rates.
    ///
    /// Does nothing if the session is already initialized. On error the session is
    /// left untouched and un-initialized.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            warn!("Charge breeder already initialized; skipping");
            return Ok(());
        }

        self.params.validate()?;
        if self.species.is_empty() {
            return Err(EbitError::EmptySpeciesList);
        }

        let mut species = self.species.clone();
        let mut params = self.params.clone();

        species.sort_by(|a, b| b.z.cmp(&a.z));
        let top = &species[0];
        if top.beta_half_life != 0.0 {
            return Err(EbitError::DecayingTopSpecies {
                z: top.z,
                half_life: top.beta_half_life,
            });
        }
        let max_z = top.z;
        let len = max_z as usize + 2;

        params.rk.desired_accuracy = params.rk.desired_accuracy_per_charge_state / max_z as f64;
        params.current_density = params.compute_current_density();
        params.decay_constants.clear();
        params.beta_decay_active = false;

        for entry in &mut species {
            entry.validate(len)?;
            entry.allocate(len);

            entry.decay_constant = decay_constant(entry.beta_half_life);
            if entry.decay_constant > 0.0 {
                params.beta_decay_active = true;
            }
            params.decay_constants.push(entry.decay_constant);

            entry.rates = RateArrays {
                ionization: RateModel::Ionization(&*self.ionization)
                    .rates(entry.z, entry.a, &params)?,
                radiative_recombination: RateModel::RadiativeRecombination(
                    &*self.recombination,
                )
                .rates(entry.z, entry.a, &params)?,
                charge_exchange: RateModel::ChargeExchange.rates(entry.z, entry.a, &params)?,
            };
        }

        info!(
            "Initialized {} species (max Z = {}, current density = {:.4e} A/cm^2, beta decay {})",
            species.len(),
            max_z,
            params.current_density,
            if params.beta_decay_active { "on" } else { "off" }
        );

        self.species = species;
        self.params = params;
        self.initialized = true;
        Ok(())
    }

    /// Initializes if needed, then integrates every species in descending-Z order,
    /// each one to completion before the next starts.
    pub fn calc_charge_populations<P>(&mut self, probe: &mut P) -> Result<Vec<IntegrationStats>>
    where
        P: SampleProbe + ?Sized,
    {
        self.initialize()?;

        let mut stats = Vec::with_capacity(self.species.len());
        for index in 0..self.species.len() {
            stats.push(integrate_species(
                &mut self.species,
                index,
                &self.params,
                probe,
            ));
        }
        Ok(stats)
    }

    /// Runs the simulation recording tracked charge states into each species' traces.
    pub fn run(&mut self) -> Result<Vec<IntegrationStats>> {
        self.calc_charge_populations(&mut PopulationProbe)
    }
}
