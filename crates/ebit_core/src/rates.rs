//! Rate arrays for the charge-changing processes inside the trap.
//!
//! Electron-impact processes (ionization, radiative recombination) turn externally
//! supplied cross sections into rates using the beam energy and current density.
//! Charge exchange with residual H2 gas is computed here from pressure, temperature
//! and ion mass. Every rate array is indexed by charge state and has length Z + 2.

use std::collections::BTreeMap;
use std::f64::consts::{LN_2, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EbitParams;
use crate::constants::{AMU, C, CHEXCONST, ECHG, EMASS, TORR, VBOHR};
use crate::error::{EbitError, Result};
use crate::traits::CrossSectionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossSectionKind {
    Ionization,
    RadiativeRecombination,
}

impl fmt::Display for CrossSectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossSectionKind::Ionization => write!(f, "ionization"),
            CrossSectionKind::RadiativeRecombination => write!(f, "radiative recombination"),
        }
    }
}

/// Cross sections stored per atomic number, independent of beam energy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabulatedCrossSections {
    pub tables: BTreeMap<u32, Vec<f64>>,
}

impl TabulatedCrossSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, z: u32, cross_sections: Vec<f64>) -> Self {
        self.tables.insert(z, cross_sections);
        self
    }
}

impl CrossSectionProvider for TabulatedCrossSections {
    fn cross_sections(
        &self,
        kind: CrossSectionKind,
        _beam_energy: f64,
        z: u32,
    ) -> Result<Vec<f64>> {
        self.tables
            .get(&z)
            .cloned()
            .ok_or(EbitError::MissingCrossSections { kind, z })
    }
}

/// The closed set of rate strategies used during initialization.
pub enum RateModel<'a> {
    Ionization(&'a dyn CrossSectionProvider),
    RadiativeRecombination(&'a dyn CrossSectionProvider),
    ChargeExchange,
}

impl RateModel<'_> {
    /// Builds the zero-padded rate array (length z + 2) for one species.
    pub fn rates(&self, z: u32, a: u32, params: &EbitParams) -> Result<Vec<f64>> {
        let values = match self {
            RateModel::Ionization(provider) => electron_impact_rates(
                CrossSectionKind::Ionization,
                *provider,
                z,
                params,
            )?,
            RateModel::RadiativeRecombination(provider) => electron_impact_rates(
                CrossSectionKind::RadiativeRecombination,
                *provider,
                z,
                params,
            )?,
            RateModel::ChargeExchange => {
                charge_exchange_rates(z, a, params.pressure, params.ion_temperature)
            }
        };

        let mut padded = vec![0.0; z as usize + 2];
        padded[..values.len()].copy_from_slice(&values);
        Ok(padded)
    }
}

fn electron_impact_rates(
    kind: CrossSectionKind,
    provider: &dyn CrossSectionProvider,
    z: u32,
    params: &EbitParams,
) -> Result<Vec<f64>> {
    let cross_sections = provider.cross_sections(kind, params.beam_energy, z)?;
    let expected = z as usize + 1;
    if cross_sections.len() < expected {
        return Err(EbitError::CrossSectionLength {
            kind,
            z,
            expected,
            actual: cross_sections.len(),
        });
    }
    Ok(interaction_rates(
        z,
        params.beam_energy,
        params.current_density,
        &cross_sections,
    ))
}

/// Rate of an electron-impact interaction for each charge state 0..=z.
/// beam_energy in eV, current_density in A/cm^2, cross_sections in cm^2.
/// Callers guarantee at least z + 1 cross sections.
pub(crate) fn interaction_rates(
    z: u32,
    beam_energy: f64,
    current_density: f64,
    cross_sections: &[f64],
) -> Vec<f64> {
    let electron_velocity = C * (2.0 * (beam_energy / EMASS)).sqrt();
    let electron_rate = current_density / ECHG / electron_velocity;

    cross_sections[..=z as usize]
        .iter()
        .map(|sigma| sigma * electron_velocity * electron_rate)
        .collect()
}

/// Charge-exchange rate with residual H2 for each charge state 0..=z.
/// Charge state 0 cannot capture and stays at zero.
pub fn charge_exchange_rates(z: u32, a: u32, pressure: f64, ion_temperature: f64) -> Vec<f64> {
    let mut rates = vec![0.0; z as usize + 1];

    let h2_density = pressure * TORR;
    let ion_mass = a as f64 * AMU;
    let avg_ion_v = C * (8.0 * (ion_temperature / (PI * ion_mass))).sqrt();
    let avg_ion_v_bohr = avg_ion_v / VBOHR;
    let sig_v = CHEXCONST * (15.0 / avg_ion_v_bohr).ln() * avg_ion_v;

    for (q, rate) in rates.iter_mut().enumerate().skip(1) {
        *rate = q as f64 * sig_v * h2_density;
    }
    rates
}

/// ln(2) / half-life, or zero for a stable species.
pub fn decay_constant(half_life: f64) -> f64 {
    if half_life <= 0.0 {
        0.0
    } else {
        LN_2 / half_life
    }
}
