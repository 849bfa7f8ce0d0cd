use crate::config::EbitParams;
use crate::error::Result;
use crate::rates::CrossSectionKind;
use crate::species::Species;

/// Supplies electron-impact cross sections for one kind of interaction.
pub trait CrossSectionProvider {
    /// Returns cross sections in cm^2 indexed by charge state.
    /// kind: the interaction the rates are being built for
    /// beam_energy: electron beam energy in eV
    /// z: atomic number of the species
    /// The result must hold at least z + 1 entries.
    fn cross_sections(&self, kind: CrossSectionKind, beam_energy: f64, z: u32)
        -> Result<Vec<f64>>;
}

impl<F> CrossSectionProvider for F
where
    F: Fn(f64, u32) -> Vec<f64>,
{
    fn cross_sections(
        &self,
        _kind: CrossSectionKind,
        beam_energy: f64,
        z: u32,
    ) -> Result<Vec<f64>> {
        Ok(self(beam_energy, z))
    }
}

/// Called by the step controller whenever a scheduled sample time is reached.
pub trait SampleProbe {
    /// time: simulated time of the sample
    /// params: shared trap parameters
    /// species: the species being integrated, with its current population
    fn sample(&mut self, time: f64, params: &EbitParams, species: &mut Species);
}

impl<F> SampleProbe for F
where
    F: FnMut(f64, &EbitParams, &mut Species),
{
    fn sample(&mut self, time: f64, params: &EbitParams, species: &mut Species) {
        self(time, params, species)
    }
}

/// Default probe: appends the population of every tracked charge state to the species' traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationProbe;

impl SampleProbe for PopulationProbe {
    fn sample(&mut self, time: f64, _params: &EbitParams, species: &mut Species) {
        species.record_sample(time);
    }
}
