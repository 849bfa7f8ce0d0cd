//! Rate of change of a species' charge-state populations.
//!
//! For every charge state q below Z the net flux between q and q + 1 is
//!
//! ```text
//! flux[q] = h * (-ion[q] * n[q] + (chex[q+1] + rr[q+1]) * n[q+1])
//! ```
//!
//! and the increment at q is `flux[q] - flux[q-1]`, so whatever leaves one state
//! enters its neighbour. The fully stripped state Z only receives `-flux[Z-1]`.
//! Beta decay adds `h * (-lambda_self * n[q] + lambda_next * n_next[q])` at every
//! q >= 1, where `n_next` is the trial population of the following species in the
//! descending-Z list.

use crate::species::RateArrays;

/// Beta-decay coupling of one species to its list neighbour.
#[derive(Debug, Clone, Copy)]
pub struct DecayCoupling<'a> {
    pub active: bool,
    /// Decay constant of the species being integrated.
    pub loss_constant: f64,
    /// Decay constant and trial population of the next species, if there is one.
    pub gain: Option<(f64, &'a [f64])>,
}

impl DecayCoupling<'_> {
    pub fn disabled() -> Self {
        Self {
            active: false,
            loss_constant: 0.0,
            gain: None,
        }
    }

    /// Decay increment at charge state `q` for step `step`.
    pub fn delta(&self, q: usize, tmp_pop: &[f64], step: f64) -> f64 {
        if q == 0 {
            return 0.0;
        }
        let mut value = -self.loss_constant * tmp_pop[q];
        if let Some((gain_constant, next_pop)) = self.gain {
            value += gain_constant * next_pop.get(q).copied().unwrap_or(0.0);
        }
        step * value
    }
}

/// The charge-changing vector field of one species.
#[derive(Debug, Clone, Copy)]
pub struct RateField<'a> {
    /// Highest charge state (the species' Z).
    pub z: usize,
    pub rates: &'a RateArrays,
    pub decay: DecayCoupling<'a>,
}

impl<'a> RateField<'a> {
    pub fn new(z: usize, rates: &'a RateArrays, decay: DecayCoupling<'a>) -> Self {
        Self { z, rates, decay }
    }

    /// Evaluates the step-scaled derivative at `base + weight * delta`.
    ///
    /// base: population the RK step starts from
    /// delta: previous stage increment (ignored when weight is 0)
    /// tmp_pop: receives the trial population in 0..=z
    /// out: receives the increment in 0..=z
    pub fn evaluate(
        &self,
        base: &[f64],
        delta: &[f64],
        weight: f64,
        step: f64,
        tmp_pop: &mut [f64],
        out: &mut [f64],
    ) {
        let z = self.z;
        for q in 0..=z {
            tmp_pop[q] = base[q] + delta[q] * weight;
        }

        let ionization = &self.rates.ionization;
        let recombination = &self.rates.radiative_recombination;
        let charge_exchange = &self.rates.charge_exchange;

        let mut last_flux = 0.0;
        for q in 0..z {
            let flux = step
                * ((-ionization[q] * tmp_pop[q])
                    + ((charge_exchange[q + 1] + recombination[q + 1]) * tmp_pop[q + 1]));
            let decay = if self.decay.active {
                self.decay.delta(q, tmp_pop, step)
            } else {
                0.0
            };
            out[q] = (flux - last_flux) + decay;
            last_flux = flux;
        }

        let top_decay = if self.decay.active {
            self.decay.delta(z, tmp_pop, step)
        } else {
            0.0
        };
        out[z] = -last_flux + top_decay;
    }
}
