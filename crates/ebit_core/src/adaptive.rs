//! Step-doubling error control for the per-species RK4 integration.
//!
//! Each trial compares one step of size 2h against two steps of size h. The summed
//! absolute difference is the error estimate; the proposed step is
//! `h * (desired / error)^(1/5)`. A trial is accepted when the proposal is at least
//! h (or the error is exactly zero), and the next trial uses 0.9 times the proposal.
//!
//! An accepted trial adopts the two-half-step result, which covers 2h of evolution,
//! while simulated time advances by h only. On the sampled time axis every rate
//! therefore acts at twice its nominal value (a decay constant λ shows up as
//! `exp(-2λt)`).

use log::{debug, info};
use serde::Serialize;

use crate::config::EbitParams;
use crate::derivative::{DecayCoupling, RateField};
use crate::species::Species;
use crate::traits::SampleProbe;

const SAFETY: f64 = 0.9;

/// Bookkeeping for one species' integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationStats {
    pub z: u32,
    pub accepted_steps: usize,
    /// Trials rejected because the proposed step was smaller than the trial step.
    /// Informational only.
    pub rejected_steps: usize,
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDecision {
    pub accept: bool,
    pub next_step: f64,
}

/// Decides the fate of a trial of size `step` with error estimate `error`.
pub fn control_step(step: f64, error: f64, desired_accuracy: f64) -> StepDecision {
    if error > 0.0 {
        let best_step = step * (desired_accuracy / error).powf(0.2);
        StepDecision {
            accept: best_step >= step,
            next_step: SAFETY * best_step,
        }
    } else {
        StepDecision {
            accept: true,
            next_step: step,
        }
    }
}

/// Integration state of the species currently being advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepController {
    pub time: f64,
    pub next_sample: f64,
    pub step: f64,
    pub stats: IntegrationStats,
}

impl StepController {
    pub fn new(z: u32, initial_step: f64) -> Self {
        Self {
            time: 0.0,
            next_sample: 0.0,
            step: initial_step,
            stats: IntegrationStats {
                z,
                ..IntegrationStats::default()
            },
        }
    }

    /// Performs one step-doubling trial and adopts the refined solution if accepted.
    /// Returns the error estimate of the trial.
    pub fn advance(
        &mut self,
        species: &mut Species,
        decay: DecayCoupling,
        desired_accuracy: f64,
    ) -> f64 {
        let step = self.step;
        let field = RateField::new(species.z as usize, &species.rates, decay);

        species
            .rk4
            .step(&field, 2.0 * step, &species.population, &mut species.y1);
        species
            .rk4
            .step(&field, step, &species.population, &mut species.y12);
        species
            .rk4
            .step(&field, step, &species.y12, &mut species.y22);

        let error: f64 = species
            .y1
            .iter()
            .zip(&species.y22)
            .map(|(full, halves)| (full - halves).abs())
            .sum();

        let decision = control_step(step, error, desired_accuracy);
        if decision.accept {
            self.time += step;
            species.population.copy_from_slice(&species.y22);
            self.stats.accepted_steps += 1;
        } else {
            self.stats.rejected_steps += 1;
        }
        self.step = decision.next_step;
        error
    }
}

/// Integrates `species[index]` from t = 0 until the breeding time is passed.
///
/// Decay gain is read from the trial population of `species[index + 1]`, whatever that
/// species currently holds. Species are integrated one after another, so this is the
/// scratch state left by its own last integration (zero before its first one).
pub fn integrate_species<P>(
    species: &mut [Species],
    index: usize,
    params: &EbitParams,
    probe: &mut P,
) -> IntegrationStats
where
    P: SampleProbe + ?Sized,
{
    let (head, tail) = species.split_at_mut(index + 1);
    let current = &mut head[index];
    let decay = DecayCoupling {
        active: params.beta_decay_active,
        loss_constant: params
            .decay_constants
            .get(index)
            .copied()
            .unwrap_or(current.decay_constant),
        gain: tail.first().map(|next| {
            let constant = params
                .decay_constants
                .get(index + 1)
                .copied()
                .unwrap_or(next.decay_constant);
            (constant, next.rk4.tmp.as_slice())
        }),
    };

    info!("Simulating species Z = {}", current.z);
    let mut controller = StepController::new(current.z, params.rk.time_step);

    while controller.time <= params.breeding_time {
        if controller.time >= controller.next_sample {
            controller.next_sample += params.probe_every;
            probe.sample(controller.time, params, current);
            controller.stats.samples += 1;
        }
        controller.advance(current, decay, params.rk.desired_accuracy);
    }

    debug!(
        "Species Z = {} done: {} accepted, {} rejected steps, {} samples",
        current.z,
        controller.stats.accepted_steps,
        controller.stats.rejected_steps,
        controller.stats.samples
    );
    controller.stats
}
