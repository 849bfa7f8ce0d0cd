//! WASM bridge for the charge-breeding core.

use anyhow::{anyhow, Context};
use ebit_core::adaptive::IntegrationStats;
use ebit_core::{ChargeBreeder, ChargeStateTrace, Sample, SimulationConfig};
use js_sys::Float64Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmChargeBreeder {
    breeder: ChargeBreeder,
    stats: Vec<IntegrationStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesReport<'a> {
    pub z: u32,
    pub a: u32,
    pub traces: &'a [ChargeStateTrace],
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport<'a> {
    pub stats: &'a [IntegrationStats],
    pub species: Vec<SpeciesReport<'a>>,
}

#[wasm_bindgen]
impl WasmChargeBreeder {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmChargeBreeder, JsValue> {
        console_error_panic_hook::set_once();

        let config: SimulationConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|err| JsValue::from_str(&format!("Invalid simulation config: {err}")))?;
        Ok(WasmChargeBreeder::from_config(config))
    }

    /// Runs the simulation and returns every recorded trace.
    pub fn run(&mut self) -> Result<JsValue, JsValue> {
        self.simulate()
            .map_err(|err| JsValue::from_str(&format!("{err:#}")))?;
        serde_wasm_bindgen::to_value(&self.report())
            .map_err(|err| JsValue::from_str(&format!("Failed to serialize results: {err}")))
    }

    pub fn reset(&mut self) {
        self.breeder.reset();
        self.stats.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.breeder.is_initialized()
    }

    pub fn trace_times(&self, z: u32, charge_state: usize) -> Result<Float64Array, JsValue> {
        let values = self
            .trace_column(z, charge_state, |s| s.time)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Float64Array::from(values.as_slice()))
    }

    pub fn trace_populations(&self, z: u32, charge_state: usize) -> Result<Float64Array, JsValue> {
        let values = self
            .trace_column(z, charge_state, |s| s.population)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Float64Array::from(values.as_slice()))
    }
}

impl WasmChargeBreeder {
    pub fn from_config(config: SimulationConfig) -> Self {
        Self {
            breeder: ChargeBreeder::from_config(config),
            stats: Vec::new(),
        }
    }

    pub(crate) fn simulate(&mut self) -> anyhow::Result<()> {
        self.stats = self
            .breeder
            .run()
            .context("Charge breeding simulation failed")?;
        Ok(())
    }

    pub(crate) fn report(&self) -> SimulationReport<'_> {
        SimulationReport {
            stats: &self.stats,
            species: self
                .breeder
                .species()
                .iter()
                .map(|species| SpeciesReport {
                    z: species.z,
                    a: species.a,
                    traces: &species.results,
                })
                .collect(),
        }
    }

    pub(crate) fn trace_column(
        &self,
        z: u32,
        charge_state: usize,
        column: impl Fn(&Sample) -> f64,
    ) -> anyhow::Result<Vec<f64>> {
        let trace = self
            .breeder
            .trace(z, charge_state)
            .ok_or_else(|| anyhow!("No trace for Z = {z}, charge state {charge_state}"))?;
        Ok(trace.samples.iter().map(column).collect())
    }
}
