pub mod adaptive;
pub mod breeder;
pub mod config;
pub mod constants;
pub mod derivative;
pub mod error;
pub mod rates;
pub mod solvers;
pub mod species;
/// The `ebit_core` crate models charge-state breeding inside an electron-beam ion trap.
/// Every ion species carries a charge-state population vector that is advanced in time
/// by an adaptive, step-doubling RK4 integrator.
///
/// Key components:
/// - **Traits**: `CrossSectionProvider` (external cross-section tables), `SampleProbe` (sampling callback).
/// - **Rates**: Electron-impact and charge-exchange rate arrays, beta-decay constants.
/// - **Derivative**: Charge-state flux between neighbouring states plus decay coupling between species.
/// - **Solvers**: A single RK4 step over a species' owned stage buffers.
/// - **Adaptive**: Step-doubling error control driving the RK4 steps for one species.
/// - **Breeder**: The `ChargeBreeder` session that initializes once and integrates every species.
pub mod traits;

pub use breeder::ChargeBreeder;
pub use config::{EbitParams, RkStepParams, SimulationConfig, SpeciesConfig};
pub use error::{EbitError, Result};
pub use species::{ChargeStateTrace, Sample, Species};
