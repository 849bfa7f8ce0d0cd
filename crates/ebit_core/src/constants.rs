//! Physical constants used by the rate calculations.
//!
//! Values are kept at the precision the reference tables were produced with; changing
//! them changes every downstream rate.

/// Electron rest mass in eV.
pub const EMASS: f64 = 5.11e5;
/// Speed of light in cm/s.
pub const C: f64 = 3.0e10;
/// Elementary charge in C.
pub const ECHG: f64 = 1.6e-19;
/// Bohr velocity in cm/s.
pub const VBOHR: f64 = 2.2e8;
/// One atomic mass unit in eV.
pub const AMU: f64 = 9.311e8;
/// Number density (cm^-3) of gas at one torr.
pub const TORR: f64 = 3.537e16;
/// Fine-structure constant.
pub const ALPHA: f64 = 7.2974e-3;
/// Charge-exchange cross-section constant (cm^2).
pub const CHEXCONST: f64 = 2.25e-16;
/// Length conversion factor to CGS.
pub const LCONV: f64 = 3.861e-11;
