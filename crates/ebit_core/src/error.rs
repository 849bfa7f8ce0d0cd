use thiserror::Error;

use crate::rates::CrossSectionKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EbitError {
    #[error("Cannot simulate beta decay of the highest Z species (Z = {z}, half-life = {half_life} s)")]
    DecayingTopSpecies { z: u32, half_life: f64 },

    #[error("Species list is empty")]
    EmptySpeciesList,

    #[error("Invalid species Z = {z}: {reason}")]
    InvalidSpecies { z: u32, reason: String },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("No {kind} cross sections available for Z = {z}")]
    MissingCrossSections { kind: CrossSectionKind, z: u32 },

    #[error("{kind} cross sections for Z = {z} have {actual} entries, expected at least {expected}")]
    CrossSectionLength {
        kind: CrossSectionKind,
        z: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, EbitError>;
