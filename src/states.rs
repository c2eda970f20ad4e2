//! Federative unit registry.
//!
//! Defines the 27 Brazilian federative units the oracle was trained on,
//! along with the integer code each one is encoded as. This is the single
//! source of truth for state codes: all other modules should reference
//! states from here rather than hardcoding codes.
//!
//! The codes are a contract with the trained model. Adding or renumbering a
//! state requires retraining, not just editing this table.

use std::fmt;

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// IBGE macro-region of a federative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Norte,
    Nordeste,
    Sudeste,
    Sul,
    CentroOeste,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Norte => write!(f, "Norte"),
            Region::Nordeste => write!(f, "Nordeste"),
            Region::Sudeste => write!(f, "Sudeste"),
            Region::Sul => write!(f, "Sul"),
            Region::CentroOeste => write!(f, "Centro-Oeste"),
        }
    }
}

// ---------------------------------------------------------------------------
// State metadata
// ---------------------------------------------------------------------------

/// Metadata for a single federative unit.
#[derive(Debug)]
pub struct State {
    /// Feature code used by the oracle (`sigla_uf` column).
    pub code: u8,
    /// Official name, with accents, as offered in the selector.
    pub name: &'static str,
    /// Two-letter UF abbreviation.
    pub uf: &'static str,
    pub region: Region,
}

/// All federative units, ordered by feature code.
///
/// The order matches the selector order the model was published with, which
/// is roughly north to south rather than alphabetical.
pub static STATE_REGISTRY: &[State] = &[
    State { code: 1, name: "Roraima", uf: "RR", region: Region::Norte },
    State { code: 2, name: "Acre", uf: "AC", region: Region::Norte },
    State { code: 3, name: "Amazonas", uf: "AM", region: Region::Norte },
    State { code: 4, name: "Rondônia", uf: "RO", region: Region::Norte },
    State { code: 5, name: "Pará", uf: "PA", region: Region::Norte },
    State { code: 6, name: "Amapá", uf: "AP", region: Region::Norte },
    State { code: 7, name: "Tocantins", uf: "TO", region: Region::Norte },
    State { code: 8, name: "Maranhão", uf: "MA", region: Region::Nordeste },
    State { code: 9, name: "Piauí", uf: "PI", region: Region::Nordeste },
    State { code: 10, name: "Ceará", uf: "CE", region: Region::Nordeste },
    State { code: 11, name: "Rio Grande do Norte", uf: "RN", region: Region::Nordeste },
    State { code: 12, name: "Paraíba", uf: "PB", region: Region::Nordeste },
    State { code: 13, name: "Pernambuco", uf: "PE", region: Region::Nordeste },
    State { code: 14, name: "Alagoas", uf: "AL", region: Region::Nordeste },
    State { code: 15, name: "Sergipe", uf: "SE", region: Region::Nordeste },
    State { code: 16, name: "Bahia", uf: "BA", region: Region::Nordeste },
    State { code: 17, name: "Minas Gerais", uf: "MG", region: Region::Sudeste },
    State { code: 18, name: "Espírito Santo", uf: "ES", region: Region::Sudeste },
    State { code: 19, name: "Rio de Janeiro", uf: "RJ", region: Region::Sudeste },
    State { code: 20, name: "São Paulo", uf: "SP", region: Region::Sudeste },
    State { code: 21, name: "Paraná", uf: "PR", region: Region::Sul },
    State { code: 22, name: "Santa Catarina", uf: "SC", region: Region::Sul },
    State { code: 23, name: "Rio Grande do Sul", uf: "RS", region: Region::Sul },
    State { code: 24, name: "Mato Grosso do Sul", uf: "MS", region: Region::CentroOeste },
    State { code: 25, name: "Mato Grosso", uf: "MT", region: Region::CentroOeste },
    State { code: 26, name: "Goiás", uf: "GO", region: Region::CentroOeste },
    State { code: 27, name: "Distrito Federal", uf: "DF", region: Region::CentroOeste },
];

/// Looks up a state by its exact name. Returns `None` if not found.
pub fn find_state(name: &str) -> Option<&'static State> {
    STATE_REGISTRY.iter().find(|s| s.name == name)
}

/// Looks up a state by feature code.
pub fn find_state_by_code(code: u8) -> Option<&'static State> {
    STATE_REGISTRY.iter().find(|s| s.code == code)
}

/// Resolves loosely typed user input: exact name, then case-insensitive
/// name, then UF abbreviation.
pub fn resolve_state(input: &str) -> Option<&'static State> {
    let input = input.trim();
    find_state(input)
        .or_else(|| {
            let lowered = input.to_lowercase();
            STATE_REGISTRY.iter().find(|s| s.name.to_lowercase() == lowered)
        })
        .or_else(|| STATE_REGISTRY.iter().find(|s| s.uf.eq_ignore_ascii_case(input)))
}

/// States belonging to one macro-region.
pub fn states_in_region(region: Region) -> Vec<&'static State> {
    STATE_REGISTRY.iter().filter(|s| s.region == region).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
