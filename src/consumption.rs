//! Consumption-type registry.
//!
//! The six consumption categories of the source dataset and their feature
//! codes. Codes are fixed by the trained model; "Cativo" (captive-market
//! consumers) sits at 2 even though it reads like a subtotal of "Total".
//! Keep the numbers as they are.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumptionType {
    Total,
    Cativo,
    Residencial,
    Industrial,
    Comercial,
    Outros,
}

/// Every consumption type, in selector order.
pub const CONSUMPTION_REGISTRY: [ConsumptionType; 6] = [
    ConsumptionType::Total,
    ConsumptionType::Cativo,
    ConsumptionType::Residencial,
    ConsumptionType::Industrial,
    ConsumptionType::Comercial,
    ConsumptionType::Outros,
];

impl ConsumptionType {
    /// Feature code used by the oracle (`tipo_consumo` column).
    pub fn code(self) -> u8 {
        match self {
            ConsumptionType::Total => 1,
            ConsumptionType::Cativo => 2,
            ConsumptionType::Residencial => 3,
            ConsumptionType::Industrial => 4,
            ConsumptionType::Comercial => 5,
            ConsumptionType::Outros => 6,
        }
    }

    /// Selector label.
    pub fn name(self) -> &'static str {
        match self {
            ConsumptionType::Total => "Total",
            ConsumptionType::Cativo => "Cativo",
            ConsumptionType::Residencial => "Residencial",
            ConsumptionType::Industrial => "Industrial",
            ConsumptionType::Comercial => "Comercial",
            ConsumptionType::Outros => "Outros",
        }
    }

    /// Looks up a type by its exact selector label.
    pub fn from_name(name: &str) -> Option<Self> {
        CONSUMPTION_REGISTRY.into_iter().find(|t| t.name() == name)
    }

    pub fn from_code(code: u8) -> Option<Self> {
        CONSUMPTION_REGISTRY.into_iter().find(|t| t.code() == code)
    }

    /// Case-insensitive lookup for command-line input. English aliases are
    /// accepted for the categories that have an obvious one.
    pub fn resolve(input: &str) -> Option<Self> {
        let lowered = input.trim().to_lowercase();
        CONSUMPTION_REGISTRY
            .into_iter()
            .find(|t| t.name().to_lowercase() == lowered)
            .or(match lowered.as_str() {
                "captive" => Some(ConsumptionType::Cativo),
                "residential" => Some(ConsumptionType::Residencial),
                "commercial" => Some(ConsumptionType::Comercial),
                "other" | "others" => Some(ConsumptionType::Outros),
                _ => None,
            })
    }
}

impl fmt::Display for ConsumptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_in_range_and_injective() {
        let codes: HashSet<u8> = CONSUMPTION_REGISTRY.iter().map(|t| t.code()).collect();
        assert_eq!(codes.len(), 6);
        assert!(codes.iter().all(|c| (1..=6).contains(c)));
    }

    #[test]
    fn test_codes_match_the_trained_model() {
        assert_eq!(ConsumptionType::Total.code(), 1);
        assert_eq!(ConsumptionType::Cativo.code(), 2);
        assert_eq!(ConsumptionType::Residencial.code(), 3);
        assert_eq!(ConsumptionType::Industrial.code(), 4);
        assert_eq!(ConsumptionType::Comercial.code(), 5);
        assert_eq!(ConsumptionType::Outros.code(), 6);
    }

    #[test]
    fn test_name_and_code_lookups_are_inverse() {
        for t in CONSUMPTION_REGISTRY {
            assert_eq!(ConsumptionType::from_name(t.name()), Some(t));
            assert_eq!(ConsumptionType::from_code(t.code()), Some(t));
        }
        assert_eq!(ConsumptionType::from_code(0), None);
        assert_eq!(ConsumptionType::from_code(7), None);
    }

    #[test]
    fn test_exact_lookup_rejects_unknown_labels() {
        assert_eq!(ConsumptionType::from_name("Rural"), None);
        assert_eq!(ConsumptionType::from_name("residencial"), None);
    }

    #[test]
    fn test_resolve_is_lenient() {
        assert_eq!(ConsumptionType::resolve("residencial"), Some(ConsumptionType::Residencial));
        assert_eq!(ConsumptionType::resolve("Captive"), Some(ConsumptionType::Cativo));
        assert_eq!(ConsumptionType::resolve(" OUTROS "), Some(ConsumptionType::Outros));
        assert_eq!(ConsumptionType::resolve("rural"), None);
    }
}
