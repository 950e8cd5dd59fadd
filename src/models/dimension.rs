//! The five fixed Amor Fati dimensions and the priority selection.

use serde::{Deserialize, Serialize};

/// Maximum score for a single dimension.
pub const MAX_DIMENSION_SCORE: u8 = 8;

/// Maximum total score across all five dimensions.
pub const MAX_TOTAL_SCORE: u8 = 40;

/// One of the five fixed psychological axes, scored 0-8 per assessment.
///
/// The declaration order is the canonical dimension order; ties in
/// lowest-score lookups are broken by this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Ressentiment,
    Souffrance,
    Authenticite,
    Creation,
    Eternel,
}

/// All dimensions in canonical order.
pub const ALL_DIMENSIONS: [Dimension; 5] = [
    Dimension::Ressentiment,
    Dimension::Souffrance,
    Dimension::Authenticite,
    Dimension::Creation,
    Dimension::Eternel,
];

impl Dimension {
    /// ASCII-safe key used in serialized data and recommendation lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Ressentiment => "ressentiment",
            Dimension::Souffrance => "souffrance",
            Dimension::Authenticite => "authenticite",
            Dimension::Creation => "creation",
            Dimension::Eternel => "eternel",
        }
    }

    /// Display label, matching the historical export format.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Ressentiment => "Ressentiment",
            Dimension::Souffrance => "Souffrance présente",
            Dimension::Authenticite => "Authenticité",
            Dimension::Creation => "Création",
            Dimension::Eternel => "Éternel Retour",
        }
    }

    /// Short question shown next to the score selector in the form.
    pub fn prompt(&self) -> &'static str {
        match self {
            Dimension::Ressentiment => "Ai-je fait la paix avec mon passé ?",
            Dimension::Souffrance => "Est-ce que j'accepte les difficultés actuelles ?",
            Dimension::Authenticite => "Est-ce que je vis selon mes propres valeurs ?",
            Dimension::Creation => "Suis-je un créateur actif de ma vie ?",
            Dimension::Eternel => "Voudrais-je revivre ma vie telle quelle ?",
        }
    }
}

/// A user-selected dimension of focus used to pick a canned recommendation
/// set. `None` is an explicit "no specific priority" choice, distinct from
/// the priority never having been set at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Ressentiment,
    Souffrance,
    Authenticite,
    Creation,
    Eternel,
    None,
}

/// Priority choices in menu order.
pub const ALL_PRIORITIES: [Priority; 6] = [
    Priority::Ressentiment,
    Priority::Souffrance,
    Priority::Authenticite,
    Priority::Creation,
    Priority::Eternel,
    Priority::None,
];

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Ressentiment => "Passé & Ressentiment",
            Priority::Souffrance => "Souffrance présente",
            Priority::Authenticite => "Authenticité",
            Priority::Creation => "Création",
            Priority::Eternel => "Éternel Retour",
            Priority::None => "Aucune priorité spécifique",
        }
    }

    /// Longer description shown on the Settings tab.
    pub fn description(&self) -> &'static str {
        match self {
            Priority::Ressentiment => "Me libérer du poids de mon passé",
            Priority::Souffrance => "Mieux accepter les difficultés actuelles",
            Priority::Authenticite => "Vivre selon mes propres valeurs",
            Priority::Creation => "Devenir un créateur actif de ma vie",
            Priority::Eternel => "Affirmer totalement ma vie",
            Priority::None => "Observer mon évolution globale",
        }
    }

    /// Next choice in menu order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Priority::Ressentiment => Priority::Souffrance,
            Priority::Souffrance => Priority::Authenticite,
            Priority::Authenticite => Priority::Creation,
            Priority::Creation => Priority::Eternel,
            Priority::Eternel => Priority::None,
            Priority::None => Priority::Ressentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serde_keys() {
        let json = serde_json::to_string(&Priority::Authenticite).unwrap();
        assert_eq!(json, "\"authenticite\"");
        let back: Priority = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(back, Priority::None);
    }

    #[test]
    fn test_priority_cycle_covers_all() {
        let mut p = Priority::Ressentiment;
        for expected in ALL_PRIORITIES.iter().skip(1) {
            p = p.next();
            assert_eq!(p, *expected);
        }
        assert_eq!(p.next(), Priority::Ressentiment);
    }
}
