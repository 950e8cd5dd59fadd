//! Assessment records and the per-dimension score set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dimension::{Dimension, Priority, ALL_DIMENSIONS};

/// Scores for the five dimensions of a single assessment.
///
/// Serialized field names are the French display labels, matching the
/// historical export format so old export files import cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    #[serde(rename = "Ressentiment", default)]
    pub ressentiment: u8,
    #[serde(rename = "Souffrance présente", default)]
    pub souffrance: u8,
    #[serde(rename = "Authenticité", default)]
    pub authenticite: u8,
    #[serde(rename = "Création", default)]
    pub creation: u8,
    #[serde(rename = "Éternel Retour", default)]
    pub eternel: u8,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Ressentiment => self.ressentiment,
            Dimension::Souffrance => self.souffrance,
            Dimension::Authenticite => self.authenticite,
            Dimension::Creation => self.creation,
            Dimension::Eternel => self.eternel,
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: u8) {
        let slot = match dimension {
            Dimension::Ressentiment => &mut self.ressentiment,
            Dimension::Souffrance => &mut self.souffrance,
            Dimension::Authenticite => &mut self.authenticite,
            Dimension::Creation => &mut self.creation,
            Dimension::Eternel => &mut self.eternel,
        };
        *slot = score;
    }

    /// Iterate (dimension, score) pairs in canonical dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        ALL_DIMENSIONS.iter().map(move |d| (*d, self.get(*d)))
    }

    /// Sum of all five scores. Max is 40, fits u8.
    pub fn total(&self) -> u8 {
        self.iter().map(|(_, s)| s).sum()
    }

    /// Lowest-scoring dimension; ties broken by canonical dimension order.
    pub fn lowest(&self) -> (Dimension, u8) {
        let mut lowest = (ALL_DIMENSIONS[0], self.get(ALL_DIMENSIONS[0]));
        for (dim, score) in self.iter().skip(1) {
            if score < lowest.1 {
                lowest = (dim, score);
            }
        }
        lowest
    }
}

/// One completed scoring event. Immutable once created; deleted only via
/// a full data wipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub date: DateTime<Utc>,
    #[serde(rename = "dimensionScores")]
    pub dimension_scores: DimensionScores,
    #[serde(rename = "totalScore")]
    pub total_score: u8,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl Assessment {
    /// Build a record from form input, computing the total.
    pub fn new(scores: DimensionScores, context: String, priority: Option<Priority>) -> Self {
        Self {
            date: Utc::now(),
            total_score: scores.total(),
            dimension_scores: scores,
            context,
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(r: u8, s: u8, a: u8, c: u8, e: u8) -> DimensionScores {
        DimensionScores {
            ressentiment: r,
            souffrance: s,
            authenticite: a,
            creation: c,
            eternel: e,
        }
    }

    #[test]
    fn test_total_is_sum_and_bounded() {
        // Exhaustive over a few corners plus a sweep of one axis
        assert_eq!(scores(0, 0, 0, 0, 0).total(), 0);
        assert_eq!(scores(8, 8, 8, 8, 8).total(), 40);
        for v in 0..=8u8 {
            let total = scores(v, 8 - v, 3, 0, 8).total();
            assert_eq!(total, v + (8 - v) + 3 + 8);
            assert!(total <= 40);
        }
    }

    #[test]
    fn test_lowest_dimension_worked_example() {
        let s = scores(2, 5, 3, 1, 6);
        assert_eq!(s.lowest(), (Dimension::Creation, 1));
    }

    #[test]
    fn test_lowest_tie_breaks_on_canonical_order() {
        let s = scores(3, 3, 3, 3, 3);
        assert_eq!(s.lowest().0, Dimension::Ressentiment);
        let s = scores(5, 2, 2, 7, 7);
        assert_eq!(s.lowest().0, Dimension::Souffrance);
    }

    #[test]
    fn test_serialized_field_names_match_export_format() {
        let a = Assessment::new(scores(1, 2, 3, 4, 5), "test".into(), Some(Priority::Creation));
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["totalScore"], 15);
        assert_eq!(json["dimensionScores"]["Souffrance présente"], 2);
        assert_eq!(json["dimensionScores"]["Éternel Retour"], 5);
        assert_eq!(json["priority"], "creation");
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "date": "2024-03-01T10:00:00.000Z",
            "dimensionScores": {
                "Ressentiment": 2,
                "Souffrance présente": 5,
                "Authenticité": 3,
                "Création": 1,
                "Éternel Retour": 6
            },
            "totalScore": 17,
            "context": "semaine difficile",
            "priority": "eternel"
        }"#;
        let a: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(a.total_score, 17);
        assert_eq!(a.dimension_scores.creation, 1);
        assert_eq!(a.priority, Some(Priority::Eternel));
    }
}
