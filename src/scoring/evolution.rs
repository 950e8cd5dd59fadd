//! Delta comparison between the two most recent assessments.

use chrono::{DateTime, Utc};

use crate::models::{Assessment, Dimension, ALL_DIMENSIONS};

/// Message shown when fewer than two records exist.
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Continue à t'évaluer régulièrement pour voir ton évolution dans le temps.";

/// Result of comparing the two most recent records. Purely presentational.
#[derive(Debug, Clone, PartialEq)]
pub enum Evolution {
    /// Fewer than two records stored.
    Insufficient,
    Compared(Comparison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub previous_date: DateTime<Utc>,
    pub previous_total: u8,
    pub current_total: u8,
    /// current total minus previous total
    pub delta: i16,
    /// (dimension, current score, delta vs previous) in canonical order
    pub dimension_deltas: Vec<(Dimension, u8, i16)>,
}

/// Compare the two most recent records of the ordered history.
pub fn compare_latest(assessments: &[Assessment]) -> Evolution {
    let (previous, current) = match assessments {
        [.., previous, current] => (previous, current),
        _ => return Evolution::Insufficient,
    };

    let dimension_deltas = ALL_DIMENSIONS
        .iter()
        .map(|&d| {
            let cur = current.dimension_scores.get(d);
            let prev = previous.dimension_scores.get(d);
            (d, cur, cur as i16 - prev as i16)
        })
        .collect();

    Evolution::Compared(Comparison {
        previous_date: previous.date,
        previous_total: previous.total_score,
        current_total: current.total_score,
        delta: current.total_score as i16 - previous.total_score as i16,
        dimension_deltas,
    })
}

/// Sign-correct delta label: "+N", "-N" or "0".
pub fn delta_label(delta: i16) -> String {
    if delta > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionScores;

    fn assessment(r: u8, s: u8, a: u8, c: u8, e: u8) -> Assessment {
        Assessment::new(
            DimensionScores {
                ressentiment: r,
                souffrance: s,
                authenticite: a,
                creation: c,
                eternel: e,
            },
            String::new(),
            None,
        )
    }

    #[test]
    fn test_insufficient_with_zero_or_one_record() {
        assert_eq!(compare_latest(&[]), Evolution::Insufficient);
        assert_eq!(compare_latest(&[assessment(1, 1, 1, 1, 1)]), Evolution::Insufficient);
    }

    #[test]
    fn test_delta_is_current_minus_previous() {
        let history = vec![assessment(2, 2, 2, 2, 2), assessment(4, 3, 2, 1, 2)];
        match compare_latest(&history) {
            Evolution::Compared(cmp) => {
                assert_eq!(cmp.previous_total, 10);
                assert_eq!(cmp.current_total, 12);
                assert_eq!(cmp.delta, 2);
                assert_eq!(
                    cmp.dimension_deltas,
                    vec![
                        (Dimension::Ressentiment, 4, 2),
                        (Dimension::Souffrance, 3, 1),
                        (Dimension::Authenticite, 2, 0),
                        (Dimension::Creation, 1, -1),
                        (Dimension::Eternel, 2, 0),
                    ]
                );
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_only_last_two_records_are_compared() {
        let history = vec![
            assessment(8, 8, 8, 8, 8),
            assessment(3, 3, 3, 3, 3),
            assessment(2, 2, 2, 2, 2),
        ];
        match compare_latest(&history) {
            Evolution::Compared(cmp) => {
                assert_eq!(cmp.previous_total, 15);
                assert_eq!(cmp.current_total, 10);
                assert_eq!(cmp.delta, -5);
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_delta_label_signs() {
        assert_eq!(delta_label(3), "+3");
        assert_eq!(delta_label(-4), "-4");
        assert_eq!(delta_label(0), "0");
    }
}
