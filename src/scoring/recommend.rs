//! Canned recommendation lists.
//!
//! A recommendation set is composed from the priority-specific list plus
//! conditional extras, capped at [`MAX_RECOMMENDATIONS`] entries.

use crate::models::{DimensionScores, Priority};

/// Cap on the composed recommendation list.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// A dimension scoring below this threshold triggers the focus extras.
const WEAK_SCORE_THRESHOLD: u8 = 4;

/// Priority-specific recommendation texts.
fn priority_list(priority: Priority) -> &'static [&'static str] {
    match priority {
        Priority::Ressentiment => &[
            "Écris une lettre (que tu n'enverras pas) à quelqu'un qui t'a fait du mal. Puis brûle-la symboliquement.",
            "Pratique l'exercice : 'Et si cette personne avait fait exactement ce qu'elle devait faire pour que je devienne qui je suis ?'",
            "Journal : chaque soir, note un événement passé douloureux et écris : 'Je dis oui à cette partie de mon histoire.'",
        ],
        Priority::Souffrance => &[
            "Face à une difficulté cette semaine, demande-toi : 'Comment puis-je créer quelque chose à partir de cela ?'",
            "Pratique la distinction stoïcienne : liste ce qui dépend de toi vs ce qui n'en dépend pas.",
            "Méditation sur l'impermanence : tout passe, même cette souffrance. Peux-tu l'accepter le temps qu'elle dure ?",
        ],
        Priority::Authenticite => &[
            "Identifie une décision que tu prends par peur du jugement. Peux-tu faire autrement cette semaine ?",
            "Liste 5 valeurs qui te définissent vraiment. Tes choix de vie les reflètent-ils ?",
            "Exercice : pendant une journée, observe combien de fois tu te censures ou joues un rôle.",
        ],
        Priority::Creation => &[
            "Remplace une heure de consommation par une heure de création (peu importe quoi).",
            "Face à un problème, demande-toi : 'Que puis-je créer à partir de cette contrainte ?'",
            "Lance un micro-projet créatif cette semaine, sans attendre qu'il soit parfait.",
        ],
        Priority::Eternel => &[
            "Pratique l'exercice de l'éternel retour : visualise ta vie qui se répète. Qu'est-ce qui te fait dire non ? Pourquoi ?",
            "Liste 3 aspects de ta vie que tu voudrais revivre éternellement. Puis 3 que tu refuserais. Explore le pourquoi.",
            "Chaque soir : 'Voudrais-je revivre cette journée éternellement ?' Si non, qu'est-ce qui devrait changer ?",
        ],
        Priority::None => &[
            "Observe simplement ton évolution sans te juger. Le chemin est aussi important que la destination.",
            "Concentre-toi sur ta dimension la plus faible (voir ci-dessus).",
        ],
    }
}

/// Compose the recommendation list for an assessment.
///
/// The priority-specific texts come first, then a focus line for the
/// lowest-scoring dimension when it is weak, then a creation nudge when
/// the Création score is weak. The result is capped at 5 entries.
pub fn recommendations(scores: &DimensionScores, priority: Option<Priority>) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if let Some(priority) = priority {
        recs.extend(priority_list(priority).iter().map(|s| s.to_string()));
    }

    let (lowest, lowest_score) = scores.lowest();
    if lowest_score < WEAK_SCORE_THRESHOLD {
        recs.push(format!(
            "Focus sur \"{}\" : c'est ta dimension la plus faible ({}/8). C'est là que le travail aura le plus d'impact.",
            lowest.key(),
            lowest_score
        ));
    }

    if scores.creation < WEAK_SCORE_THRESHOLD {
        recs.push(
            "Tu sembles plus dans la réaction que dans la création. Commence par 15 minutes de création par jour."
                .to_string(),
        );
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimension, ALL_PRIORITIES};

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
    fn test_list_never_exceeds_cap() {
        // Worst case: 3 priority texts + focus line + creation nudge
        for priority in ALL_PRIORITIES {
            for c in 0..=8u8 {
                let recs = recommendations(&scores(0, 0, 0, c, 0), Some(priority));
                assert!(recs.len() <= MAX_RECOMMENDATIONS, "priority {:?} c {}", priority, c);
            }
        }
    }

    #[test]
    fn test_no_priority_high_scores_yields_empty() {
        let recs = recommendations(&scores(8, 8, 8, 8, 8), None);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_focus_line_names_lowest_dimension() {
        let s = scores(2, 5, 3, 1, 6);
        assert_eq!(s.lowest(), (Dimension::Creation, 1));

        let recs = recommendations(&s, None);
        assert!(recs[0].contains("\"creation\""));
        assert!(recs[0].contains("(1/8)"));
        // Création is weak too, so the nudge follows
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_priority_texts_come_first() {
        let recs = recommendations(&scores(8, 8, 8, 8, 8), Some(Priority::Eternel));
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("éternel retour"));
    }

    #[test]
    fn test_cap_drops_extras_not_priority_texts() {
        // 3 priority texts + both extras would be 5; with the creation
        // priority all 5 fit exactly
        let recs = recommendations(&scores(0, 1, 2, 3, 4), Some(Priority::Creation));
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs[3].contains("\"ressentiment\""));
    }
}
