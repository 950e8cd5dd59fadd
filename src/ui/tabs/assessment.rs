//! Assessment tab: the five-dimension scoring form and the result of the
//! last submission.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, SubmissionSummary, CONTEXT_FIELD, PRIORITY_FIELD};
use crate::models::{ALL_DIMENSIONS, MAX_DIMENSION_SCORE, MAX_TOTAL_SCORE};
use crate::scoring::{delta_label, Evolution, INSUFFICIENT_DATA_MESSAGE};
use crate::ui::styles;
use crate::utils::format_date;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match &app.last_submission {
        Some(summary) => render_summary(frame, summary, area),
        None => render_form(frame, app, area),
    }
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(16),   // Dimension fields
            Constraint::Length(4), // Context
            Constraint::Length(4), // Priority + submit hint
        ])
        .split(area);

    render_dimensions(frame, app, chunks[0]);
    render_context(frame, app, chunks[1]);
    render_priority(frame, app, chunks[2]);
}

fn render_dimensions(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for (i, dimension) in ALL_DIMENSIONS.iter().enumerate() {
        let score = app.form.scores.get(*dimension);
        let focused = app.form.field == i;
        let marker = if focused { "> " } else { "  " };

        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{}", marker, dimension.label()),
                if focused {
                    styles::highlight_style()
                } else {
                    styles::list_item_style()
                },
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(dimension.prompt(), styles::muted_style()),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(score_gauge(score), styles::score_style(score)),
            Span::styled(
                format!(" {}/{}", score, MAX_DIMENSION_SCORE),
                styles::score_style(score),
            ),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.form.field < ALL_DIMENSIONS.len()))
        .title(Span::styled(" Évaluation ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Textual gauge: filled blocks up to the score.
fn score_gauge(score: u8) -> String {
    let filled = "█".repeat(score as usize);
    let empty = "░".repeat((MAX_DIMENSION_SCORE - score) as usize);
    format!("{}{}", filled, empty)
}

fn render_context(frame: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.state, AppState::EditingContext);
    let focused = app.form.field == CONTEXT_FIELD;
    let cursor = if editing { "▎" } else { "" };

    let text = if app.form.context.is_empty() && !editing {
        Line::from(Span::styled(
            "Contexte du jour (optionnel) - Entrée pour éditer",
            styles::muted_style(),
        ))
    } else {
        Line::from(vec![
            Span::raw(app.form.context.as_str()),
            Span::styled(cursor, styles::highlight_style()),
        ])
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
        .title(Span::styled(" Contexte ", styles::title_style()));
    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

fn render_priority(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.form.field == PRIORITY_FIELD;
    let lines = vec![
        Line::from(vec![
            Span::styled("Priorité : ", styles::list_item_style()),
            Span::styled(app.form.priority.label(), styles::highlight_style()),
            Span::styled(
                if focused { "  (Espace pour changer)" } else { "" },
                styles::muted_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("[s]", styles::help_key_style()),
            Span::raw(" valider l'évaluation"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary(frame: &mut Frame, summary: &SubmissionSummary, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Score total : ", styles::list_item_style()),
            Span::styled(
                format!("{}/{}", summary.total, MAX_TOTAL_SCORE),
                styles::title_style(),
            ),
        ]),
        Line::from(""),
    ];

    match &summary.evolution {
        Evolution::Insufficient => {
            lines.push(Line::from(Span::styled(
                INSUFFICIENT_DATA_MESSAGE,
                styles::muted_style(),
            )));
        }
        Evolution::Compared(c) => {
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "Depuis le {} : ",
                    format_date(&c.previous_date)
                )),
                Span::styled(delta_label(c.delta), styles::delta_style(c.delta)),
                Span::styled(
                    format!(" ({} → {})", c.previous_total, c.current_total),
                    styles::muted_style(),
                ),
            ]));
            for (dimension, _score, delta) in &c.dimension_deltas {
                if *delta != 0 {
                    lines.push(Line::from(vec![
                        Span::raw(format!("  {} : ", dimension.label())),
                        Span::styled(delta_label(*delta), styles::delta_style(*delta)),
                    ]));
                }
            }
        }
    }

    if !summary.recommendations.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Recommandations",
            styles::highlight_style(),
        )));
        for rec in &summary.recommendations {
            lines.push(Line::from(format!("  • {}", rec)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[n]", styles::help_key_style()),
        Span::raw(" nouvelle évaluation  "),
        Span::styled("[3]", styles::help_key_style()),
        Span::raw(" historique"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(Span::styled(" Résultat ", styles::title_style()));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
