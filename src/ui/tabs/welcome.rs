//! Welcome tab: philosophy, latest result, offline guide status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::MAX_TOTAL_SCORE;
use crate::ui::styles;
use crate::utils::{relative_age, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),  // Intro
            Constraint::Length(7),  // Latest assessment
            Constraint::Min(4),     // Guide
        ])
        .split(area);

    render_intro(frame, chunks[0]);
    render_latest(frame, app, chunks[1]);
    render_guide(frame, app, chunks[2]);
}

fn render_intro(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Amor Fati", styles::title_style())),
        Line::from(""),
        Line::from("Aime ton destin. Cinq dimensions pour évaluer ta relation"),
        Line::from("au passé, au présent et à ta propre vie."),
        Line::from(""),
        Line::from(vec![
            Span::styled("« Ma formule pour la grandeur humaine est amor fati. »", styles::muted_style()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn render_latest(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Dernière évaluation ", styles::title_style()));

    let lines = match app.data.latest() {
        Some(assessment) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{}/{}", assessment.total_score, MAX_TOTAL_SCORE),
                        styles::score_style(assessment.total_score / 5),
                    ),
                    Span::styled(
                        format!("  ({})", relative_age(&assessment.date)),
                        styles::muted_style(),
                    ),
                ]),
            ];
            if !assessment.context.is_empty() {
                lines.push(Line::from(Span::styled(
                    truncate_string(&assessment.context, area.width.saturating_sub(4) as usize),
                    styles::muted_style(),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[2]", styles::help_key_style()),
                Span::raw(" pour une nouvelle évaluation"),
            ]));
            lines
        }
        None => vec![
            Line::from("Aucune évaluation pour l'instant."),
            Line::from(""),
            Line::from(vec![
                Span::styled("[2]", styles::help_key_style()),
                Span::raw(" pour commencer"),
            ]),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_guide(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Guide ", styles::title_style()));

    let paragraph = match &app.guide {
        Some(guide) => Paragraph::new(guide.as_str())
            .block(block)
            .wrap(Wrap { trim: true }),
        None if app.has_worker() => Paragraph::new(Span::styled(
            "Guide en cours de chargement...",
            styles::muted_style(),
        ))
        .block(block),
        None => Paragraph::new(Span::styled(
            "Mode hors ligne : guide indisponible.",
            styles::muted_style(),
        ))
        .block(block),
    };
    frame.render_widget(paragraph, area);
}
