//! Settings tab: priority choice, data management, cache status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Priority;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Priority
            Constraint::Length(7), // Data management
            Constraint::Min(5),    // Application
        ])
        .split(area);

    render_priority(frame, app, chunks[0]);
    render_data(frame, app, chunks[1]);
    render_application(frame, app, chunks[2]);
}

fn render_priority(frame: &mut Frame, app: &App, area: Rect) {
    let priority = app.data.priority.unwrap_or(Priority::None);
    let lines = vec![
        Line::from(vec![
            Span::styled("Priorité actuelle : ", styles::list_item_style()),
            Span::styled(priority.label(), styles::highlight_style()),
        ]),
        Line::from(Span::styled(priority.description(), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(
            "La priorité se choisit dans le formulaire d'évaluation.",
            styles::muted_style(),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Priorité ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_data(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("[e]", styles::help_key_style()),
            Span::raw(format!(
                " exporter les données ({} évaluations)",
                app.data.assessments.len()
            )),
        ]),
        Line::from(vec![
            Span::styled("[i]", styles::help_key_style()),
            Span::raw(" importer un fichier d'export"),
        ]),
        Line::from(vec![
            Span::styled("[x]", styles::help_key_style()),
            Span::styled(" effacer toutes les données", styles::error_style()),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Données ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_application(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Version : ", styles::muted_style()),
            Span::raw(env!("CARGO_PKG_VERSION")),
        ]),
        Line::from(vec![
            Span::styled("Contenu : ", styles::muted_style()),
            Span::raw(app.config.content_base_url().to_string()),
        ]),
    ];

    if !app.has_worker() {
        lines.push(Line::from(Span::styled(
            "Mode hors ligne : le cache de contenu est désactivé.",
            styles::muted_style(),
        )));
    } else if app.update_ready {
        lines.push(Line::from(vec![
            Span::styled("[u]", styles::help_key_style()),
            Span::styled(
                " appliquer la mise à jour du contenu",
                styles::success_style(),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "Contenu à jour.",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Application ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
