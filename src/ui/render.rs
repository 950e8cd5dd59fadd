use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, Tab};

use super::styles;
use super::tabs::{assessment, history, settings, welcome};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingWipe => render_wipe_overlay(frame, false),
        AppState::ConfirmingWipeFinal => render_wipe_overlay(frame, true),
        AppState::EnteringImportPath => render_import_overlay(frame, app),
        AppState::SaveErrorNotice => render_save_error_overlay(frame, app),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Amor Fati";
    let right_hint = if app.update_ready {
        "[u] Mise à jour disponible"
    } else {
        "[?] Aide"
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.chars().count() + right_hint.chars().count() + 4),
        )),
        Span::styled(
            right_hint,
            if app.update_ready {
                styles::success_style()
            } else {
                styles::muted_style()
            },
        ),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Welcome, Tab::Assessment, Tab::History, Tab::Settings];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Welcome => welcome::render(frame, app, area),
        Tab::Assessment => assessment::render(frame, app, area),
        Tab::History => history::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[?] aide | [q] quitter";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(latest) = app.data.latest() {
        format!(" Dernière évaluation : {} ", crate::utils::relative_age(&latest.date))
    } else {
        " Aucune évaluation ".to_string()
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("              A M O R  F A T I", styles::title_style())),
        Line::from(Span::styled(
            format!("                version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-4       ", styles::help_key_style()),
            Span::styled("Changer d'onglet", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Tab/↑/↓   ", styles::help_key_style()),
            Span::styled("Naviguer dans le formulaire", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→ 0-8   ", styles::help_key_style()),
            Span::styled("Ajuster un score", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Espace    ", styles::help_key_style()),
            Span::styled("Changer la priorité", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  s         ", styles::help_key_style()),
            Span::styled("Valider l'évaluation", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  e / i     ", styles::help_key_style()),
            Span::styled("Exporter / importer (Réglages)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Appliquer la mise à jour du contenu", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quitter", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Appuyez sur ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" ou ", styles::muted_style()),
            Span::styled("Échap", styles::help_key_style()),
            Span::styled(" pour fermer", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("   Quitter Amor Fati ?", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   ", styles::muted_style()),
            Span::styled("[O]", styles::help_key_style()),
            Span::styled(" quitter, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" annuler", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_wipe_overlay(frame: &mut Frame, final_step: bool) {
    let area = centered_rect_fixed(52, 8, frame.area());
    frame.render_widget(Clear, area);

    let question = if final_step {
        "   Dernière confirmation : tout sera perdu."
    } else {
        "   Effacer toutes les évaluations ?"
    };

    let lines = vec![
        Line::from(Span::styled(question, styles::error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   ", styles::muted_style()),
            Span::styled("[O]", styles::help_key_style()),
            Span::styled(
                if final_step { " effacer définitivement, " } else { " continuer, " },
                styles::muted_style(),
            ),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" annuler", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_import_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("  Chemin du fichier à importer :", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::raw(app.import_path.as_str()),
            Span::styled("▎", styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Entrée", styles::help_key_style()),
            Span::styled(" importer, ", styles::muted_style()),
            Span::styled("Échap", styles::help_key_style()),
            Span::styled(" annuler", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(Span::styled(" Import ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_save_error_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let message = app.save_error.as_deref().unwrap_or("Échec de la sauvegarde");
    let lines = vec![
        Line::from(Span::styled("  Erreur d'enregistrement", styles::error_style())),
        Line::from(""),
        Line::from(format!("  {}", message)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Entrée", styles::help_key_style()),
            Span::styled(" pour continuer", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
