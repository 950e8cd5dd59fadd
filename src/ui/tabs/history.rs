//! History tab: assessment list, evolution chart, and detail panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::MAX_TOTAL_SCORE;
use crate::ui::{chart, styles};
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.data.assessments.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false))
            .title(Span::styled(" Historique ", styles::title_style()));
        let paragraph = Paragraph::new("Aucune évaluation enregistrée.")
            .style(styles::muted_style())
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_list(frame, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    chart::render(frame, &app.data.assessments, app.history_selection, right[0]);
    render_detail(frame, app, right[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .data
        .assessments
        .iter()
        .map(|a| {
            let line = Line::from(vec![
                Span::styled(format_date(&a.date), styles::list_item_style()),
                Span::styled(
                    format!("  {}/{}", a.total_score, MAX_TOTAL_SCORE),
                    styles::score_style(a.total_score / 5),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .title(Span::styled(
            format!(" Historique ({}) ", app.data.assessments.len()),
            styles::title_style(),
        ));

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.history_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Détail ", styles::title_style()));

    let Some(assessment) = app.selected_assessment() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format_date(&assessment.date), styles::muted_style()),
        Span::styled(
            format!("  {}/{}", assessment.total_score, MAX_TOTAL_SCORE),
            styles::title_style(),
        ),
    ])];

    for (dimension, score) in assessment.dimension_scores.iter() {
        lines.push(Line::from(vec![
            Span::raw(format!("  {} : ", dimension.label())),
            Span::styled(format!("{}/8", score), styles::score_style(score)),
        ]));
    }

    if let Some(priority) = assessment.priority {
        lines.push(Line::from(vec![
            Span::styled("  Priorité : ", styles::muted_style()),
            Span::raw(priority.label()),
        ]));
    }

    if !assessment.context.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            truncate_string(&assessment.context, 200),
            styles::muted_style(),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
