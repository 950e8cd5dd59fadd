//! Total-score evolution chart for the history tab.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::models::{Assessment, MAX_TOTAL_SCORE};

use super::styles;

/// Number of x-axis labels shown under the chart.
const X_LABEL_COUNT: usize = 3;

/// Assessment totals as chart points in submission order.
pub fn totals_series(assessments: &[Assessment]) -> Vec<(f64, f64)> {
    assessments
        .iter()
        .enumerate()
        .map(|(i, a)| (i as f64, a.total_score as f64))
        .collect()
}

pub fn render(frame: &mut Frame, assessments: &[Assessment], selected: usize, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false))
        .title(Span::styled(" Évolution ", styles::title_style()));

    if assessments.len() < 2 {
        let paragraph = ratatui::widgets::Paragraph::new(
            "Au moins deux évaluations sont nécessaires pour tracer la courbe.",
        )
        .style(styles::muted_style())
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let series = totals_series(assessments);
    let selected_point = [series[selected.min(series.len() - 1)]];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(styles::PRIMARY))
            .data(&series),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(styles::highlight_style())
            .data(&selected_point),
    ];

    let max_x = (series.len() - 1) as f64;
    let x_labels: Vec<Span> = (0..X_LABEL_COUNT)
        .map(|i| {
            let index =
                (i * (assessments.len() - 1)) / (X_LABEL_COUNT - 1);
            Span::styled(
                crate::utils::format_day(&assessments[index].date),
                styles::muted_style(),
            )
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_x])
                .labels(x_labels)
                .style(styles::muted_style()),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, MAX_TOTAL_SCORE as f64])
                .labels(vec![
                    Span::styled("0", styles::muted_style()),
                    Span::styled("20", styles::muted_style()),
                    Span::styled("40", styles::muted_style()),
                ])
                .style(styles::muted_style()),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DimensionScores, Dimension};

    fn assessment(total_per_dim: u8) -> Assessment {
        let mut scores = DimensionScores::default();
        scores.set(Dimension::Creation, total_per_dim);
        Assessment::new(scores, String::new(), None)
    }

    #[test]
    fn test_totals_series_order_and_values() {
        let assessments = vec![assessment(2), assessment(7), assessment(4)];
        let series = totals_series(&assessments);
        assert_eq!(series, vec![(0.0, 2.0), (1.0, 7.0), (2.0, 4.0)]);
    }

    #[test]
    fn test_totals_series_empty() {
        assert!(totals_series(&[]).is_empty());
    }
}
