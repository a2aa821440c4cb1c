use api_types::grafik::ChartSeriesPoint;
use engine::dates;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::BarChart,
};

use crate::ui::{components::card::Card, theme::Theme};

/// Bar chart wrapped in a [`Card`].
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(&str, u64)],
    theme: &Theme,
) {
    let chart = BarChart::default()
        .data(data)
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    Card::new(title, theme).render_with(frame, area, chart);
}

/// One `(label, value)` bar per chart point: transaction count per bucket.
///
/// Labels are shortened to `dd/mm` when the bucket is a date.
#[must_use]
pub fn count_bars(series: &[ChartSeriesPoint]) -> Vec<(String, u64)> {
    series
        .iter()
        .map(|point| {
            let label = match point.tanggal.as_deref() {
                Some(tanggal) => dates::iso_date(tanggal)
                    .map(|date| date.format("%d/%m").to_string())
                    .unwrap_or_else(|| tanggal.to_string()),
                None => "-".to_string(),
            };
            (label, u64::try_from(point.total).unwrap_or(0))
        })
        .collect()
}
