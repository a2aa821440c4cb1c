use engine::{EditState, channel, dates, format_rupiah};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::modal::{ModalFocus, ModalScreen},
    ui::{
        components::{
            card::{Card, StatCard},
            money::{rupiah, rupiah_bold},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, screen: &ModalScreen, theme: &Theme) {
    let mut constraints = vec![Constraint::Length(4), Constraint::Min(9)];
    if screen.show_history {
        constraints.push(Constraint::Min(8));
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_totals(frame, layout[0], screen, theme);
    render_cards(frame, layout[1], screen, theme);
    if screen.show_history {
        render_history(frame, layout[2], screen, theme);
    }
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, screen: &ModalScreen, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    StatCard::new(
        "Total Modal Saat Ini",
        format_rupiah(screen.total_current()),
        theme,
    )
    .subtitle(format!("{} aplikasi", screen.channels.len()))
    .render(frame, columns[0]);

    StatCard::new("Total Deposit", format_rupiah(screen.total_deposit()), theme)
        .subtitle(format!("{} catatan riwayat", screen.history_rows().len()))
        .render(frame, columns[1]);
}

fn render_cards(frame: &mut Frame<'_>, area: Rect, screen: &ModalScreen, theme: &Theme) {
    let card = Card::new("Modal per Aplikasi", theme).focused(screen.focus == ModalFocus::Cards);

    if let Some(err) = screen.balances.error() {
        let line = Line::from(Span::styled(err, Style::default().fg(theme.error)));
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }

    let rows = screen.channels.iter().map(|channel| {
        let value = match screen.balance_edit.state() {
            EditState::Editing {
                target,
                draft,
                error,
            } if *target == channel.id => {
                let mut spans = vec![Span::styled(
                    format!("{draft}_"),
                    Style::default().fg(theme.accent),
                )];
                if let Some(error) = error {
                    spans.push(Span::styled(
                        format!("  {error}"),
                        Style::default().fg(theme.error),
                    ));
                }
                Line::from(spans)
            }
            EditState::Saving { target, draft } if *target == channel.id => Line::from(Span::styled(
                format!("{draft}  menyimpan..."),
                Style::default().fg(theme.warning),
            )),
            _ => Line::from(rupiah(screen.current_value(channel.id), theme)),
        };
        Row::new(vec![Cell::from(channel.title()), Cell::from(value)])
    });

    let table = Table::new(rows, [Constraint::Length(34), Constraint::Min(20)])
        .header(
            Row::new(["Aplikasi", "Modal Saat Ini"])
                .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    let mut table_state = TableState::default();
    if screen.focus == ModalFocus::Cards && !screen.channels.is_empty() {
        table_state.select(Some(screen.selected_channel));
    }

    let inner = card.inner(area);
    frame.render_widget(card.block(), area);
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn render_history(frame: &mut Frame<'_>, area: Rect, screen: &ModalScreen, theme: &Theme) {
    let card = Card::new("Riwayat Modal", theme).focused(screen.focus == ModalFocus::History);

    if let Some(err) = screen.history.error() {
        let line = Line::from(Span::styled(err, Style::default().fg(theme.error)));
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }

    let history = screen.history_rows();
    let mut rows: Vec<Row> = history
        .iter()
        .map(|record| {
            let nominal = if screen.history_edit.is_active(&record.id) {
                let draft = screen.history_edit.draft().unwrap_or_default();
                let mut spans = vec![Span::styled(
                    format!("{draft}_"),
                    Style::default().fg(theme.accent),
                )];
                if screen.history_edit.is_saving() {
                    spans.push(Span::styled(
                        "  menyimpan...",
                        Style::default().fg(theme.warning),
                    ));
                } else if let Some(error) = screen.history_edit.error() {
                    spans.push(Span::styled(
                        format!("  {error}"),
                        Style::default().fg(theme.error),
                    ));
                }
                Line::from(spans)
            } else {
                Line::from(rupiah(record.nominal, theme))
            };

            Row::new(vec![
                Cell::from(dates::format_id(record.created_at.date_naive())),
                Cell::from(channel::label(record.modal_type)),
                Cell::from(record.username.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(nominal),
            ])
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from(""),
            Cell::from(Span::styled(
                "Total",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Cell::from(rupiah_bold(screen.total_deposit(), theme)),
        ])
        .top_margin(1),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(24),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(["Tanggal", "Aplikasi", "Kasir", "Nominal"])
            .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .highlight_symbol("» ");

    let mut table_state = TableState::default();
    if screen.focus == ModalFocus::History && !history.is_empty() {
        table_state.select(Some(screen.selected_row));
    }

    let inner = card.inner(area);
    frame.render_widget(card.block(), area);
    frame.render_stateful_widget(table, inner, &mut table_state);
}
