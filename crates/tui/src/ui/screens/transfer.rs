use engine::{FormField, dates};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use crate::{
    app::transfer::{TransferMode, TransferScreen},
    ui::{
        centered_rect,
        components::{
            card::Card,
            charts::{count_bars, render_bar_chart},
            money::{rupiah, rupiah_bold, status},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Filters
            Constraint::Length(10), // Chart and period totals
            Constraint::Min(6),     // Transfers
            Constraint::Length(1),  // Pagination
        ])
        .split(area);

    render_filters(frame, layout[0], screen, theme);
    render_chart(frame, layout[1], screen, theme);
    render_table(frame, layout[2], screen, theme);
    render_pagination(frame, layout[3], screen, theme);

    match screen.mode {
        TransferMode::Form => render_form(frame, area, screen, theme),
        TransferMode::Favorites => render_favorites(frame, area, screen, theme),
        TransferMode::ConfirmLunas(id) => render_confirm(frame, area, id, theme),
        _ => {}
    }
}

fn label(text: &'static str, theme: &Theme) -> Span<'static> {
    Span::styled(text, Style::default().fg(theme.dim))
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let editing = Style::default().fg(theme.accent);
    let mut spans = vec![
        label("Periode", theme),
        Span::raw(format!(": {}   ", screen.period.label())),
    ];

    if screen.actor().is_owner() {
        spans.push(label("Kasir", theme));
        spans.push(Span::raw(format!(": {}   ", screen.cashier_label())));
        spans.push(label("Tanggal", theme));
        if screen.mode == TransferMode::DateInput {
            spans.push(Span::styled(format!(": {}_   ", screen.date_input), editing));
        } else {
            let date = screen
                .filters
                .date
                .map(dates::format_id)
                .unwrap_or_else(|| "semua".to_string());
            spans.push(Span::raw(format!(": {date}   ")));
        }
    }

    spans.push(label("Cari", theme));
    if screen.mode == TransferMode::Search {
        spans.push(Span::styled(format!(": {}_", screen.filters.search), editing));
    } else if screen.filters.search.is_empty() {
        spans.push(Span::raw(": -"));
    } else {
        spans.push(Span::raw(format!(": {}", screen.filters.search)));
    }

    let focused = matches!(screen.mode, TransferMode::Search | TransferMode::DateInput);
    Card::new("Filter", theme)
        .focused(focused)
        .render_with(frame, area, Paragraph::new(Line::from(spans)));
}

fn render_chart(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(38)])
        .split(area);

    let title = format!("Grafik {}", screen.period.label());
    if let Some(err) = screen.chart.error() {
        let line = Line::from(Span::styled(err, Style::default().fg(theme.error)));
        Card::new(&title, theme).render_with(frame, columns[0], Paragraph::new(line));
    } else {
        let bars = count_bars(screen.chart.items());
        let data: Vec<(&str, u64)> = bars
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
            .collect();
        render_bar_chart(frame, columns[0], &title, &data, theme);
    }

    let totals = screen.period_totals();
    let lines = vec![
        Line::from(vec![
            label("Jumlah Transaksi  ", theme),
            Span::raw(totals.count.to_string()),
        ]),
        Line::from(vec![
            label("Total Nominal     ", theme),
            rupiah(totals.total_nominal, theme),
        ]),
        Line::from(vec![
            label("Total Biaya Admin ", theme),
            rupiah(totals.total_biaya, theme),
        ]),
        Line::from(vec![
            label("Total Keseluruhan ", theme),
            rupiah_bold(totals.total_all, theme),
        ]),
    ];
    Card::new("Ringkasan Periode", theme).render_with(frame, columns[1], Paragraph::new(lines));
}

fn render_table(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let card = Card::new("Transfer", theme).focused(screen.mode == TransferMode::List);

    if let Some(err) = screen.transfers.error() {
        let line = Line::from(Span::styled(err, Style::default().fg(theme.error)));
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }
    if screen.transfers.is_empty() {
        let text = if screen.transfers.loading() {
            "Memuat data..."
        } else {
            "Tidak ada transfer."
        };
        let line = Line::from(Span::styled(text, Style::default().fg(theme.dim)));
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }

    let rows = screen.transfers.items().iter().map(|transfer| {
        let marking = screen.marking == Some(transfer.id);
        let status_cell = if marking {
            Span::styled("menyimpan...", Style::default().fg(theme.warning))
        } else {
            status(transfer.status(), theme)
        };
        Row::new(vec![
            Cell::from(dates::display_tanggal(&transfer.tanggal)),
            Cell::from(transfer.bank_tujuan.clone()),
            Cell::from(transfer.nomor_rekening.clone()),
            Cell::from(transfer.nama_pemilik.clone()),
            Cell::from(rupiah(transfer.nominal, theme)),
            Cell::from(rupiah(transfer.biaya, theme)),
            Cell::from(rupiah_bold(transfer.total(), theme)),
            Cell::from(status_cell),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Min(14),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new([
            "Tanggal", "Bank", "No. Rekening", "Nama", "Nominal", "Biaya", "Total", "Status",
        ])
        .style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .highlight_symbol("» ");

    let mut table_state = TableState::default();
    table_state.select(Some(screen.selected));

    let inner = card.inner(area);
    frame.render_widget(card.block(), area);
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn render_pagination(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let pagination = &screen.pagination;
    let range = match pagination.displayed_range() {
        Some((start, end)) => format!("{start}-{end} dari {}", pagination.total()),
        None => "0 data".to_string(),
    };
    let prev = if pagination.has_prev() { "←" } else { " " };
    let next = if pagination.has_next() { "→" } else { " " };

    let line = Line::from(vec![
        Span::styled(prev, Style::default().fg(theme.accent)),
        Span::raw(format!(
            " Halaman {} / {} ",
            pagination.page(),
            pagination.last_page()
        )),
        Span::styled(next, Style::default().fg(theme.accent)),
        Span::styled(format!("   {range}"), Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let Some(form) = &screen.form else {
        return;
    };
    let rect = centered_rect(60, 70, area);
    let title = if form.draft.editing.is_some() {
        "Ubah Transfer"
    } else {
        "Transfer Baru"
    };

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let active = *field == form.field;
            let value = form.draft.field(*field);
            let value_style = if active {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(
                    format!("{}{:<22}", if active { "» " } else { "  " }, field.label()),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    if active {
                        format!("{value}_")
                    } else {
                        value.to_string()
                    },
                    value_style,
                ),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        label("  Total                 ", theme),
        rupiah_bold(form.draft.total(), theme),
    ]));
    lines.push(Line::from(vec![
        label("  Kembalian             ", theme),
        rupiah(form.draft.change(), theme),
    ]));

    if form.submitting {
        lines.push(Line::from(Span::styled(
            "  Menyimpan...",
            Style::default().fg(theme.warning),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.error),
        )));
    }

    frame.render_widget(Clear, rect);
    Card::new(title, theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}

fn render_favorites(frame: &mut Frame<'_>, area: Rect, screen: &TransferScreen, theme: &Theme) {
    let rect = centered_rect(60, 60, area);
    let card = Card::new("Transfer Favorit", theme).focused(true);
    let inner = card.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(card.block(), rect);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            label("Cari: ", theme),
            Span::styled(
                format!("{}_", screen.favorite_search),
                Style::default().fg(theme.accent),
            ),
        ])),
        layout[0],
    );

    if let Some(err) = screen.favorites.error() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(err, Style::default().fg(theme.error)))),
            layout[1],
        );
        return;
    }

    let items: Vec<ListItem> = screen
        .favorites
        .items()
        .iter()
        .map(|favorite| {
            ListItem::new(Line::from(format!(
                "{:<10} {:<18} {}",
                favorite.bank_tujuan, favorite.nomor_rekening, favorite.nama_pemilik
            )))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(screen.selected_favorite));
    }
    let list = List::new(items)
        .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, layout[1], &mut list_state);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, id: i64, theme: &Theme) {
    let rect = centered_rect(40, 20, area);
    let lines = vec![
        Line::from(format!("Tandai transfer #{id} sebagai lunas?")),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" ya   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" tidak"),
        ]),
    ];
    frame.render_widget(Clear, rect);
    Card::new("Konfirmasi", theme)
        .focused(true)
        .render_with(frame, rect, Paragraph::new(lines));
}
