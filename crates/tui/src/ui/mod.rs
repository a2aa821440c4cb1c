pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{
    AppState, Section,
    modal::ModalFocus,
    transfer::TransferMode,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Modal => screens::modal::render(frame, layout[2], &state.modal, &theme),
        Section::Transfer => {
            screens::transfer::render(frame, layout[2], &state.transfer, &theme)
        }
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let loading = match state.section {
        Section::Modal => state.modal.balances.loading() || state.modal.history.loading(),
        Section::Transfer => state.transfer.transfers.loading(),
    };

    let mut spans = vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.actor.username)),
        Span::styled("Role", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.actor.role.as_str())),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
    ];
    if loading {
        spans.push(Span::styled("memuat...", Style::default().fg(theme.warning)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = Vec::new();
    let capturing = match state.section {
        Section::Modal => state.modal.captures_input(),
        Section::Transfer => state.transfer.captures_input(),
    };
    if !capturing {
        parts.extend(components::tabs::tab_shortcuts(theme));
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    }

    let hints: &[(&str, &str)] = match state.section {
        Section::Modal if capturing => &[("Enter", "simpan"), ("Esc", "batal")],
        Section::Modal => match state.modal.focus {
            ModalFocus::Cards => &[("Enter", "ubah"), ("h", "riwayat"), ("r", "muat ulang")],
            ModalFocus::History => &[
                ("Enter", "ubah"),
                ("Tab", "fokus"),
                ("h", "tutup riwayat"),
            ],
        },
        Section::Transfer => match state.transfer.mode {
            TransferMode::List if state.transfer.actor().is_owner() => &[
                ("a", "baru"),
                ("e", "ubah"),
                ("f", "favorit"),
                ("l", "lunas"),
                ("/", "cari"),
                ("d", "tanggal"),
                ("c", "kasir"),
                ("g", "periode"),
                ("←/→", "halaman"),
                ("s", "struk"),
                ("x", "laporan"),
            ],
            TransferMode::List => &[
                ("a", "baru"),
                ("e", "ubah"),
                ("f", "favorit"),
                ("l", "lunas"),
                ("/", "cari"),
                ("g", "periode"),
                ("←/→", "halaman"),
                ("s", "struk"),
                ("x", "laporan"),
            ],
            TransferMode::Search | TransferMode::DateInput => {
                &[("Enter", "terapkan"), ("Esc", "tutup")]
            }
            TransferMode::Favorites => &[("Enter", "pakai"), ("Esc", "kembali")],
            TransferMode::Form => &[("Tab", "berikutnya"), ("Enter", "simpan"), ("Esc", "batal")],
            TransferMode::ConfirmLunas(_) => &[("y", "ya"), ("n", "tidak")],
        },
    };

    for (key, label) in hints {
        parts.push(Span::styled(*key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {label}  ")));
    }

    if !capturing {
        parts.push(Span::styled("│  ", Style::default().fg(theme.border)));
        parts.push(Span::styled("q", Style::default().fg(theme.accent)));
        parts.push(Span::raw(" keluar"));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Centered rectangle for popups, sized in percent of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
