use api_types::transfer::TransferStatus;
use engine::format_rupiah;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use rust_decimal::Decimal;

use crate::ui::theme::Theme;

/// Rupiah amount; negative in the error color, zero dimmed.
#[must_use]
pub fn rupiah(amount: Decimal, theme: &Theme) -> Span<'static> {
    let color = if amount.is_sign_negative() && !amount.is_zero() {
        theme.error
    } else if amount.is_zero() {
        theme.dim
    } else {
        theme.text
    };
    Span::styled(format_rupiah(amount), Style::default().fg(color))
}

/// Same as [`rupiah`] in bold, for totals.
#[must_use]
pub fn rupiah_bold(amount: Decimal, theme: &Theme) -> Span<'static> {
    let span = rupiah(amount, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    span.style(style)
}

#[must_use]
pub fn status(status: TransferStatus, theme: &Theme) -> Span<'static> {
    let color = match status {
        TransferStatus::Pending => theme.warning,
        TransferStatus::Lunas => theme.positive,
    };
    Span::styled(status.label(), Style::default().fg(color))
}
