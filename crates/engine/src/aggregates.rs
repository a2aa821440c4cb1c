//! Totals computed from lists that are already loaded. No I/O.

use api_types::{
    grafik::ChartSeriesPoint,
    modal::{BalanceRecord, ChannelId},
};
use rust_decimal::Decimal;

use crate::{Actor, channel::visible_channels};

/// Records the actor may count: a kasir only sees its own.
fn in_scope<'a>(
    actor: &'a Actor,
    records: &'a [BalanceRecord],
) -> impl Iterator<Item = &'a BalanceRecord> + 'a {
    records
        .iter()
        .filter(move |record| !actor.is_kasir() || record.user_id == actor.id)
}

/// Nominal of the latest in-scope record of `channel`, or zero.
///
/// Records sharing the latest `created_at` are broken by the highest `id`.
pub fn current_value(channel: ChannelId, actor: &Actor, records: &[BalanceRecord]) -> Decimal {
    in_scope(actor, records)
        .filter(|record| record.modal_type == channel)
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|record| record.nominal)
        .unwrap_or(Decimal::ZERO)
}

/// Sum of the current values of every channel the actor can see.
pub fn total_current_across_channels(actor: &Actor, records: &[BalanceRecord]) -> Decimal {
    visible_channels(actor.role)
        .iter()
        .map(|channel| current_value(channel.id, actor, records))
        .sum()
}

/// Sum of every deposit in the history, scoped to the kasir's own rows.
pub fn total_deposit(actor: &Actor, history: &[BalanceRecord]) -> Decimal {
    in_scope(actor, history).map(|record| record.nominal).sum()
}

/// Summary of one chart period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub count: i64,
    pub total_nominal: Decimal,
    pub total_biaya: Decimal,
    pub total_all: Decimal,
}

pub fn period_chart_totals(series: &[ChartSeriesPoint]) -> PeriodTotals {
    series
        .iter()
        .fold(PeriodTotals::default(), |mut totals, point| {
            totals.count += point.total;
            totals.total_nominal += point.total_nominal;
            totals.total_biaya += point.total_biaya;
            totals.total_all += point.total_all;
            totals
        })
}
