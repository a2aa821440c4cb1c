//! CSV transfer report: summary of the selected period, its rows, and the
//! transfers currently loaded.

use api_types::{grafik::{ChartSeriesPoint, Period}, transfer::TransferRecord};
use chrono::{NaiveDate, NaiveDateTime};
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{ResultEngine, aggregates::period_chart_totals, dates};

#[derive(Serialize)]
struct PeriodRow<'a> {
    tanggal: &'a str,
    total: i64,
    total_nominal: Decimal,
    total_biaya: Decimal,
    total_all: Decimal,
}

#[derive(Serialize)]
struct DetailRow<'a> {
    tanggal: String,
    bank_tujuan: &'a str,
    nomor_rekening: &'a str,
    nama_pemilik: &'a str,
    nominal: Decimal,
    biaya: Decimal,
    total: Decimal,
    status: &'static str,
}

pub fn transfer_report(
    period: Period,
    printed_at: NaiveDateTime,
    series: &[ChartSeriesPoint],
    transfers: &[TransferRecord],
) -> ResultEngine<Vec<u8>> {
    let totals = period_chart_totals(series);
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(vec![]);

    writer.write_record(["LAPORAN TRANSFER"])?;
    writer.write_record([format!("Periode: {}", period.label())])?;
    writer.write_record([format!(
        "Dicetak pada: {}",
        printed_at.format("%d/%m/%Y %H:%M:%S")
    )])?;
    writer.write_record([""])?;
    writer.write_record(["RINGKASAN"])?;
    writer.write_record(["Total Jumlah Transaksi".to_string(), totals.count.to_string()])?;
    writer.write_record([
        "Total Nominal Transfer".to_string(),
        totals.total_nominal.to_string(),
    ])?;
    writer.write_record(["Total Biaya Admin".to_string(), totals.total_biaya.to_string()])?;
    writer.write_record(["Total Keseluruhan".to_string(), totals.total_all.to_string()])?;
    writer.write_record([""])?;

    writer.write_record(["DATA PERIODE"])?;
    writer.write_record([
        "Tanggal",
        "Jumlah Transaksi",
        "Total Nominal",
        "Total Biaya",
        "Total",
    ])?;
    for point in series {
        writer.serialize(PeriodRow {
            tanggal: point.tanggal.as_deref().unwrap_or("-"),
            total: point.total,
            total_nominal: point.total_nominal,
            total_biaya: point.total_biaya,
            total_all: point.total_all,
        })?;
    }
    writer.write_record([""])?;

    writer.write_record(["DETAIL TRANSAKSI"])?;
    writer.write_record([
        "Tanggal",
        "Bank",
        "Nomor Rekening",
        "Nama Pemilik",
        "Nominal",
        "Biaya",
        "Total",
        "Status",
    ])?;
    for transfer in transfers {
        writer.serialize(DetailRow {
            tanggal: dates::display_tanggal(&transfer.tanggal),
            bank_tujuan: &transfer.bank_tujuan,
            nomor_rekening: &transfer.nomor_rekening,
            nama_pemilik: &transfer.nama_pemilik,
            nominal: transfer.nominal,
            biaya: transfer.biaya,
            total: transfer.total(),
            status: transfer.status().label(),
        })?;
    }

    writer
        .into_inner()
        .map_err(|err| crate::EngineError::Report(err.to_string()))
}

pub fn file_name(period: Period, date: NaiveDate) -> String {
    format!(
        "laporan-transfer-{}-{}.csv",
        period.label(),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_contains_summary_period_rows_and_details() {
        let series = vec![
            ChartSeriesPoint {
                tanggal: Some("2024-05-01".to_string()),
                total: 2,
                total_nominal: Decimal::new(300_000, 0),
                total_biaya: Decimal::new(10_000, 0),
                total_all: Decimal::new(310_000, 0),
            },
            ChartSeriesPoint {
                tanggal: None,
                total: 1,
                ..ChartSeriesPoint::default()
            },
        ];
        let transfers = vec![TransferRecord {
            id: 1,
            tanggal: "2024-05-01".to_string(),
            bank_tujuan: "BNI".to_string(),
            nomor_rekening: "555".to_string(),
            nama_pemilik: "Rina".to_string(),
            nominal: Decimal::new(300_000, 0),
            biaya: Decimal::new(10_000, 0),
            keterangan: None,
            status: None,
            cashier_id: None,
        }];
        let printed_at = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let bytes = transfer_report(Period::Harian, printed_at, &series, &transfers).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "LAPORAN TRANSFER");
        assert_eq!(lines[1], "Periode: Harian");
        assert!(lines.contains(&"Total Jumlah Transaksi,3"));
        assert!(lines.contains(&"Total Keseluruhan,310000"));
        assert!(lines.contains(&"2024-05-01,2,300000,10000,310000"));
        assert!(lines.contains(&"-,1,0,0,0"));
        assert!(lines.contains(&"01/05/2024,BNI,555,Rina,300000,10000,310000,Pending"));
        assert_eq!(
            file_name(Period::Harian, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()),
            "laporan-transfer-Harian-2024-05-02.csv"
        );
    }
}
