//! Plain-text transfer receipt.

use std::fmt::Write;

use api_types::transfer::TransferRecord;

use crate::{dates, money::format_rupiah};

const RULE: &str = "================================";

pub fn render(transfer: &TransferRecord) -> String {
    let mut out = String::new();
    let keterangan = transfer
        .keterangan
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .unwrap_or("-");

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "        STRUK TRANSFER");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Tanggal: {}", dates::display_tanggal(&transfer.tanggal));
    let _ = writeln!(out);
    let _ = writeln!(out, "Nama Bank Tujuan: {}", transfer.bank_tujuan);
    let _ = writeln!(out);
    let _ = writeln!(out, "Nomor Rek Tujuan: {}", transfer.nomor_rekening);
    let _ = writeln!(out);
    let _ = writeln!(out, "Nama Pemilik Rekening Tujuan: {}", transfer.nama_pemilik);
    let _ = writeln!(out);
    let _ = writeln!(out, "Nominal: {}", format_rupiah(transfer.nominal));
    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {}", format_rupiah(transfer.total()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Keterangan: {keterangan}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "    Terima Kasih");
    let _ = writeln!(out, "{RULE}");
    out
}

pub fn file_name(transfer: &TransferRecord) -> String {
    format!("struk-transfer-{}.txt", transfer.id)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn receipt_shows_total_and_placeholder_note() {
        let transfer = TransferRecord {
            id: 5,
            tanggal: "2024-05-01".to_string(),
            bank_tujuan: "Mandiri".to_string(),
            nomor_rekening: "1234567890".to_string(),
            nama_pemilik: "Dewi".to_string(),
            nominal: Decimal::new(1_000_000, 0),
            biaya: Decimal::new(7_500, 0),
            keterangan: Some(" ".to_string()),
            status: None,
            cashier_id: None,
        };

        let text = render(&transfer);
        assert!(text.contains("Tanggal: 01/05/2024"));
        assert!(text.contains("Nominal: Rp 1.000.000"));
        assert!(text.contains("Total: Rp 1.007.500"));
        assert!(text.contains("Keterangan: -"));
        assert_eq!(file_name(&transfer), "struk-transfer-5.txt");
    }
}
