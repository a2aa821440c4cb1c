//! Create/edit form of the Transfer screen.

use api_types::transfer::{FavoriteRecipient, TransferPayload, TransferRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine, dates, money::parse_nominal};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Tanggal,
    BankTujuan,
    NomorRekening,
    NamaPemilik,
    Nominal,
    Biaya,
    TotalUang,
    Keterangan,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        Self::Tanggal,
        Self::BankTujuan,
        Self::NomorRekening,
        Self::NamaPemilik,
        Self::Nominal,
        Self::Biaya,
        Self::TotalUang,
        Self::Keterangan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Tanggal => "Tanggal",
            Self::BankTujuan => "Bank Tujuan",
            Self::NomorRekening => "Nomor Rekening",
            Self::NamaPemilik => "Nama Pemilik Rekening",
            Self::Nominal => "Nominal",
            Self::Biaya => "Biaya Admin",
            Self::TotalUang => "Total Uang",
            Self::Keterangan => "Keterangan",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Form state: every field is kept as typed until submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferDraft {
    /// Id of the transfer being edited; `None` creates a new one.
    pub editing: Option<i64>,
    pub tanggal: String,
    pub bank_tujuan: String,
    pub nomor_rekening: String,
    pub nama_pemilik: String,
    pub nominal: String,
    pub biaya: String,
    /// Cash handed over by the customer, only used for the change.
    pub total_uang: String,
    pub keterangan: String,
}

impl TransferDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            tanggal: today.format("%Y-%m-%d").to_string(),
            bank_tujuan: String::new(),
            nomor_rekening: String::new(),
            nama_pemilik: String::new(),
            nominal: String::new(),
            biaya: String::new(),
            total_uang: String::new(),
            keterangan: String::new(),
        }
    }

    /// Pre-fills the form from an existing transfer.
    pub fn from_record(record: &TransferRecord) -> Self {
        let tanggal = dates::iso_date(&record.tanggal)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| record.tanggal.clone());
        Self {
            editing: Some(record.id),
            tanggal,
            bank_tujuan: record.bank_tujuan.clone(),
            nomor_rekening: record.nomor_rekening.clone(),
            nama_pemilik: record.nama_pemilik.clone(),
            nominal: record.nominal.normalize().to_string(),
            biaya: record.biaya.normalize().to_string(),
            total_uang: String::new(),
            keterangan: record.keterangan.clone().unwrap_or_default(),
        }
    }

    /// Copies the recipient of a favorite, leaving the rest untouched.
    pub fn apply_favorite(&mut self, favorite: &FavoriteRecipient) {
        self.bank_tujuan = favorite.bank_tujuan.clone();
        self.nomor_rekening = favorite.nomor_rekening.clone();
        self.nama_pemilik = favorite.nama_pemilik.clone();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Tanggal => &self.tanggal,
            FormField::BankTujuan => &self.bank_tujuan,
            FormField::NomorRekening => &self.nomor_rekening,
            FormField::NamaPemilik => &self.nama_pemilik,
            FormField::Nominal => &self.nominal,
            FormField::Biaya => &self.biaya,
            FormField::TotalUang => &self.total_uang,
            FormField::Keterangan => &self.keterangan,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Tanggal => &mut self.tanggal,
            FormField::BankTujuan => &mut self.bank_tujuan,
            FormField::NomorRekening => &mut self.nomor_rekening,
            FormField::NamaPemilik => &mut self.nama_pemilik,
            FormField::Nominal => &mut self.nominal,
            FormField::Biaya => &mut self.biaya,
            FormField::TotalUang => &mut self.total_uang,
            FormField::Keterangan => &mut self.keterangan,
        }
    }

    /// `nominal + biaya` once both parse, zero before that.
    pub fn total(&self) -> Decimal {
        match (parse_nominal(&self.nominal), parse_nominal(&self.biaya)) {
            (Ok(nominal), Ok(biaya)) => nominal + biaya,
            _ => Decimal::ZERO,
        }
    }

    /// Change to hand back (`kembalian`); zero until cash and total are known.
    pub fn change(&self) -> Decimal {
        let total = self.total();
        match parse_nominal(&self.total_uang) {
            Ok(cash) if total > Decimal::ZERO => cash - total,
            _ => Decimal::ZERO,
        }
    }

    /// Checks required fields and numbers, producing the write body.
    pub fn validate(&self) -> ResultEngine<TransferPayload> {
        for field in [
            FormField::Tanggal,
            FormField::BankTujuan,
            FormField::NomorRekening,
            FormField::NamaPemilik,
            FormField::Nominal,
            FormField::Biaya,
        ] {
            if self.field(field).trim().is_empty() {
                return Err(EngineError::MissingField(field.label()));
            }
        }

        let tanggal = dates::parse_input_date(&self.tanggal)?;
        let total_uang = match self.total_uang.trim() {
            "" => None,
            cash => Some(parse_nominal(cash)?),
        };
        Ok(TransferPayload {
            tanggal: tanggal.format("%Y-%m-%d").to_string(),
            bank_tujuan: self.bank_tujuan.trim().to_string(),
            nomor_rekening: self.nomor_rekening.trim().to_string(),
            nama_pemilik: self.nama_pemilik.trim().to_string(),
            nominal: parse_nominal(&self.nominal)?,
            biaya: parse_nominal(&self.biaya)?,
            total_uang,
            keterangan: self.keterangan.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TransferDraft {
        let mut draft = TransferDraft::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        draft.apply_favorite(&FavoriteRecipient {
            bank_tujuan: "BRI".to_string(),
            nomor_rekening: "0012".to_string(),
            nama_pemilik: "Sari".to_string(),
        });
        draft.nominal = "100000".to_string();
        draft.biaya = "6500".to_string();
        draft
    }

    #[test]
    fn total_and_change_follow_the_inputs() {
        let mut draft = filled();
        assert_eq!(draft.total(), Decimal::new(106_500, 0));
        assert_eq!(draft.change(), Decimal::ZERO);

        draft.total_uang = "110000".to_string();
        assert_eq!(draft.change(), Decimal::new(3_500, 0));

        draft.biaya.clear();
        assert_eq!(draft.total(), Decimal::ZERO);
        assert_eq!(draft.change(), Decimal::ZERO);
    }

    #[test]
    fn validate_names_the_first_missing_field() {
        let mut draft = filled();
        draft.nama_pemilik = "  ".to_string();
        assert_eq!(
            draft.validate(),
            Err(EngineError::MissingField("Nama Pemilik Rekening"))
        );
    }

    #[test]
    fn validate_rejects_bad_numbers_and_dates() {
        let mut draft = filled();
        draft.biaya = "enam ribu".to_string();
        assert_eq!(draft.validate(), Err(EngineError::InvalidNominal));

        let mut draft = filled();
        draft.tanggal = "01-05-2024".to_string();
        assert!(matches!(draft.validate(), Err(EngineError::InvalidDate(_))));
    }

    #[test]
    fn validate_builds_trimmed_payload() {
        let mut draft = filled();
        draft.keterangan = " bayar kos ".to_string();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.tanggal, "2024-05-01");
        assert_eq!(payload.nama_pemilik, "Sari");
        assert_eq!(payload.nominal, Decimal::new(100_000, 0));
        assert_eq!(payload.keterangan, "bayar kos");
        assert_eq!(payload.total_uang, None);
    }

    #[test]
    fn cash_received_is_sent_when_typed() {
        let mut draft = filled();
        draft.total_uang = "110000".to_string();
        let payload = draft.validate().unwrap();
        assert_eq!(payload.total_uang, Some(Decimal::new(110_000, 0)));

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["total_uang"], serde_json::json!(110000.0));
        let body = serde_json::to_value(filled().validate().unwrap()).unwrap();
        assert!(body.get("total_uang").is_none());

        draft.total_uang = "seratus".to_string();
        assert_eq!(draft.validate(), Err(EngineError::InvalidNominal));
    }

    #[test]
    fn editing_prefills_from_record() {
        let record = TransferRecord {
            id: 42,
            tanggal: "2024-05-01T00:00:00.000Z".to_string(),
            bank_tujuan: "BCA".to_string(),
            nomor_rekening: "987".to_string(),
            nama_pemilik: "Budi".to_string(),
            nominal: Decimal::new(5_000_000, 2),
            biaya: Decimal::new(2_500, 0),
            keterangan: None,
            status: None,
            cashier_id: None,
        };
        let draft = TransferDraft::from_record(&record);
        assert_eq!(draft.editing, Some(42));
        assert_eq!(draft.tanggal, "2024-05-01");
        assert_eq!(draft.nominal, "50000");
        assert_eq!(draft.total(), Decimal::new(52_500, 0));
    }
}
