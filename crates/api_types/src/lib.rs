use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lenient deserializers for the numeric fields the backend sends either as JSON
/// numbers, as numeric strings, as `null`, or not at all.
///
/// Anything that cannot be read as a number becomes zero.
pub mod lenient {
    use rust_decimal::{Decimal, prelude::FromPrimitive};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(decimal_from_value).unwrap_or_default())
    }

    pub fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(count_from_value).unwrap_or_default())
    }

    pub fn decimal_from_value(value: &Value) -> Decimal {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Decimal::from(i)
                } else {
                    n.as_f64().and_then(Decimal::from_f64).unwrap_or_default()
                }
            }
            Value::String(s) => s.trim().parse::<Decimal>().unwrap_or_default(),
            _ => Decimal::ZERO,
        }
    }

    pub fn count_from_value(value: &Value) -> i64 {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or_default(),
            Value::String(s) => {
                let trimmed = s.trim();
                let digits: String = trimmed
                    .char_indices()
                    .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
                    .map(|(_, c)| c)
                    .collect();
                digits.parse().unwrap_or_default()
            }
            _ => 0,
        }
    }
}

pub mod user {
    use super::*;

    /// Role of the authenticated user.
    ///
    /// - `owner`: sees every cashier's records and the `modal_kas` channel.
    /// - `kasir`: scoped to its own records.
    /// - anything else is kept as `Other` and treated as unscoped, non-owner.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Owner,
        Kasir,
        #[default]
        #[serde(other)]
        Other,
    }

    impl Role {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Kasir => "kasir",
                Self::Other => "other",
            }
        }

        pub fn is_owner(self) -> bool {
            self == Self::Owner
        }
    }

    /// Entry of `GET /user`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        pub username: String,
        #[serde(default)]
        pub role: Role,
    }
}

pub mod modal {
    use super::*;

    /// Payment application a capital balance is tracked for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChannelId {
        Karangsari,
        Fastpay,
        Mmbc,
        Payfazz,
        Posfin,
        BukuAgen,
        ModalKas,
        /// A channel this client does not know about.
        #[serde(other)]
        Unknown,
    }

    /// One point-in-time capital entry, as returned by `GET /modal` and
    /// `GET /modal/history`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BalanceRecord {
        pub id: i64,
        pub modal_type: ChannelId,
        pub user_id: i64,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub nominal: Decimal,
        pub created_at: DateTime<Utc>,
        /// Only present on history rows.
        #[serde(default)]
        pub username: Option<String>,
    }

    /// Body of `POST /modal`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ModalNew {
        pub modal_type: ChannelId,
        #[serde(with = "rust_decimal::serde::float")]
        pub nominal: Decimal,
    }

    /// Body of `PUT /modal/:id`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ModalUpdate {
        #[serde(with = "rust_decimal::serde::float")]
        pub nominal: Decimal,
    }
}

pub mod pagination {
    use super::*;

    /// Pagination block of a paginated list envelope.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageInfo {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        #[serde(rename = "totalPages", default)]
        pub total_pages: u64,
    }

    /// A list endpoint answers either with `{data, pagination}` or, on older
    /// backends, with a bare array.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ListResponse<T> {
        Paged { data: Vec<T>, pagination: PageInfo },
        Bare(Vec<T>),
    }
}

pub mod transfer {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransferStatus {
        #[default]
        Pending,
        Lunas,
    }

    impl TransferStatus {
        pub fn label(self) -> &'static str {
            match self {
                Self::Pending => "Pending",
                Self::Lunas => "Lunas",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransferRecord {
        pub id: i64,
        /// Either a plain `YYYY-MM-DD` date or a full RFC3339 timestamp.
        pub tanggal: String,
        pub bank_tujuan: String,
        pub nomor_rekening: String,
        pub nama_pemilik: String,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub nominal: Decimal,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub biaya: Decimal,
        #[serde(default)]
        pub keterangan: Option<String>,
        #[serde(default)]
        pub status: Option<TransferStatus>,
        #[serde(default)]
        pub cashier_id: Option<i64>,
    }

    impl TransferRecord {
        /// Always derived, never read from the wire.
        pub fn total(&self) -> Decimal {
            self.nominal + self.biaya
        }

        pub fn status(&self) -> TransferStatus {
            self.status.unwrap_or_default()
        }
    }

    /// Body of `POST /transfer` and `PUT /transfer/:id`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransferPayload {
        pub tanggal: String,
        pub bank_tujuan: String,
        pub nomor_rekening: String,
        pub nama_pemilik: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub nominal: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        pub biaya: Decimal,
        /// Cash handed over by the customer, when it was typed in.
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            with = "rust_decimal::serde::float_option"
        )]
        pub total_uang: Option<Decimal>,
        pub keterangan: String,
    }

    /// Body of `PUT /transfer/:id/status`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusUpdate {
        pub status: TransferStatus,
    }

    /// Entry of `GET /transfer-favorit`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FavoriteRecipient {
        pub bank_tujuan: String,
        pub nomor_rekening: String,
        pub nama_pemilik: String,
    }
}

pub mod grafik {
    use super::*;

    /// Aggregation bucket of the transfer charts.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Period {
        #[default]
        Harian,
        Mingguan,
        Bulanan,
    }

    impl Period {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Harian => "harian",
                Self::Mingguan => "mingguan",
                Self::Bulanan => "bulanan",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                Self::Harian => "Harian",
                Self::Mingguan => "Mingguan",
                Self::Bulanan => "Bulanan",
            }
        }

        pub fn next(self) -> Self {
            match self {
                Self::Harian => Self::Mingguan,
                Self::Mingguan => Self::Bulanan,
                Self::Bulanan => Self::Harian,
            }
        }
    }

    /// One aggregated row of `GET /transfer/grafik/:period`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ChartSeriesPoint {
        #[serde(default)]
        pub tanggal: Option<String>,
        #[serde(default, deserialize_with = "lenient::count")]
        pub total: i64,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub total_nominal: Decimal,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub total_biaya: Decimal,
        #[serde(default, deserialize_with = "lenient::decimal")]
        pub total_all: Decimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::ListResponse;
    use transfer::TransferRecord;

    #[test]
    fn list_response_accepts_envelope_and_bare_array() {
        let paged: ListResponse<TransferRecord> = serde_json::from_str(
            r#"{"data":[],"pagination":{"page":2,"limit":10,"total":25,"totalPages":3}}"#,
        )
        .unwrap();
        assert!(matches!(paged, ListResponse::Paged { pagination, .. } if pagination.total == 25));

        let bare: ListResponse<TransferRecord> = serde_json::from_str("[]").unwrap();
        assert!(matches!(bare, ListResponse::Bare(items) if items.is_empty()));
    }

    #[test]
    fn balance_record_reads_string_nominal() {
        let record: modal::BalanceRecord = serde_json::from_str(
            r#"{"id":1,"modal_type":"buku_agen","user_id":7,"nominal":"150000.00","created_at":"2024-05-01T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(record.modal_type, modal::ChannelId::BukuAgen);
        assert_eq!(record.nominal, Decimal::new(150000, 0));
    }

    #[test]
    fn unknown_role_and_channel_fall_back() {
        let user: user::UserView =
            serde_json::from_str(r#"{"id":3,"username":"x","role":"admin"}"#).unwrap();
        assert_eq!(user.role, user::Role::Other);

        let channel: modal::ChannelId = serde_json::from_str(r#""dana""#).unwrap();
        assert_eq!(channel, modal::ChannelId::Unknown);
    }

    #[test]
    fn chart_point_defaults_garbage_to_zero() {
        let point: grafik::ChartSeriesPoint = serde_json::from_str(
            r#"{"tanggal":"2024-05-01","total":"4","total_nominal":"abc","total_all":null}"#,
        )
        .unwrap();
        assert_eq!(point.total, 4);
        assert_eq!(point.total_nominal, Decimal::ZERO);
        assert_eq!(point.total_biaya, Decimal::ZERO);
        assert_eq!(point.total_all, Decimal::ZERO);
    }

    #[test]
    fn write_payloads_send_numbers() {
        let body = serde_json::to_value(modal::ModalNew {
            modal_type: modal::ChannelId::ModalKas,
            nominal: Decimal::new(2500, 1),
        })
        .unwrap();
        assert_eq!(body["modal_type"], "modal_kas");
        assert_eq!(body["nominal"], serde_json::json!(250.0));
    }
}
