use api_types::{
    grafik::ChartSeriesPoint,
    modal::{BalanceRecord, ModalNew, ModalUpdate},
    pagination::ListResponse,
    transfer::{FavoriteRecipient, StatusUpdate, TransferPayload, TransferRecord, TransferStatus},
    user::UserView,
};
use engine::{RequestDescriptor, query};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Url::parse(base_url).map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<T, ClientError> {
        tracing::debug!(request = %descriptor, "GET");
        let url = self.endpoint(&descriptor.path)?;
        let res = self
            .request(Method::GET, url)
            .query(&descriptor.query_pairs())
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let res = check(res).await?;
        res.json::<T>().await.map_err(ClientError::Transport)
    }

    /// Write call; the response body is not needed, every write is followed by
    /// a reload of the affected lists.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> std::result::Result<(), ClientError> {
        tracing::debug!(%method, path, "write");
        let url = self.endpoint(path)?;
        let res = self
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        check(res).await.map(|_| ())
    }

    pub async fn balances(&self) -> std::result::Result<Vec<BalanceRecord>, ClientError> {
        self.get(&query::balances()).await
    }

    pub async fn balance_history(&self) -> std::result::Result<Vec<BalanceRecord>, ClientError> {
        self.get(&query::balance_history()).await
    }

    pub async fn create_balance(&self, body: &ModalNew) -> std::result::Result<(), ClientError> {
        self.send(Method::POST, "/modal", body).await
    }

    pub async fn update_balance(
        &self,
        id: i64,
        body: &ModalUpdate,
    ) -> std::result::Result<(), ClientError> {
        self.send(Method::PUT, &format!("/modal/{id}"), body).await
    }

    pub async fn transfers(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<ListResponse<TransferRecord>, ClientError> {
        self.get(descriptor).await
    }

    pub async fn create_transfer(
        &self,
        body: &TransferPayload,
    ) -> std::result::Result<(), ClientError> {
        self.send(Method::POST, "/transfer", body).await
    }

    pub async fn update_transfer(
        &self,
        id: i64,
        body: &TransferPayload,
    ) -> std::result::Result<(), ClientError> {
        self.send(Method::PUT, &format!("/transfer/{id}"), body)
            .await
    }

    pub async fn mark_lunas(&self, id: i64) -> std::result::Result<(), ClientError> {
        let body = StatusUpdate {
            status: TransferStatus::Lunas,
        };
        self.send(Method::PUT, &format!("/transfer/{id}/status"), &body)
            .await
    }

    pub async fn favorites(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<Vec<FavoriteRecipient>, ClientError> {
        self.get(descriptor).await
    }

    pub async fn chart(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::result::Result<Vec<ChartSeriesPoint>, ClientError> {
        self.get(descriptor).await
    }

    pub async fn users(&self) -> std::result::Result<Vec<UserView>, ClientError> {
        self.get(&query::users()).await
    }
}

async fn check(res: Response) -> std::result::Result<Response, ClientError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    let err = status_error(status, error_text(&body));
    tracing::warn!(status, ?err, "request rejected");
    Err(err)
}

fn error_text(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|err| err.error.or(err.message))
        .unwrap_or_else(|| "unknown error".to_string())
}

fn status_error(status: u16, body: String) -> ClientError {
    match status {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_accepts_error_or_message() {
        assert_eq!(error_text(r#"{"error":"Data tidak valid"}"#), "Data tidak valid");
        assert_eq!(error_text(r#"{"message":"Token kadaluarsa"}"#), "Token kadaluarsa");
        assert_eq!(
            error_text(r#"{"error":"Nominal wajib diisi","message":"Bad Request"}"#),
            "Nominal wajib diisi"
        );
        assert_eq!(error_text(r#"{"status":500}"#), "unknown error");
        assert_eq!(error_text("<html>502</html>"), "unknown error");
    }

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(status_error(401, String::new()), ClientError::Unauthorized));
        assert!(matches!(status_error(403, String::new()), ClientError::Forbidden));
        assert!(matches!(status_error(404, String::new()), ClientError::NotFound));
        assert!(matches!(
            status_error(422, "nominal".to_string()),
            ClientError::Validation(msg) if msg == "nominal"
        ));
        assert!(matches!(status_error(500, "boom".to_string()), ClientError::Server(_)));
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = Client::new("http://localhost:3000/api/", None).unwrap();
        let url = client.endpoint("/transfer/grafik/harian").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/transfer/grafik/harian");
    }

    #[test]
    fn blank_token_is_ignored() {
        let client = Client::new("http://localhost:3000", Some("  ".to_string())).unwrap();
        assert!(client.token.is_none());
        assert!(Client::new("not a url", None).is_err());
    }
}
