use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    AppError, BloodGroup, BloodRequest, BloodStock, ClientConfig, Donation, Donor, NewBloodRequest,
    NewDonation, Patient, SignInRequest, SignInResponse, SignupRequest, UpdateStockRequest,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Bearer credential shared by every request built from the same [`HttpApi`].
///
/// The header is read when a request is constructed, so a `set` or `clear`
/// is visible to every request built after it.
#[derive(Debug, Clone, Default)]
pub struct Credential(Arc<RwLock<Option<String>>>);

impl Credential {
    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    pub fn bearer(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_set(&self) -> bool {
        self.0.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

/// Approve or reject; the only transitions a client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn path_segment(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

/// The blood-bank HTTP API surface.
///
/// Writes return `()`: callers re-read state after every successful write
/// instead of trusting the write's response body.
#[allow(async_fn_in_trait)]
pub trait BloodBankApi: Clone {
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, AppError>;
    async fn sign_up(&self, request: &SignupRequest) -> Result<String, AppError>;

    async fn list_stock(&self) -> Result<Vec<BloodStock>, AppError>;
    async fn list_donors(&self) -> Result<Vec<Donor>, AppError>;
    async fn list_patients(&self) -> Result<Vec<Patient>, AppError>;
    async fn list_donations(&self) -> Result<Vec<Donation>, AppError>;
    async fn list_requests(&self) -> Result<Vec<BloodRequest>, AppError>;

    async fn donor_by_user(&self, user_id: i64) -> Result<Donor, AppError>;
    async fn patient_by_user(&self, user_id: i64) -> Result<Patient, AppError>;
    async fn donations_by_donor(&self, user_id: i64) -> Result<Vec<Donation>, AppError>;
    async fn requests_by_donor(&self, user_id: i64) -> Result<Vec<BloodRequest>, AppError>;
    async fn requests_by_patient(&self, user_id: i64) -> Result<Vec<BloodRequest>, AppError>;

    async fn create_donation(&self, donation: &NewDonation) -> Result<(), AppError>;
    async fn create_request(&self, request: &NewBloodRequest) -> Result<(), AppError>;
    async fn decide_donation(&self, id: i64, decision: Decision) -> Result<(), AppError>;
    async fn decide_request(&self, id: i64, decision: Decision) -> Result<(), AppError>;
    async fn update_stock(&self, group: BloodGroup, unit: u32) -> Result<(), AppError>;
}

/// `reqwest`-backed implementation of [`BloodBankApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    credential: Credential,
}

/// Prefix the sign-up endpoint uses for rejections it still answers with 2xx.
const SIGNUP_ERROR_PREFIX: &str = "Error:";

impl HttpApi {
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn from_config(config: &ClientConfig, credential: Credential) -> Self {
        Self::new(config.base_url(), credential)
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.credential.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(server_unreachable)?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status, "server rejected request");
        Err(AppError::from_response_body(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, status, "undecodable response body");
            AppError::transport("Could not read the server response").with_status(status)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = Self::send(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    async fn write<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), AppError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::send(builder).await.map(drop)
    }
}

fn server_unreachable(e: reqwest::Error) -> AppError {
    tracing::warn!(error = %e, "request failed before a response arrived");
    AppError::transport(format!("Could not reach the server: {e}"))
}

impl BloodBankApi for HttpApi {
    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, AppError> {
        let response = self
            .request(Method::POST, "/api/auth/signin")
            .json(request)
            .send()
            .await
            .map_err(server_unreachable)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_sign_in_body(status, &body));
        }
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, request), fields(username = %request.username))]
    async fn sign_up(&self, request: &SignupRequest) -> Result<String, AppError> {
        let response = Self::send(self.request(Method::POST, "/api/auth/signup").json(request)).await?;
        let body = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<String>(body.trim()).unwrap_or(body);
        match body.trim().strip_prefix(SIGNUP_ERROR_PREFIX) {
            Some(rest) => Err(signup_rejection(rest.trim())),
            None => Ok(body.trim().to_string()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_stock(&self) -> Result<Vec<BloodStock>, AppError> {
        self.get_json("/api/stock").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_donors(&self) -> Result<Vec<Donor>, AppError> {
        self.get_json("/api/donors").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_patients(&self) -> Result<Vec<Patient>, AppError> {
        self.get_json("/api/patients").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_donations(&self) -> Result<Vec<Donation>, AppError> {
        self.get_json("/api/donations").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_requests(&self) -> Result<Vec<BloodRequest>, AppError> {
        self.get_json("/api/requests").await
    }

    #[tracing::instrument(skip(self))]
    async fn donor_by_user(&self, user_id: i64) -> Result<Donor, AppError> {
        self.get_json(&format!("/api/donors/user/{user_id}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn patient_by_user(&self, user_id: i64) -> Result<Patient, AppError> {
        self.get_json(&format!("/api/patients/user/{user_id}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn donations_by_donor(&self, user_id: i64) -> Result<Vec<Donation>, AppError> {
        self.get_json(&format!("/api/donations/donor/{user_id}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn requests_by_donor(&self, user_id: i64) -> Result<Vec<BloodRequest>, AppError> {
        self.get_json(&format!("/api/requests/donor/{user_id}")).await
    }

    #[tracing::instrument(skip(self))]
    async fn requests_by_patient(&self, user_id: i64) -> Result<Vec<BloodRequest>, AppError> {
        self.get_json(&format!("/api/requests/patient/{user_id}")).await
    }

    #[tracing::instrument(skip(self, donation), fields(group = %donation.blood_group, unit = donation.unit))]
    async fn create_donation(&self, donation: &NewDonation) -> Result<(), AppError> {
        self.write(Method::POST, "/api/donations", Some(donation)).await
    }

    #[tracing::instrument(skip(self, request), fields(group = %request.blood_group, unit = request.unit))]
    async fn create_request(&self, request: &NewBloodRequest) -> Result<(), AppError> {
        self.write(Method::POST, "/api/requests", Some(request)).await
    }

    #[tracing::instrument(skip(self))]
    async fn decide_donation(&self, id: i64, decision: Decision) -> Result<(), AppError> {
        let path = format!("/api/donations/{id}/{}", decision.path_segment());
        self.write::<()>(Method::PUT, &path, None).await
    }

    #[tracing::instrument(skip(self))]
    async fn decide_request(&self, id: i64, decision: Decision) -> Result<(), AppError> {
        let path = format!("/api/requests/{id}/{}", decision.path_segment());
        self.write::<()>(Method::PUT, &path, None).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_stock(&self, group: BloodGroup, unit: u32) -> Result<(), AppError> {
        let path = format!("/api/stock/{}", urlencoding::encode(group.as_str()));
        self.write(Method::PUT, &path, Some(&UpdateStockRequest { unit }))
            .await
    }
}

/// Map a 2xx `Error: ...` sign-up body onto the field it concerns.
fn signup_rejection(message: &str) -> AppError {
    let lower = message.to_lowercase();
    let field = if lower.contains("username") {
        Some("username")
    } else if lower.contains("email") {
        Some("email")
    } else {
        None
    };
    match field {
        Some(field) => AppError::field(field, message),
        None => AppError::validation(message, HashMap::new()),
    }
}
