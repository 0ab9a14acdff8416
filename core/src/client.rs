//! Stateless HTTP request builder and response parser for the student API.
//!
//! # Design
//! `StudentClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! The generic `get`/`post`/`put`/`delete` builders plus `parse_json` form the
//! wrapper every operation goes through: every request is sent as JSON, every
//! 2xx body is decoded as JSON, and every other status is normalized into an
//! `ApiError` by `normalize_error`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{ListParams, SearchParams};
use crate::types::{
    ApiEnvelope, EmptyEnvelope, ErrorEnvelope, PagedEnvelope, Student, StudentFormData,
    StudentListItem,
};

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// Synchronous, stateless client for the student API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct StudentClient {
    base_url: String,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- generic wrapper ---------------------------------------------------

    pub fn get(&self, path: &str) -> HttpRequest {
        self.request(HttpMethod::Get, path, None)
    }

    pub fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = to_json(body)?;
        Ok(self.request(HttpMethod::Post, path, Some(body)))
    }

    pub fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = to_json(body)?;
        Ok(self.request(HttpMethod::Put, path, Some(body)))
    }

    pub fn delete(&self, path: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, path, None)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        }
    }

    // -- student resource --------------------------------------------------

    pub fn build_list(&self, params: &ListParams) -> HttpRequest {
        self.get(&format!("/students?{}", params.query_string()))
    }

    pub fn build_get(&self, nomor_induk: &str) -> HttpRequest {
        self.get(&student_path(nomor_induk))
    }

    pub fn build_create(&self, input: &StudentFormData) -> Result<HttpRequest, ApiError> {
        self.post("/students", input)
    }

    pub fn build_update(
        &self,
        nomor_induk: &str,
        input: &StudentFormData,
    ) -> Result<HttpRequest, ApiError> {
        self.put(&student_path(nomor_induk), input)
    }

    pub fn build_delete(&self, nomor_induk: &str) -> HttpRequest {
        self.delete(&student_path(nomor_induk))
    }

    pub fn build_search(&self, params: &SearchParams) -> HttpRequest {
        self.get(&format!("/students/search?{}", params.query_string()))
    }

    pub fn parse_list(
        &self,
        response: HttpResponse,
    ) -> Result<PagedEnvelope<StudentListItem>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<ApiEnvelope<Student>, ApiError> {
        parse_json(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<ApiEnvelope<Student>, ApiError> {
        parse_json(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<ApiEnvelope<Student>, ApiError> {
        parse_json(response)
    }

    /// A 2xx with an empty body (204) is accepted as an envelope without data.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<EmptyEnvelope, ApiError> {
        if response.is_success() && response.body.trim().is_empty() {
            return Ok(ApiEnvelope {
                status: "success".to_string(),
                message: String::new(),
                data: None,
            });
        }
        parse_json(response)
    }

    pub fn parse_search(
        &self,
        response: HttpResponse,
    ) -> Result<PagedEnvelope<StudentListItem>, ApiError> {
        parse_json(response)
    }
}

/// Decode a 2xx body as `T`, or normalize any other status into an error.
pub fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(normalize_error(&response));
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn a non-2xx response into an `ApiError`.
///
/// A body that parses as an error envelope yields `ApiError::Api` with the
/// envelope's message, status, and validation list. Anything else yields
/// `ApiError::Http` with only the status line.
pub fn normalize_error(response: &HttpResponse) -> ApiError {
    match serde_json::from_str::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => ApiError::Api {
            message: if envelope.message.is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                envelope.message
            },
            status: envelope.status,
            errors: envelope.errors.unwrap_or_default(),
        },
        Err(_) => ApiError::Http {
            status: response.status,
            status_text: response.status_text.clone(),
        },
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn student_path(nomor_induk: &str) -> String {
    let segment: String = form_urlencoded::byte_serialize(nomor_induk.as_bytes()).collect();
    format!("/students/{}", segment.replace('+', "%20"))
}
