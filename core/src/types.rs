//! Domain DTOs for the student API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Field names follow the wire format (`nomorInduk`, `namaDepan`, ...) via
//! `rename_all = "camelCase"`; integration tests catch any schema drift
//! between the two crates.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A student record as returned by the get/create/update endpoints.
///
/// `nama_lengkap` and `usia` are derived by the server and never sent back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub nomor_induk: String,
    pub nama_depan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama_belakang: Option<String>,
    pub nama_lengkap: String,
    pub tanggal_lahir: NaiveDate,
    pub usia: u32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row projection used by list and search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentListItem {
    pub nomor_induk: String,
    pub nama_lengkap: String,
    pub usia: u32,
}

/// Request payload for create and update. The identity key is never part of
/// the body; updates address it through the path.
///
/// An empty last name is equivalent to an absent one and is omitted from the
/// JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentFormData {
    pub nama_depan: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub nama_belakang: Option<String>,
    pub tanggal_lahir: String,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl StudentFormData {
    pub fn new(nama_depan: &str, nama_belakang: Option<&str>, tanggal_lahir: &str) -> Self {
        Self {
            nama_depan: nama_depan.to_string(),
            nama_belakang: nama_belakang.map(str::to_string),
            tanggal_lahir: tanggal_lahir.to_string(),
        }
    }

    /// Last name with the empty string folded into `None`.
    pub fn last_name(&self) -> Option<&str> {
        self.nama_belakang.as_deref().filter(|s| !s.is_empty())
    }
}

impl From<&Student> for StudentFormData {
    fn from(student: &Student) -> Self {
        Self {
            nama_depan: student.nama_depan.clone(),
            nama_belakang: student.nama_belakang.clone(),
            tanggal_lahir: student.tanggal_lahir.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Single-resource response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

/// Envelope returned by delete, whose `data` is null.
pub type EmptyEnvelope = ApiEnvelope<Option<serde_json::Value>>;

/// Pagination metadata attached to list and search results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Paged response envelope for list and search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagedEnvelope<T> {
    pub status: String,
    pub message: String,
    pub data: Vec<T>,
    pub meta: PageMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Body the server sends with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}
