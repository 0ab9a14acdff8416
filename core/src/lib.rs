//! Synchronous client core for the student records API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A host-supplied `Transport`
//! executes the actual HTTP round-trip, keeping the core deterministic and
//! testable. On top of the wire layer sit a key-based query cache with
//! invalidate-on-write, the pre-submission validation rules, and the
//! screen-level state machines a UI shell drives.
//!
//! # Design
//! - `StudentClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `StudentQueries` owns the cache; writes invalidate the reads they touch.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pages;
pub mod params;
pub mod queries;
pub mod route;
pub mod types;
pub mod validation;

pub use api::StudentApi;
pub use cache::{QueryCache, DEFAULT_STALE_TIME};
pub use client::{normalize_error, parse_json, StudentClient};
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use pages::{
    CreatePage, DeleteDialog, DeleteOutcome, DetailPage, EditPage, ErrorPanel, ListPage, ListView,
    Load, Notification, NotificationKind, SubmitOutcome,
};
pub use params::{ListParams, SearchParams, Sort, SortDirection, DEFAULT_PAGE_SIZE};
pub use queries::{QueryFilter, QueryKey, QueryKind, QueryResult, StudentQueries};
pub use route::Route;
pub use types::{
    ApiEnvelope, EmptyEnvelope, ErrorEnvelope, PageMeta, PagedEnvelope, Student, StudentFormData,
    StudentListItem,
};
pub use validation::{validate, validate_today, FieldErrors, FormField};
