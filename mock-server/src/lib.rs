//! In-memory implementation of the student records HTTP API.
//!
//! Serves the same envelopes, status codes, and validation messages as the
//! production API so the client core can be exercised end to end.

pub mod error;
pub mod model;
pub mod validation;

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiFailure;
pub use model::{
    ApiResponse, ErrorResponse, PagedResponse, PaginationMeta, Student, StudentRecord,
    StudentRequest, StudentSummary,
};

pub type Db = Arc<RwLock<HashMap<String, StudentRecord>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/health", get(health))
        .route("/api/students", get(list_students).post(create_student))
        .route("/api/students/search", get(search_students))
        .route(
            "/api/students/{nomor_induk}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "student api listening");
    }
    axum::serve(listener, app()).await
}

fn default_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub sort: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "timestamp": model::now(),
        "message": "Student API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_students(
    State(db): State<Db>,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResponse<StudentSummary>>, ApiFailure> {
    let students = db.read().await;
    let matches: Vec<&StudentRecord> = students.values().collect();
    let sort = query.sort.as_deref().unwrap_or("nomorInduk,asc");
    let page = paginate(matches, query.page, query.size, sort, uri.path())?;
    Ok(Json(page.into_response("Students retrieved successfully")))
}

async fn search_students(
    State(db): State<Db>,
    uri: Uri,
    Query(query): Query<SearchQuery>,
) -> Result<Json<PagedResponse<StudentSummary>>, ApiFailure> {
    let Some(keyword) = query.keyword else {
        return Err(ApiFailure::bad_request(
            uri.path(),
            "Required parameter 'keyword' is missing",
        ));
    };
    let needle = keyword.trim().to_lowercase();
    let students = db.read().await;
    let matches: Vec<&StudentRecord> = students
        .values()
        .filter(|s| {
            needle.is_empty()
                || s.nama_depan.to_lowercase().contains(&needle)
                || s
                    .nama_belakang
                    .as_deref()
                    .is_some_and(|last| last.to_lowercase().contains(&needle))
        })
        .collect();
    let sort = query.sort.as_deref().unwrap_or("namaDepan,asc");
    let page = paginate(matches, query.page, query.size, sort, uri.path())?;
    Ok(Json(page.into_response("Search completed successfully")))
}

async fn get_student(
    State(db): State<Db>,
    uri: Uri,
    Path(nomor_induk): Path<String>,
) -> Result<Json<ApiResponse<Student>>, ApiFailure> {
    let students = db.read().await;
    let record = students
        .get(&nomor_induk)
        .ok_or_else(|| ApiFailure::not_found(uri.path(), &nomor_induk))?;
    Ok(Json(ApiResponse::success(
        "Student found",
        record.detail(model::today()),
    )))
}

async fn create_student(
    State(db): State<Db>,
    uri: Uri,
    Json(input): Json<StudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), ApiFailure> {
    let today = model::today();
    let valid = validation::check_fields(&input, today)
        .map_err(|errors| ApiFailure::validation(uri.path(), errors))?;
    validation::check_age(valid.tanggal_lahir, today)
        .map_err(|message| ApiFailure::bad_request(uri.path(), message))?;

    let mut students = db.write().await;
    let nomor_induk = next_nomor_induk(&students, today);
    let at = model::now();
    let record = StudentRecord {
        nomor_induk: nomor_induk.clone(),
        nama_depan: valid.nama_depan,
        nama_belakang: valid.nama_belakang,
        tanggal_lahir: valid.tanggal_lahir,
        created_at: at,
        updated_at: at,
    };
    let detail = record.detail(today);
    students.insert(nomor_induk.clone(), record);
    info!(%nomor_induk, "student created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Student created successfully", detail)),
    ))
}

async fn update_student(
    State(db): State<Db>,
    uri: Uri,
    Path(nomor_induk): Path<String>,
    Json(input): Json<StudentRequest>,
) -> Result<Json<ApiResponse<Student>>, ApiFailure> {
    let today = model::today();
    let valid = validation::check_fields(&input, today)
        .map_err(|errors| ApiFailure::validation(uri.path(), errors))?;

    let mut students = db.write().await;
    let record = students
        .get_mut(&nomor_induk)
        .ok_or_else(|| ApiFailure::not_found(uri.path(), &nomor_induk))?;
    validation::check_age(valid.tanggal_lahir, today)
        .map_err(|message| ApiFailure::bad_request(uri.path(), message))?;

    record.nama_depan = valid.nama_depan;
    record.nama_belakang = valid.nama_belakang;
    record.tanggal_lahir = valid.tanggal_lahir;
    record.updated_at = model::now();
    info!(%nomor_induk, "student updated");
    Ok(Json(ApiResponse::success(
        "Student updated successfully",
        record.detail(today),
    )))
}

async fn delete_student(
    State(db): State<Db>,
    uri: Uri,
    Path(nomor_induk): Path<String>,
) -> Result<Json<ApiResponse<Option<()>>>, ApiFailure> {
    let mut students = db.write().await;
    students
        .remove(&nomor_induk)
        .ok_or_else(|| ApiFailure::not_found(uri.path(), &nomor_induk))?;
    info!(%nomor_induk, "student deleted");
    Ok(Json(ApiResponse::success(
        "Student deleted successfully",
        None,
    )))
}

/// `YYYY` of `today` followed by a zero-padded sequence one past the highest
/// sequence already issued for that year.
fn next_nomor_induk(students: &HashMap<String, StudentRecord>, today: NaiveDate) -> String {
    use chrono::Datelike;

    let prefix = today.year().to_string();
    let highest = students
        .keys()
        .filter_map(|key| key.strip_prefix(prefix.as_str()))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:03}", highest + 1)
}

struct Page {
    rows: Vec<StudentSummary>,
    meta: PaginationMeta,
}

impl Page {
    fn into_response(self, message: &str) -> PagedResponse<StudentSummary> {
        PagedResponse {
            status: "success".to_string(),
            message: message.to_string(),
            data: self.rows,
            meta: self.meta,
            timestamp: model::now(),
        }
    }
}

type Comparator = Box<dyn Fn(&StudentRecord, &StudentRecord) -> Ordering>;

fn comparator(field: &str, today: NaiveDate) -> Option<Comparator> {
    let cmp: Comparator = match field {
        "nomorInduk" => Box::new(|a, b| a.nomor_induk.cmp(&b.nomor_induk)),
        "namaDepan" => Box::new(|a, b| a.nama_depan.cmp(&b.nama_depan)),
        "namaBelakang" => Box::new(|a, b| a.nama_belakang.cmp(&b.nama_belakang)),
        "namaLengkap" => Box::new(|a, b| a.nama_lengkap().cmp(&b.nama_lengkap())),
        "tanggalLahir" => Box::new(|a, b| a.tanggal_lahir.cmp(&b.tanggal_lahir)),
        "usia" => Box::new(move |a, b| a.usia(today).cmp(&b.usia(today))),
        "createdAt" => Box::new(|a, b| a.created_at.cmp(&b.created_at)),
        "updatedAt" => Box::new(|a, b| a.updated_at.cmp(&b.updated_at)),
        _ => return None,
    };
    Some(cmp)
}

fn paginate(
    mut rows: Vec<&StudentRecord>,
    page: u32,
    size: u32,
    sort: &str,
    path: &str,
) -> Result<Page, ApiFailure> {
    if size == 0 {
        return Err(ApiFailure::bad_request(path, "Page size must be at least 1"));
    }
    let (field, direction) = sort.split_once(',').unwrap_or((sort, "asc"));
    let today = model::today();
    let cmp = comparator(field.trim(), today).ok_or_else(|| {
        ApiFailure::bad_request(path, format!("Unknown sort field: {}", field.trim()))
    })?;
    let descending = match direction.trim() {
        d if d.eq_ignore_ascii_case("asc") => false,
        d if d.eq_ignore_ascii_case("desc") => true,
        other => {
            return Err(ApiFailure::bad_request(
                path,
                format!("Unknown sort direction: {other}"),
            ))
        }
    };
    rows.sort_by(|a, b| {
        let ord = cmp(a, b);
        let ord = if descending { ord.reverse() } else { ord };
        ord.then_with(|| a.nomor_induk.cmp(&b.nomor_induk))
    });

    let total = rows.len() as u64;
    let start = (page as usize).saturating_mul(size as usize);
    let data = rows
        .into_iter()
        .skip(start)
        .take(size as usize)
        .map(|record| record.summary(today))
        .collect();
    Ok(Page {
        rows: data,
        meta: PaginationMeta::new(page, size, total),
    })
}
