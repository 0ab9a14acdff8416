use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A stored student. Derived fields are computed on the way out.
#[derive(Clone, Debug)]
pub struct StudentRecord {
    pub nomor_induk: String,
    pub nama_depan: String,
    pub nama_belakang: Option<String>,
    pub tanggal_lahir: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StudentRecord {
    pub fn nama_lengkap(&self) -> String {
        match self.nama_belakang.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.nama_depan, last),
            _ => self.nama_depan.clone(),
        }
    }

    pub fn usia(&self, today: NaiveDate) -> u32 {
        years_between(self.tanggal_lahir, today).max(0) as u32
    }

    pub fn detail(&self, today: NaiveDate) -> Student {
        Student {
            nomor_induk: self.nomor_induk.clone(),
            nama_depan: self.nama_depan.clone(),
            nama_belakang: self.nama_belakang.clone(),
            nama_lengkap: self.nama_lengkap(),
            tanggal_lahir: self.tanggal_lahir,
            usia: self.usia(today),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self, today: NaiveDate) -> StudentSummary {
        StudentSummary {
            nomor_induk: self.nomor_induk.clone(),
            nama_lengkap: self.nama_lengkap(),
            usia: self.usia(today),
        }
    }
}

/// Full years from `from` to `to`, counting a year only once its anniversary
/// has been reached.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years - 1
    } else {
        years
    }
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub nomor_induk: String,
    pub nama_depan: String,
    pub nama_belakang: Option<String>,
    pub nama_lengkap: String,
    pub tanggal_lahir: NaiveDate,
    pub usia: u32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub nomor_induk: String,
    pub nama_lengkap: String,
    pub usia: u32,
}

/// Create/update body. Every field is optional at the JSON level so missing
/// fields surface as validation messages instead of a decode failure.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    pub nama_depan: Option<String>,
    pub nama_belakang: Option<String>,
    pub tanggal_lahir: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data,
        }
    }

    pub fn created(message: &str, data: T) -> Self {
        Self {
            status: "created".to_string(),
            message: message.to_string(),
            data,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationMeta {
    pub fn new(current_page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(page_size)) as u32;
        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
            has_next: current_page.saturating_add(1) < total_pages,
            has_previous: current_page > 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Vec<T>,
    pub meta: PaginationMeta,
    pub timestamp: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: NaiveDateTime,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(last: Option<&str>) -> StudentRecord {
        let at = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        StudentRecord {
            nomor_induk: "2026001".to_string(),
            nama_depan: "Budi".to_string(),
            nama_belakang: last.map(str::to_string),
            tanggal_lahir: NaiveDate::from_ymd_opt(2000, 5, 17).unwrap(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn full_name_skips_blank_last_name() {
        assert_eq!(record(None).nama_lengkap(), "Budi");
        assert_eq!(record(Some("  ")).nama_lengkap(), "Budi");
        assert_eq!(record(Some("Santoso")).nama_lengkap(), "Budi Santoso");
    }

    #[test]
    fn age_counts_completed_years() {
        let r = record(None);
        assert_eq!(r.usia(NaiveDate::from_ymd_opt(2026, 5, 16).unwrap()), 25);
        assert_eq!(r.usia(NaiveDate::from_ymd_opt(2026, 5, 17).unwrap()), 26);
    }

    #[test]
    fn student_serializes_to_wire_names() {
        let json = serde_json::to_value(record(Some("Santoso")).detail(today())).unwrap();
        assert_eq!(json["nomorInduk"], "2026001");
        assert_eq!(json["namaLengkap"], "Budi Santoso");
        assert_eq!(json["tanggalLahir"], "2000-05-17");
    }

    #[test]
    fn pagination_meta_flags() {
        let meta = PaginationMeta::new(0, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_previous);

        let meta = PaginationMeta::new(2, 10, 25);
        assert!(!meta.has_next);
        assert!(meta.has_previous);

        let meta = PaginationMeta::new(0, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
    }

    #[test]
    fn request_fields_are_optional() {
        let req: StudentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.nama_depan.is_none());
        assert!(req.tanggal_lahir.is_none());
    }
}
