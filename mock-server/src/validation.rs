//! Authoritative acceptance rules for create and update bodies.
//!
//! Field rules produce `"<field>: <message>"` strings for a 400 "Validation
//! Failed" response. The age window is checked separately, after the record
//! to update has been found, and fails with a plain 400 "Bad Request".

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{years_between, StudentRequest};

pub const MIN_AGE: i32 = 17;
pub const MAX_AGE: i32 = 40;

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z \-]+$").expect("valid name regex"));

/// A request body that passed the field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudent {
    pub nama_depan: String,
    pub nama_belakang: Option<String>,
    pub tanggal_lahir: NaiveDate,
}

pub fn check_fields(req: &StudentRequest, today: NaiveDate) -> Result<ValidStudent, Vec<String>> {
    let mut errors = Vec::new();

    let nama_depan = req.nama_depan.clone().unwrap_or_default();
    if nama_depan.trim().is_empty() {
        errors.push("namaDepan: First name is required".to_string());
    } else {
        let len = nama_depan.chars().count();
        if !(2..=100).contains(&len) {
            errors.push("namaDepan: First name must be between 2-100 characters".to_string());
        }
        if !NAME.is_match(&nama_depan) {
            errors.push(
                "namaDepan: First name can only contain letters, spaces, and hyphens".to_string(),
            );
        }
    }

    let nama_belakang = req.nama_belakang.clone().filter(|s| !s.is_empty());
    if let Some(last) = &nama_belakang {
        if last.chars().count() > 100 {
            errors.push("namaBelakang: Last name maximum 100 characters".to_string());
        }
        if !NAME.is_match(last) {
            errors.push(
                "namaBelakang: Last name can only contain letters, spaces, and hyphens".to_string(),
            );
        }
    }

    let tanggal_lahir = match req.tanggal_lahir.as_deref() {
        None => {
            errors.push("tanggalLahir: Date of birth is required".to_string());
            None
        }
        Some(raw) if raw.trim().is_empty() => {
            errors.push("tanggalLahir: Date of birth is required".to_string());
            None
        }
        Some(raw) => match parse_iso_date(raw) {
            Some(date) if date < today => Some(date),
            Some(_) => {
                errors.push("tanggalLahir: Date of birth must be in the past".to_string());
                None
            }
            None => {
                errors.push("tanggalLahir: Invalid date format".to_string());
                None
            }
        },
    };

    match tanggal_lahir {
        Some(tanggal_lahir) if errors.is_empty() => Ok(ValidStudent {
            nama_depan,
            nama_belakang,
            tanggal_lahir,
        }),
        _ => Err(errors),
    }
}

/// Accepts exactly `YYYY-MM-DD`. chrono alone also takes unpadded fields
/// and a leading sign.
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Age window check; the message reports the computed age.
pub fn check_age(tanggal_lahir: NaiveDate, today: NaiveDate) -> Result<(), String> {
    let age = years_between(tanggal_lahir, today);
    if age < MIN_AGE {
        return Err(format!(
            "Student age must be at least {MIN_AGE} years (current age: {age} years)"
        ));
    }
    if age > MAX_AGE {
        return Err(format!(
            "Student age must be at most {MAX_AGE} years (current age: {age} years)"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn req(first: Option<&str>, last: Option<&str>, dob: Option<&str>) -> StudentRequest {
        StudentRequest {
            nama_depan: first.map(str::to_string),
            nama_belakang: last.map(str::to_string),
            tanggal_lahir: dob.map(str::to_string),
        }
    }

    #[test]
    fn valid_request_passes() {
        let valid = check_fields(&req(Some("Budi"), Some(""), Some("2000-05-17")), today()).unwrap();
        assert_eq!(valid.nama_depan, "Budi");
        assert!(valid.nama_belakang.is_none());
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let errors = check_fields(&req(None, None, None), today()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "namaDepan: First name is required",
                "tanggalLahir: Date of birth is required",
            ]
        );
    }

    #[test]
    fn pattern_and_date_rules() {
        let errors =
            check_fields(&req(Some("R2"), Some("D2"), Some("2027-01-01")), today()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "namaDepan: First name can only contain letters, spaces, and hyphens",
                "namaBelakang: Last name can only contain letters, spaces, and hyphens",
                "tanggalLahir: Date of birth must be in the past",
            ]
        );
    }

    #[test]
    fn non_canonical_dates_are_rejected() {
        for dob in ["2000-5-17", " 2000-05-17 ", "+2000-05-17", "2000/05/17", "2000-02-30"] {
            let errors = check_fields(&req(Some("Budi"), None, Some(dob)), today()).unwrap_err();
            assert_eq!(errors, vec!["tanggalLahir: Invalid date format"], "{dob:?}");
        }
        let errors = check_fields(&req(Some("Budi"), None, Some("   ")), today()).unwrap_err();
        assert_eq!(errors, vec!["tanggalLahir: Date of birth is required"]);
    }

    #[test]
    fn age_window_is_inclusive() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(check_age(d("2009-10-18"), today()).is_ok());
        assert!(check_age(d("1985-10-19"), today()).is_ok());
        assert_eq!(
            check_age(d("2009-10-19"), today()).unwrap_err(),
            "Student age must be at least 17 years (current age: 16 years)"
        );
        assert_eq!(
            check_age(d("1985-10-18"), today()).unwrap_err(),
            "Student age must be at most 40 years (current age: 41 years)"
        );
    }
}
