//! Pre-submission validation of `StudentFormData`.
//!
//! These rules repeat the server's acceptance rules so the form can flag
//! problems before a request is sent. The server keeps its own copy and stays
//! authoritative; messages match by contract.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::types::StudentFormData;

pub const MIN_AGE: i32 = 17;
pub const MAX_AGE: i32 = 40;
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    DateOfBirth,
}

impl FormField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::FirstName => "namaDepan",
            FormField::LastName => "namaBelakang",
            FormField::DateOfBirth => "tanggalLahir",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::DateOfBirth => "Date of birth",
        }
    }
}

/// Violated rules per field, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: FormField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m.as_str())))
    }

    fn push(&mut self, field: FormField, message: &str) {
        self.0.entry(field).or_default().push(message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {message}", field.label())?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z \-]+$").expect("name pattern compiles"));

/// Whole years elapsed from `birth` to `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Validates `form` against the rules as of `today`.
pub fn validate(form: &StudentFormData, today: NaiveDate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_first_name(&form.nama_depan, &mut errors);
    if let Some(last) = form.last_name() {
        check_last_name(last, &mut errors);
    }
    check_birth_date(&form.tanggal_lahir, today, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates `form` as of the local calendar date.
pub fn validate_today(form: &StudentFormData) -> Result<(), FieldErrors> {
    validate(form, Local::now().date_naive())
}

fn check_first_name(value: &str, errors: &mut FieldErrors) {
    if value.trim().is_empty() {
        errors.push(FormField::FirstName, "First name is required");
        return;
    }
    let len = value.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        errors.push(FormField::FirstName, "First name must be between 2-100 characters");
    }
    if !NAME_PATTERN.is_match(value) {
        errors.push(
            FormField::FirstName,
            "First name can only contain letters, spaces, and hyphens",
        );
    }
}

fn check_last_name(value: &str, errors: &mut FieldErrors) {
    if value.chars().count() > NAME_MAX_LEN {
        errors.push(FormField::LastName, "Last name maximum 100 characters");
    }
    if !NAME_PATTERN.is_match(value) {
        errors.push(
            FormField::LastName,
            "Last name can only contain letters, spaces, and hyphens",
        );
    }
}

fn check_birth_date(value: &str, today: NaiveDate, errors: &mut FieldErrors) {
    if value.is_empty() {
        errors.push(FormField::DateOfBirth, "Date of birth is required");
        return;
    }
    let Some(birth) = parse_date(value) else {
        errors.push(FormField::DateOfBirth, "Invalid date format");
        return;
    };
    if birth >= today {
        errors.push(FormField::DateOfBirth, "Date of birth must be in the past");
        return;
    }
    let age = age_on(birth, today);
    if age < MIN_AGE {
        errors.push(FormField::DateOfBirth, "Minimum age is 17 years");
    } else if age > MAX_AGE {
        errors.push(FormField::DateOfBirth, "Maximum age is 40 years");
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn form(first: &str, last: Option<&str>, dob: &str) -> StudentFormData {
        StudentFormData::new(first, last, dob)
    }

    fn dob_errors(dob: &str) -> Vec<String> {
        match validate(&form("Budi", None, dob), today()) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.get(FormField::DateOfBirth).to_vec(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        assert!(validate(&form("Budi", Some("Santoso"), "2000-05-17"), today()).is_ok());
        assert!(validate(&form("Mary-Jane", Some(""), "2000-05-17"), today()).is_ok());
        assert!(validate(&form("Al", None, "2000-05-17"), today()).is_ok());
    }

    #[test]
    fn age_counts_whole_years() {
        let birth = NaiveDate::from_ymd_opt(2000, 10, 19).unwrap();
        assert_eq!(age_on(birth, today()), 25);
        let birth = NaiveDate::from_ymd_opt(2000, 10, 18).unwrap();
        assert_eq!(age_on(birth, today()), 26);
    }

    #[test]
    fn leap_day_birthday_waits_for_march() {
        let birth = NaiveDate::from_ymd_opt(2008, 2, 29).unwrap();
        let feb_28 = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let mar_1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(age_on(birth, feb_28), 16);
        assert_eq!(age_on(birth, mar_1), 17);
    }

    #[test]
    fn age_boundaries_are_inclusive() {
        // exactly 17 today
        assert!(dob_errors("2009-10-18").is_empty());
        // one day short of 17
        assert_eq!(dob_errors("2009-10-19"), vec!["Minimum age is 17 years"]);
        // 40, turning 41 tomorrow
        assert!(dob_errors("1985-10-19").is_empty());
        // exactly 41 today
        assert_eq!(dob_errors("1985-10-18"), vec!["Maximum age is 40 years"]);
    }

    #[test]
    fn date_must_be_strictly_past() {
        assert_eq!(dob_errors("2026-10-18"), vec!["Date of birth must be in the past"]);
        assert_eq!(dob_errors("2030-01-01"), vec!["Date of birth must be in the past"]);
    }

    #[test]
    fn date_must_parse() {
        assert_eq!(dob_errors(""), vec!["Date of birth is required"]);
        assert_eq!(dob_errors("2000-02-30"), vec!["Invalid date format"]);
        assert_eq!(dob_errors("17/05/2000"), vec!["Invalid date format"]);
        assert_eq!(dob_errors("2000-5-17"), vec!["Invalid date format"]);
    }

    #[test]
    fn first_name_rules() {
        let errors = validate(&form("", None, "2000-05-17"), today()).unwrap_err();
        assert_eq!(errors.get(FormField::FirstName), ["First name is required"]);
        let errors = validate(&form("   ", None, "2000-05-17"), today()).unwrap_err();
        assert_eq!(errors.get(FormField::FirstName), ["First name is required"]);

        let errors = validate(&form("B", None, "2000-05-17"), today()).unwrap_err();
        assert_eq!(
            errors.get(FormField::FirstName),
            ["First name must be between 2-100 characters"]
        );

        let long = "a".repeat(101);
        assert!(validate(&form(&long, None, "2000-05-17"), today()).is_err());
        let max = "a".repeat(100);
        assert!(validate(&form(&max, None, "2000-05-17"), today()).is_ok());

        let errors = validate(&form("B4", None, "2000-05-17"), today()).unwrap_err();
        assert_eq!(
            errors.get(FormField::FirstName),
            ["First name can only contain letters, spaces, and hyphens"]
        );
    }

    #[test]
    fn last_name_rules() {
        let long = "a".repeat(101);
        let errors = validate(&form("Budi", Some(&long), "2000-05-17"), today()).unwrap_err();
        assert_eq!(errors.get(FormField::LastName), ["Last name maximum 100 characters"]);

        let errors = validate(&form("Budi", Some("O'Neil"), "2000-05-17"), today()).unwrap_err();
        assert_eq!(
            errors.get(FormField::LastName),
            ["Last name can only contain letters, spaces, and hyphens"]
        );
    }

    #[test]
    fn every_violated_rule_is_reported() {
        let errors = validate(&form("1", Some("2"), "2026-12-01"), today()).unwrap_err();
        let all: Vec<(FormField, &str)> = errors.iter().collect();
        assert_eq!(
            all,
            vec![
                (FormField::FirstName, "First name must be between 2-100 characters"),
                (FormField::FirstName, "First name can only contain letters, spaces, and hyphens"),
                (FormField::LastName, "Last name can only contain letters, spaces, and hyphens"),
                (FormField::DateOfBirth, "Date of birth must be in the past"),
            ]
        );
        assert!(errors.to_string().starts_with("First name: First name must be"));
    }
}
