//! Screen-level state machines for the list, detail, create, and edit routes.
//!
//! # Design
//! Pages own navigation and presentation decisions but never render. Each
//! load resolves to `Load::{Loading, Ready, Failed}`; each form submission
//! resolves to a `SubmitOutcome` the shell turns into a redirect, an inline
//! error panel, or field messages. Every error is recovered here.

use std::fmt;

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::http::Transport;
use crate::params::{ListParams, SearchParams, Sort, DEFAULT_PAGE_SIZE};
use crate::queries::{QueryResult, StudentQueries};
use crate::route::Route;
use crate::types::{PageMeta, Student, StudentFormData, StudentListItem};
use crate::validation::{validate, FieldErrors};

#[derive(Debug, Clone)]
pub enum Load<T> {
    Loading,
    Ready(T),
    Failed(ErrorPanel),
}

impl<T> Load<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Error block shown in place of, or above, page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub title: String,
    pub message: String,
    pub errors: Vec<String>,
}

impl ErrorPanel {
    pub fn from_error(title: &str, err: &ApiError) -> Self {
        Self {
            title: title.to_string(),
            message: err.message(),
            errors: err.validation_errors().to_vec(),
        }
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient toast-style message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

fn resolve<T, U>(result: QueryResult<T>, title: &str, ready: impl FnOnce(T) -> U) -> Load<U> {
    match result {
        QueryResult::Ready(value) => Load::Ready(ready(value)),
        QueryResult::Failed(err) => Load::Failed(ErrorPanel::from_error(title, &err)),
        QueryResult::Disabled => Load::Loading,
    }
}

const LOAD_FAILED: &str = "Failed to load data";

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteDialog {
    #[default]
    Closed,
    Open {
        nomor_induk: String,
        nama_lengkap: String,
    },
}

/// What the list screen renders once its active query resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<StudentListItem>,
    pub meta: PageMeta,
    pub searching: bool,
    /// Set when there are no rows.
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListPage {
    page: u32,
    size: u32,
    sort: Sort,
    keyword: String,
    delete_dialog: DeleteDialog,
}

impl Default for ListPage {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListPage {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            size: page_size,
            sort: Sort::list_default(),
            keyword: String::new(),
            delete_dialog: DeleteDialog::Closed,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete_dialog
    }

    pub fn is_searching(&self) -> bool {
        !self.keyword.is_empty()
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = keyword.to_string();
        self.page = 0;
    }

    /// Column-header click.
    pub fn sort_by(&mut self, field: &str) {
        self.sort = self.sort.toggled(field);
        self.page = 0;
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
        self.page = 0;
    }

    pub fn go_to(&mut self, page: u32) {
        self.page = page;
    }

    pub fn list_params(&self) -> ListParams {
        ListParams {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    pub fn search_params(&self) -> Option<SearchParams> {
        self.is_searching().then(|| SearchParams {
            keyword: self.keyword.clone(),
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        })
    }

    /// Runs the list query unconditionally and the search query only while a
    /// keyword is set; the search result wins when it is active.
    pub fn load<T: Transport>(&self, queries: &mut StudentQueries<T>) -> Load<ListView> {
        let list = queries.students(&self.list_params());
        let active = match self.search_params() {
            Some(params) => queries.search_students(&params),
            None => list,
        };
        let searching = self.is_searching();
        let keyword = self.keyword.clone();
        resolve(active, LOAD_FAILED, |page| {
            let empty_message = page.data.is_empty().then(|| {
                if searching {
                    format!("No students match \"{keyword}\"")
                } else {
                    "No students yet. Add one to get started".to_string()
                }
            });
            ListView {
                rows: page.data.clone(),
                meta: page.meta,
                searching,
                empty_message,
            }
        })
    }

    pub fn open_delete(&mut self, item: &StudentListItem) {
        self.delete_dialog = DeleteDialog::Open {
            nomor_induk: item.nomor_induk.clone(),
            nama_lengkap: item.nama_lengkap.clone(),
        };
    }

    pub fn cancel_delete(&mut self) {
        self.delete_dialog = DeleteDialog::Closed;
    }

    /// Deletes the dialog's target. Success closes the dialog; failure keeps
    /// it open. Returns `None` when the dialog was not open.
    pub fn confirm_delete<T: Transport>(
        &mut self,
        queries: &mut StudentQueries<T>,
    ) -> Option<Notification> {
        let DeleteDialog::Open { nomor_induk, .. } = &self.delete_dialog else {
            return None;
        };
        let result = queries.delete_student(nomor_induk);
        if result.is_ok() {
            self.delete_dialog = DeleteDialog::Closed;
        }
        Some(delete_notification(&result))
    }
}

fn delete_notification<T>(result: &Result<T, ApiError>) -> Notification {
    match result {
        Ok(_) => Notification::success("Student deleted successfully"),
        Err(err) => {
            let message = err.message();
            Notification::error(if message.is_empty() {
                "Failed to delete student".to_string()
            } else {
                message
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Result of confirming a delete from the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub notification: Notification,
    /// Back to the list once the record is gone; `None` keeps the user here.
    pub redirect: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    nomor_induk: String,
    delete_dialog: DeleteDialog,
}

impl DetailPage {
    pub fn new(nomor_induk: &str) -> Self {
        Self {
            nomor_induk: nomor_induk.to_string(),
            delete_dialog: DeleteDialog::Closed,
        }
    }

    pub fn nomor_induk(&self) -> &str {
        &self.nomor_induk
    }

    pub fn delete_dialog(&self) -> &DeleteDialog {
        &self.delete_dialog
    }

    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::StudentDetail(id) => Some(Self::new(id)),
            _ => None,
        }
    }

    pub fn edit_route(&self) -> Route {
        Route::EditStudent(self.nomor_induk.clone())
    }

    pub fn load<T: Transport>(&self, queries: &mut StudentQueries<T>) -> Load<Student> {
        resolve(queries.student(&self.nomor_induk), LOAD_FAILED, |env| env.data.clone())
    }

    pub fn open_delete(&mut self, student: &Student) {
        self.delete_dialog = DeleteDialog::Open {
            nomor_induk: student.nomor_induk.clone(),
            nama_lengkap: student.nama_lengkap.clone(),
        };
    }

    pub fn cancel_delete(&mut self) {
        self.delete_dialog = DeleteDialog::Closed;
    }

    /// Deletes the shown record. The dialog closes either way; only a
    /// successful delete redirects to the list. Returns `None` when the
    /// dialog was not open.
    pub fn confirm_delete<T: Transport>(
        &mut self,
        queries: &mut StudentQueries<T>,
    ) -> Option<DeleteOutcome> {
        let DeleteDialog::Open { nomor_induk, .. } = std::mem::take(&mut self.delete_dialog) else {
            return None;
        };
        let result = queries.delete_student(&nomor_induk);
        Some(DeleteOutcome {
            notification: delete_notification(&result),
            redirect: result.is_ok().then_some(Route::StudentList),
        })
    }
}

// ---------------------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Client-side rules failed; no request was sent.
    Invalid(FieldErrors),
    /// The server rejected the write. Stay on the form.
    Rejected(ErrorPanel),
    Saved {
        student: Student,
        redirect: Route,
        notification: Notification,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CreatePage {
    error: Option<ErrorPanel>,
}

impl CreatePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel shown above the form after a rejected submission.
    pub fn error(&self) -> Option<&ErrorPanel> {
        self.error.as_ref()
    }

    pub fn submit<T: Transport>(
        &mut self,
        queries: &mut StudentQueries<T>,
        form: &StudentFormData,
        today: NaiveDate,
    ) -> SubmitOutcome {
        if let Err(errors) = validate(form, today) {
            return SubmitOutcome::Invalid(errors);
        }
        match queries.create_student(form) {
            Ok(created) => {
                self.error = None;
                let id = created.data.nomor_induk.clone();
                SubmitOutcome::Saved {
                    student: created.data,
                    redirect: Route::StudentDetail(id.clone()),
                    notification: Notification::success(format!(
                        "Student created with student number: {id}"
                    )),
                }
            }
            Err(err) => {
                let panel = ErrorPanel::from_error("Failed to create student", &err);
                self.error = Some(panel.clone());
                SubmitOutcome::Rejected(panel)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditPage {
    nomor_induk: String,
    error: Option<ErrorPanel>,
}

impl EditPage {
    pub fn new(nomor_induk: &str) -> Self {
        Self {
            nomor_induk: nomor_induk.to_string(),
            error: None,
        }
    }

    pub fn from_route(route: &Route) -> Option<Self> {
        match route {
            Route::EditStudent(id) => Some(Self::new(id)),
            _ => None,
        }
    }

    pub fn nomor_induk(&self) -> &str {
        &self.nomor_induk
    }

    pub fn error(&self) -> Option<&ErrorPanel> {
        self.error.as_ref()
    }

    /// Current record, converted into form input for editing.
    pub fn load<T: Transport>(&self, queries: &mut StudentQueries<T>) -> Load<StudentFormData> {
        resolve(queries.student(&self.nomor_induk), LOAD_FAILED, |env| {
            StudentFormData::from(&env.data)
        })
    }

    pub fn submit<T: Transport>(
        &mut self,
        queries: &mut StudentQueries<T>,
        form: &StudentFormData,
        today: NaiveDate,
    ) -> SubmitOutcome {
        if let Err(errors) = validate(form, today) {
            return SubmitOutcome::Invalid(errors);
        }
        match queries.update_student(&self.nomor_induk, form) {
            Ok(updated) => {
                self.error = None;
                SubmitOutcome::Saved {
                    student: updated.data,
                    redirect: Route::StudentDetail(self.nomor_induk.clone()),
                    notification: Notification::success("Student updated successfully"),
                }
            }
            Err(err) => {
                let panel = ErrorPanel::from_error("Failed to update student", &err);
                self.error = Some(panel.clone());
                SubmitOutcome::Rejected(panel)
            }
        }
    }
}
