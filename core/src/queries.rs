//! Cached reads and invalidating writes for the student resource.
//!
//! # Design
//! Reads are keyed by operation name plus parameters (`QueryKey`) and served
//! from `QueryCache` while fresh. Writes go straight to the API and, only on
//! success, invalidate the reads they can have changed:
//!
//! | write  | invalidates                                   |
//! |--------|-----------------------------------------------|
//! | create | every `students` list key                     |
//! | update | the `student` key of the record, every list   |
//! | delete | every list key, every `searchStudents` key    |
//!
//! Invalidation only marks keys stale and notifies subscribers; the next read
//! of a stale key goes to the network.
//!
//! Every operation borrows `&mut self`, so one instance never has two reads
//! outstanding. Deduplication of identical in-flight reads is a `QueryCache`
//! feature for hosts that drive a cache from several consumers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::StudentApi;
use crate::cache::{Listener, QueryCache, SubscriptionId};
use crate::error::ApiError;
use crate::http::Transport;
use crate::params::{ListParams, SearchParams};
use crate::types::{ApiEnvelope, EmptyEnvelope, PagedEnvelope, Student, StudentFormData, StudentListItem};

pub type StudentPage = PagedEnvelope<StudentListItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Students,
    Student,
    SearchStudents,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Students => "students",
            QueryKind::Student => "student",
            QueryKind::SearchStudents => "searchStudents",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Students(ListParams),
    Student(String),
    SearchStudents(SearchParams),
}

impl QueryKey {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryKey::Students(_) => QueryKind::Students,
            QueryKey::Student(_) => QueryKind::Student,
            QueryKey::SearchStudents(_) => QueryKind::SearchStudents,
        }
    }
}

/// Which cached reads an invalidation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFilter {
    Kind(QueryKind),
    Exact(QueryKey),
}

impl QueryFilter {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            QueryFilter::Kind(kind) => key.kind() == *kind,
            QueryFilter::Exact(exact) => key == exact,
        }
    }
}

#[derive(Debug, Clone)]
pub enum QueryData {
    Page(Arc<StudentPage>),
    Student(Arc<ApiEnvelope<Student>>),
}

/// Outcome of a read.
#[derive(Debug, Clone)]
pub enum QueryResult<T> {
    /// The query's preconditions are not met (empty keyword or identity); no
    /// request was issued.
    Disabled,
    Ready(T),
    Failed(ApiError),
}

impl<T> QueryResult<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            QueryResult::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, QueryResult::Disabled)
    }
}

/// Time source for staleness checks.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct StudentQueries<T> {
    api: StudentApi<T>,
    cache: QueryCache<QueryKey, QueryData>,
    clock: Box<dyn Clock>,
}

impl<T: Transport> StudentQueries<T> {
    pub fn new(api: StudentApi<T>, stale_time: Duration) -> Self {
        Self::with_clock(api, stale_time, Box::new(SystemClock))
    }

    pub fn with_clock(api: StudentApi<T>, stale_time: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            api,
            cache: QueryCache::new(stale_time),
            clock,
        }
    }

    pub fn subscribe(&mut self, key: QueryKey, listener: Listener<QueryKey>) -> SubscriptionId {
        self.cache.subscribe(key, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cache.unsubscribe(id)
    }

    // -- reads -------------------------------------------------------------

    pub fn students(&mut self, params: &ListParams) -> QueryResult<Arc<StudentPage>> {
        let key = QueryKey::Students(params.clone());
        let api = &self.api;
        let result = fetch(&mut self.cache, self.clock.as_ref(), key, || {
            api.list(params).map(|page| QueryData::Page(Arc::new(page)))
        });
        map_result(result, as_page)
    }

    /// Disabled while `nomor_induk` is empty.
    pub fn student(&mut self, nomor_induk: &str) -> QueryResult<Arc<ApiEnvelope<Student>>> {
        if nomor_induk.is_empty() {
            return QueryResult::Disabled;
        }
        let key = QueryKey::Student(nomor_induk.to_string());
        let api = &self.api;
        let result = fetch(&mut self.cache, self.clock.as_ref(), key, || {
            api.get_one(nomor_induk)
                .map(|student| QueryData::Student(Arc::new(student)))
        });
        map_result(result, as_student)
    }

    /// Disabled while the keyword is empty.
    pub fn search_students(&mut self, params: &SearchParams) -> QueryResult<Arc<StudentPage>> {
        if params.keyword.is_empty() {
            return QueryResult::Disabled;
        }
        let key = QueryKey::SearchStudents(params.clone());
        let api = &self.api;
        let result = fetch(&mut self.cache, self.clock.as_ref(), key, || {
            api.search(params).map(|page| QueryData::Page(Arc::new(page)))
        });
        map_result(result, as_page)
    }

    // -- writes ------------------------------------------------------------

    pub fn create_student(
        &mut self,
        input: &StudentFormData,
    ) -> Result<ApiEnvelope<Student>, ApiError> {
        let created = self.api.create(input).inspect_err(log_write_failure("create"))?;
        info!(nomor_induk = %created.data.nomor_induk, "student created");
        self.invalidate(&QueryFilter::Kind(QueryKind::Students));
        Ok(created)
    }

    pub fn update_student(
        &mut self,
        nomor_induk: &str,
        input: &StudentFormData,
    ) -> Result<ApiEnvelope<Student>, ApiError> {
        let updated = self
            .api
            .update(nomor_induk, input)
            .inspect_err(log_write_failure("update"))?;
        info!(nomor_induk, "student updated");
        self.invalidate(&QueryFilter::Exact(QueryKey::Student(nomor_induk.to_string())));
        self.invalidate(&QueryFilter::Kind(QueryKind::Students));
        Ok(updated)
    }

    pub fn delete_student(&mut self, nomor_induk: &str) -> Result<EmptyEnvelope, ApiError> {
        let deleted = self
            .api
            .delete(nomor_induk)
            .inspect_err(log_write_failure("delete"))?;
        info!(nomor_induk, "student deleted");
        self.invalidate(&QueryFilter::Kind(QueryKind::Students));
        self.invalidate(&QueryFilter::Kind(QueryKind::SearchStudents));
        Ok(deleted)
    }

    pub fn invalidate(&mut self, filter: &QueryFilter) -> Vec<QueryKey> {
        let marked = self.cache.invalidate(|key| filter.matches(key));
        debug!(?filter, marked = marked.len(), "queries invalidated");
        marked
    }
}

fn fetch<F>(
    cache: &mut QueryCache<QueryKey, QueryData>,
    clock: &dyn Clock,
    key: QueryKey,
    request: F,
) -> QueryResult<QueryData>
where
    F: FnOnce() -> Result<QueryData, ApiError>,
{
    if let Some(hit) = cache.fresh(&key, clock.now()) {
        debug!(kind = key.kind().as_str(), "query served from cache");
        return QueryResult::Ready(hit);
    }
    // Reads take `&mut self`, so no other fetch for this key is outstanding.
    cache.begin_fetch(&key);
    match request() {
        Ok(data) => {
            cache.complete_fetch(&key, data.clone(), clock.now());
            QueryResult::Ready(data)
        }
        Err(err) => {
            cache.fail_fetch(&key);
            QueryResult::Failed(err)
        }
    }
}

fn map_result<U>(result: QueryResult<QueryData>, project: fn(QueryData) -> Option<U>) -> QueryResult<U> {
    match result {
        QueryResult::Disabled => QueryResult::Disabled,
        QueryResult::Failed(err) => QueryResult::Failed(err),
        QueryResult::Ready(data) => match project(data) {
            Some(value) => QueryResult::Ready(value),
            None => QueryResult::Failed(ApiError::Deserialization(
                "cached value has the wrong shape for this query".to_string(),
            )),
        },
    }
}

fn as_page(data: QueryData) -> Option<Arc<StudentPage>> {
    match data {
        QueryData::Page(page) => Some(page),
        QueryData::Student(_) => None,
    }
}

fn as_student(data: QueryData) -> Option<Arc<ApiEnvelope<Student>>> {
    match data {
        QueryData::Student(student) => Some(student),
        QueryData::Page(_) => None,
    }
}

fn log_write_failure(operation: &'static str) -> impl Fn(&ApiError) {
    move |err| warn!(operation, status = ?err.status(), error = %err, "student write rejected")
}
