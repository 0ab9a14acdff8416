//! One-call student operations over a `Transport`.
//!
//! `StudentApi` pairs the stateless `StudentClient` with whatever executes
//! requests, so callers that do not care about the build/parse split get a
//! plain `list`/`get_one`/`create`/`update`/`delete`/`search` surface.

use tracing::debug;

use crate::client::StudentClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::params::{ListParams, SearchParams};
use crate::types::{ApiEnvelope, EmptyEnvelope, PagedEnvelope, Student, StudentFormData, StudentListItem};

#[derive(Debug, Clone)]
pub struct StudentApi<T> {
    client: StudentClient,
    transport: T,
}

impl<T: Transport> StudentApi<T> {
    pub fn new(client: StudentClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn list(&self, params: &ListParams) -> Result<PagedEnvelope<StudentListItem>, ApiError> {
        let response = self.send(self.client.build_list(params))?;
        self.client.parse_list(response)
    }

    pub fn get_one(&self, nomor_induk: &str) -> Result<ApiEnvelope<Student>, ApiError> {
        let response = self.send(self.client.build_get(nomor_induk))?;
        self.client.parse_get(response)
    }

    pub fn create(&self, input: &StudentFormData) -> Result<ApiEnvelope<Student>, ApiError> {
        let response = self.send(self.client.build_create(input)?)?;
        self.client.parse_create(response)
    }

    pub fn update(
        &self,
        nomor_induk: &str,
        input: &StudentFormData,
    ) -> Result<ApiEnvelope<Student>, ApiError> {
        let response = self.send(self.client.build_update(nomor_induk, input)?)?;
        self.client.parse_update(response)
    }

    pub fn delete(&self, nomor_induk: &str) -> Result<EmptyEnvelope, ApiError> {
        let response = self.send(self.client.build_delete(nomor_induk))?;
        self.client.parse_delete(response)
    }

    pub fn search(&self, params: &SearchParams) -> Result<PagedEnvelope<StudentListItem>, ApiError> {
        let response = self.send(self.client.build_search(params))?;
        self.client.parse_search(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        let response = self.transport.execute(request)?;
        debug!(method, path = %path, status = response.status, "student api round-trip");
        Ok(response)
    }
}
