use axum::http::{self, Request, StatusCode};
use chrono::{Local, Months, NaiveDate};
use http_body_util::BodyExt;
use mock_server::{app, ApiResponse, ErrorResponse, PagedResponse, Student, StudentSummary};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn born_years_ago(years: u32) -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_sub_months(Months::new(years * 12))
        .unwrap()
}

fn student_body(first: &str, last: Option<&str>, dob: NaiveDate) -> String {
    serde_json::json!({
        "namaDepan": first,
        "namaBelakang": last,
        "tanggalLahir": dob.format("%Y-%m-%d").to_string(),
    })
    .to_string()
}

// --- list ---

#[tokio::test]
async fn list_students_empty() {
    let resp = app().oneshot(get_request("/api/students")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: PagedResponse<StudentSummary> = body_json(resp).await;
    assert_eq!(page.status, "success");
    assert_eq!(page.message, "Students retrieved successfully");
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total_items, 0);
    assert_eq!(page.meta.page_size, 10);
}

#[tokio::test]
async fn list_students_unknown_sort_field_returns_400() {
    let resp = app()
        .oneshot(get_request("/api/students?sort=password%2Casc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "Bad Request");
    assert_eq!(err.path, "/api/students");
}

#[tokio::test]
async fn list_students_unknown_sort_direction_returns_400() {
    let resp = app()
        .oneshot(get_request("/api/students?sort=nomorInduk%2Csideways"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.message, "Unknown sort direction: sideways");
}

#[tokio::test]
async fn health_reports_up() {
    let resp = app().oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], "UP");
}

// --- create ---

#[tokio::test]
async fn create_student_returns_201() {
    let body = student_body("Budi", Some("Santoso"), born_years_ago(20));
    let resp = app()
        .oneshot(json_request("POST", "/api/students", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: ApiResponse<Student> = body_json(resp).await;
    assert_eq!(created.status, "created");
    assert_eq!(created.message, "Student created successfully");
    assert_eq!(created.data.nama_lengkap, "Budi Santoso");
    assert_eq!(created.data.usia, 20);
    let year = Local::now().format("%Y").to_string();
    assert_eq!(created.data.nomor_induk, format!("{year}001"));
}

#[tokio::test]
async fn create_student_field_errors_return_400() {
    let body = r#"{"namaDepan":"B","tanggalLahir":"not-a-date"}"#;
    let resp = app()
        .oneshot(json_request("POST", "/api/students", body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.error, "Validation Failed");
    assert_eq!(err.message, "Invalid student data");
    assert_eq!(
        err.errors.unwrap(),
        vec![
            "namaDepan: First name must be between 2-100 characters",
            "tanggalLahir: Invalid date format",
        ]
    );
}

#[tokio::test]
async fn create_student_too_young_returns_400() {
    let body = student_body("Budi", None, born_years_ago(16));
    let resp = app()
        .oneshot(json_request("POST", "/api/students", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(
        err.message,
        "Student age must be at least 17 years (current age: 16 years)"
    );
    assert!(err.errors.is_none());
}

#[tokio::test]
async fn create_student_malformed_json_is_not_an_envelope() {
    let resp = app()
        .oneshot(json_request("POST", "/api/students", "{not json"))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<ErrorResponse>(&body).is_err());
}

// --- get ---

#[tokio::test]
async fn get_student_not_found() {
    let resp = app()
        .oneshot(get_request("/api/students/2026999"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorResponse = body_json(resp).await;
    assert_eq!(err.message, "Student with student number 2026999 not found");
    assert_eq!(err.path, "/api/students/2026999");
}

// --- update ---

#[tokio::test]
async fn update_student_not_found() {
    let body = student_body("Budi", None, born_years_ago(20));
    let resp = app()
        .oneshot(json_request("PUT", "/api/students/2026999", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_student_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/students/2026999")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- search ---

#[tokio::test]
async fn search_without_keyword_returns_400() {
    let resp = app()
        .oneshot(get_request("/api/students/search"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn student_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    let mut ids = Vec::new();
    for (first, last, age) in [("Budi", Some("Santoso"), 20), ("Ani", None, 25)] {
        let body = student_body(first, last, born_years_ago(age));
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/api/students", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: ApiResponse<Student> = body_json(resp).await;
        ids.push(created.data.nomor_induk);
    }
    assert_ne!(ids[0], ids[1]);

    // list, sorted by full name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/students?page=0&size=1&sort=namaLengkap%2Casc"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: PagedResponse<StudentSummary> = body_json(resp).await;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].nama_lengkap, "Ani");
    assert_eq!(page.meta.total_items, 2);
    assert_eq!(page.meta.total_pages, 2);
    assert!(page.meta.has_next);

    // search is case-insensitive over first and last name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/students/search?keyword=SANTO"))
        .await
        .unwrap();
    let found: PagedResponse<StudentSummary> = body_json(resp).await;
    assert_eq!(found.message, "Search completed successfully");
    assert_eq!(found.data.len(), 1);
    assert_eq!(found.data[0].nomor_induk, ids[0]);

    // update
    let body = student_body("Budi", Some("Hartono"), born_years_ago(22));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/api/students/{}", ids[0]), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: ApiResponse<Student> = body_json(resp).await;
    assert_eq!(updated.message, "Student updated successfully");
    assert_eq!(updated.data.nama_lengkap, "Budi Hartono");
    assert_eq!(updated.data.usia, 22);
    assert!(updated.data.updated_at >= updated.data.created_at);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/students/{}", ids[0]))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: ApiResponse<Option<serde_json::Value>> = body_json(resp).await;
    assert_eq!(deleted.message, "Student deleted successfully");
    assert!(deleted.data.is_none());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/api/students/{}", ids[0])))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // a new student never reuses a deleted number
    let body = student_body("Citra", None, born_years_ago(19));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/students", &body))
        .await
        .unwrap();
    let created: ApiResponse<Student> = body_json(resp).await;
    assert!(created.data.nomor_induk > ids[1]);
}
