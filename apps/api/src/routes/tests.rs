use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::blob::InMemoryBlobStore;
use crate::board::views::NO_SEARCH_RESULTS;
use crate::config::Config;
use crate::identity::memory::InMemoryIdentityProvider;
use crate::identity::IdentityProvider;
use crate::models::{NewProfile, Role};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::seed::sample_listings;
use crate::store::{DocumentStore, InMemoryDocumentStore};

const BOUNDARY: &str = "jobboard-test-boundary";

struct Harness {
    app: Router,
    store: Arc<InMemoryDocumentStore>,
    blobs: Arc<InMemoryBlobStore>,
    identity: Arc<InMemoryIdentityProvider>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryDocumentStore::with_listings(sample_listings()));
        let blobs = Arc::new(InMemoryBlobStore::new());
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let app = build_router(AppState {
            store: store.clone(),
            blobs: blobs.clone(),
            identity: identity.clone(),
            config: Config::for_tests(),
        });
        Self {
            app,
            store,
            blobs,
            identity,
        }
    }

    /// Account plus stored profile; returns the bearer token.
    async fn user(&self, uid: &str, role: Role) -> String {
        let email = format!("{uid}@example.com");
        let token = self.identity.register(uid, &email).await;
        self.store
            .create_profile(NewProfile {
                uid: uid.to_string(),
                display_name: uid.to_string(),
                email,
                role,
            })
            .await
            .unwrap();
        token
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post_listing(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .send(json_request(Method::POST, "/api/v1/listings", Some(token), draft(title)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

fn draft(title: &str) -> Value {
    json!({
        "title": title,
        "company": "TechCorp",
        "location": "Remote",
        "work_mode": "remote",
        "category": "Technology",
        "salary_min": 90000,
        "salary_max": 120000,
        "salary_currency": "$",
        "description": "Build things",
        "requirements": "3+ years",
        "deadline": "2099-12-31"
    })
}

fn titles(body: &Value) -> Vec<&str> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect()
}

// ─── Search ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let h = Harness::new();
    let (status, body) = h.send(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "jobboard-api");
}

#[tokio::test]
async fn test_search_by_mode_and_salary_window() {
    let h = Harness::new();
    let (status, body) = h
        .send(get(
            "/api/v1/listings?mode=remote&min_salary=0&max_salary=200000",
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "populated");
    assert_eq!(body["active_filters"], 2);
    assert_eq!(body["total"], 8);
    assert_eq!(titles(&body), vec!["UI/UX Designer", "Senior Frontend Developer"]);
}

#[tokio::test]
async fn test_search_salary_is_fully_within() {
    let h = Harness::new();
    let (status, body) = h
        .send(get("/api/v1/listings?min_salary=0&max_salary=100000", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "empty");
    assert_eq!(body["message"], NO_SEARCH_RESULTS);
}

#[tokio::test]
async fn test_search_without_criteria_returns_everything_active() {
    let h = Harness::new();
    let (_, body) = h.send(get("/api/v1/listings?mode=all", None)).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 8);
    assert_eq!(body["active_filters"], 0);
}

#[tokio::test]
async fn test_search_rejects_inverted_bounds() {
    let h = Harness::new();
    let (status, body) = h
        .send(get("/api/v1/listings?min_salary=200000&max_salary=100000", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_highlights() {
    let h = Harness::new();
    let (status, body) = h.send(get("/api/v1/listings/highlights", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["featured"].as_array().unwrap().len(), 3);
    assert_eq!(body["featured"][0]["title"], "DevOps Engineer");
    assert_eq!(body["recent"].as_array().unwrap().len(), 6);
    assert_eq!(body["categories"].as_array().unwrap().len(), 8);
}

// ─── Listing management ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_only_employers_post_listings() {
    let h = Harness::new();
    let seeker = h.user("seeker-1", Role::JobSeeker).await;

    let (status, _) = h
        .send(json_request(Method::POST, "/api/v1/listings", None, draft("Rust Engineer")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/listings",
            Some(&seeker),
            draft("Rust Engineer"),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_invalid_draft_lists_field_errors() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let mut body = draft("");
    body["salary_min"] = json!(150000);

    let (status, body) = h
        .send(json_request(Method::POST, "/api/v1/listings", Some(&employer), body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "salary_max"]);
}

#[tokio::test]
async fn test_new_listing_is_active_and_accepting() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let created = h.post_listing(&employer, "Rust Engineer").await;
    assert_eq!(created["status"], "active");
    assert_eq!(created["posted_by"], "emp-1");

    let id = created["id"].as_str().unwrap();
    let (status, body) = h.send(get(&format!("/api/v1/listings/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepting_applications"], true);
    assert_eq!(body["title"], "Rust Engineer");
}

#[tokio::test]
async fn test_status_change_moves_listing_between_tabs() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    h.post_listing(&employer, "Go Engineer").await;

    let (status, body) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/listings/{id}/status"),
            Some(&employer),
            json!({ "status": "hired" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["listing"]["status"], "hired");
    assert_eq!(body["tab"], "active");
    assert_eq!(titles(&body), vec!["Go Engineer"]);
    assert_eq!(body["counts"]["hired"], 1);
    assert_eq!(body["counts"]["active"], 1);

    let (_, hired) = h
        .send(get("/api/v1/me/listings?status=hired", Some(&employer)))
        .await;
    assert_eq!(titles(&hired), vec!["Rust Engineer"]);

    let (status, body) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/listings/{id}/status"),
            Some(&employer),
            json!({ "status": "active" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ILLEGAL_TRANSITION");
}

#[tokio::test]
async fn test_listing_due_today_still_takes_applications() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let mut body = draft("Rust Engineer");
    body["deadline"] = json!(chrono::Utc::now().date_naive().to_string());

    let (status, created) = h
        .send(json_request(Method::POST, "/api/v1/listings", Some(&employer), body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_str().unwrap();

    let (_, detail) = h.send(get(&format!("/api/v1/listings/{id}"), None)).await;
    assert_eq!(detail["accepting_applications"], true);

    let (status, _) = h
        .send(multipart(
            &format!("/api/v1/listings/{id}/applications"),
            &seeker,
            &[Part::Text("cover_letter", "Hello")],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_foreign_listing_is_not_found() {
    let h = Harness::new();
    let owner = h.user("emp-1", Role::Employer).await;
    let other = h.user("emp-2", Role::Employer).await;
    let id = h.post_listing(&owner, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/listings/{id}/status"),
            Some(&other),
            json!({ "status": "closed" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = h
        .send(json_request(
            Method::PUT,
            &format!("/api/v1/listings/{id}"),
            Some(&other),
            draft("Hijacked"),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = h
        .send(get(&format!("/api/v1/listings/{id}/applications"), Some(&other)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_edits_listing() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = h
        .send(json_request(
            Method::PUT,
            &format!("/api/v1/listings/{id}"),
            Some(&employer),
            draft("Senior Rust Engineer"),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Senior Rust Engineer");
    assert!(!body["updated_at"].is_null());
}

// ─── Applications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_application_lifecycle() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let apply_uri = format!("/api/v1/listings/{listing_id}/applications");

    let (status, application) = h
        .send(multipart(
            &apply_uri,
            &seeker,
            &[
                Part::Text("cover_letter", "I love Rust"),
                Part::File("resume", "cv.pdf", "application/pdf", b"%PDF-1.4"),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{application}");
    assert_eq!(application["status"], "pending");
    assert_eq!(application["applicant_name"], "seeker-1");
    assert_eq!(application["cover_letter"], "I love Rust");
    let resume_key = format!("resumes/seeker-1/{listing_id}/cv.pdf");
    assert_eq!(application["resume_url"], format!("memory://{resume_key}"));
    assert!(h.blobs.get(&resume_key).await.is_some());

    let (status, body) = h.send(multipart(&apply_uri, &seeker, &[Part::Text("cover_letter", "Again")])).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, applicants) = h.send(get(&apply_uri, Some(&employer))).await;
    assert_eq!(applicants["tab"], "pending");
    assert_eq!(applicants["items"].as_array().unwrap().len(), 1);

    let application_id = application["id"].as_str().unwrap();
    let (status, body) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&employer),
            json!({ "status": "accepted" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["application"]["status"], "accepted");
    assert_eq!(body["state"], "empty");
    assert_eq!(body["message"], "No pending applications");

    let (_, mine) = h
        .send(get("/api/v1/me/applications?status=accepted", Some(&seeker)))
        .await;
    assert_eq!(mine["items"].as_array().unwrap().len(), 1);
    assert_eq!(mine["listings"][listing_id.as_str()]["title"], "Rust Engineer");

    let (status, body) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&employer),
            json!({ "status": "pending" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ILLEGAL_TRANSITION");
}

#[tokio::test]
async fn test_only_listing_owner_moves_applications() {
    let h = Harness::new();
    let owner = h.user("emp-1", Role::Employer).await;
    let other = h.user("emp-2", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&owner, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let (_, application) = h
        .send(multipart(
            &format!("/api/v1/listings/{listing_id}/applications"),
            &seeker,
            &[Part::Text("cover_letter", "Hello")],
        ))
        .await;
    let application_id = application["id"].as_str().unwrap();

    let (status, _) = h
        .send(json_request(
            Method::PATCH,
            &format!("/api/v1/applications/{application_id}/status"),
            Some(&other),
            json!({ "status": "reviewed" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdraw_is_idempotent() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let (_, application) = h
        .send(multipart(
            &format!("/api/v1/listings/{listing_id}/applications"),
            &seeker,
            &[Part::Text("cover_letter", "Hello")],
        ))
        .await;
    let uri = format!("/api/v1/applications/{}", application["id"].as_str().unwrap());

    let (status, _) = h.send(delete(&uri, &seeker)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = h.send(delete(&uri, &seeker)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let remaining = h.store.list_applications_by_applicant("seeker-1").await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_closed_listing_refuses_applications() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    h.send(json_request(
        Method::PATCH,
        &format!("/api/v1/listings/{listing_id}/status"),
        Some(&employer),
        json!({ "status": "closed" }),
    ))
    .await;

    let (status, _) = h
        .send(multipart(
            &format!("/api/v1/listings/{listing_id}/applications"),
            &seeker,
            &[Part::Text("cover_letter", "Hello")],
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_resume_upload_rules() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/v1/listings/{listing_id}/applications");

    let oversized = vec![b'x'; 2048];
    let (status, body) = h
        .send(multipart(
            &uri,
            &seeker,
            &[Part::File("resume", "cv.pdf", "application/pdf", &oversized)],
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "resume");

    let (status, _) = h
        .send(multipart(
            &uri,
            &seeker,
            &[Part::File("resume", "cv.exe", "application/x-msdownload", b"MZ")],
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h
        .store
        .list_applications_for_listing(listing_id.parse().unwrap())
        .await
        .unwrap()
        .is_empty());
}

// ─── Accounts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_up_then_session() {
    let h = Harness::new();
    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            json!({
                "email": "jane@example.com",
                "password": "secret1",
                "display_name": "Jane",
                "role": "employer"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["role"], "employer");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, session) = h.send(get("/api/v1/auth/session", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["loading"], false);
    assert_eq!(session["user"]["display_name"], "Jane");

    let (status, _) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            json!({ "email": "jane@example.com", "password": "wrong-password" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            json!({ "email": "jane@example.com", "password": "secret1" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "employer");
}

#[tokio::test]
async fn test_password_sign_in_never_creates_a_profile() {
    let h = Harness::new();
    let account = h
        .identity
        .sign_up("boss@example.com", "secret1", "Boss")
        .await
        .unwrap()
        .account;

    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            json!({ "email": "boss@example.com", "password": "secret1" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["loading"], true);
    assert!(body["user"].is_null());
    assert!(h.store.get_profile(&account.uid).await.unwrap().is_none());

    let token = body["token"].as_str().unwrap();
    let (status, session) = h.send(get("/api/v1/auth/session", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["loading"], true);

    let (status, _) = h.send(get("/api/v1/dashboard", Some(token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let h = Harness::new();
    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            json!({
                "email": "jane@example.com",
                "password": "12345",
                "display_name": "Jane",
                "role": "jobSeeker"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_anonymous_session_and_bad_token() {
    let h = Harness::new();
    let (status, session) = h.send(get("/api/v1/auth/session", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(session["user"].is_null());

    let (status, _) = h
        .send(get("/api/v1/auth/session", Some("token-nobody")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_federated_sign_in_defaults_to_job_seeker() {
    let h = Harness::new();
    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in/federated",
            None,
            json!({ "provider_id": "google.com", "id_token": "sam@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "jobSeeker");
    assert_eq!(body["user"]["display_name"], "sam");
}

#[tokio::test]
async fn test_email_link_sign_in() {
    let h = Harness::new();
    let (status, _) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in/link",
            None,
            json!({ "email": "lee@example.com" }),
        ))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        h.identity.links_sent().await,
        vec![(
            "lee@example.com".to_string(),
            "http://localhost:5173/auth".to_string()
        )]
    );

    let (status, body) = h
        .send(json_request(
            Method::POST,
            "/api/v1/auth/sign-in/link/complete",
            None,
            json!({ "email": "lee@example.com", "code": "code-lee@example.com", "role": "employer" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "employer");
}

#[tokio::test]
async fn test_profile_update_keeps_company_for_employers_only() {
    let h = Harness::new();
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let employer = h.user("emp-1", Role::Employer).await;
    let update = json!({
        "display_name": "  Updated  ",
        "profile": {
            "title": "Engineer",
            "skills": ["rust", "sql"],
            "company": { "company_name": "TechCorp" }
        }
    });

    let (status, body) = h
        .send(json_request(Method::PUT, "/api/v1/profile", Some(&seeker), update.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["display_name"], "Updated");
    assert_eq!(body["profile"]["skills"], json!(["rust", "sql"]));
    assert!(body["profile"]["company"].is_null());

    let (_, body) = h
        .send(json_request(Method::PUT, "/api/v1/profile", Some(&employer), update))
        .await;
    assert_eq!(body["profile"]["company"]["company_name"], "TechCorp");
}

#[tokio::test]
async fn test_avatar_upload_sets_photo_url() {
    let h = Harness::new();
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let (status, body) = h
        .send(multipart(
            "/api/v1/profile/avatar",
            &seeker,
            &[Part::File("avatar", "me.png", "image/png", b"\x89PNG")],
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["photo_url"], "memory://avatars/seeker-1");

    let (_, profile) = h.send(get("/api/v1/profile", Some(&seeker))).await;
    assert_eq!(profile["photo_url"], "memory://avatars/seeker-1");
}

// ─── Dashboard ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_is_tagged_by_role() {
    let h = Harness::new();
    let employer = h.user("emp-1", Role::Employer).await;
    let seeker = h.user("seeker-1", Role::JobSeeker).await;
    let listing_id = h.post_listing(&employer, "Rust Engineer").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    h.send(multipart(
        &format!("/api/v1/listings/{listing_id}/applications"),
        &seeker,
        &[Part::Text("cover_letter", "Hello")],
    ))
    .await;

    let (status, body) = h.send(get("/api/v1/dashboard", Some(&employer))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "employer");
    assert_eq!(body["applications_received"], 1);
    assert_eq!(body["open_listings"], 1);
    assert_eq!(body["listings"]["counts"]["active"], 1);

    let (_, body) = h.send(get("/api/v1/dashboard", Some(&seeker))).await;
    assert_eq!(body["role"], "jobSeeker");
    assert_eq!(body["applications"]["tab"], "pending");
    assert_eq!(body["applications"]["counts"]["pending"], 1);

    let (status, _) = h.send(get("/api/v1/dashboard", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
