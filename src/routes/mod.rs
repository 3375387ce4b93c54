//! Route definitions for the portfolio site.
//!
//! ## Routes
//!
//! - `GET /` - Home page with top projects and live status
//! - `GET /projects` - All non-fork repositories
//! - `GET /projects/{repo_name}` - One repository, matched ignoring case
//! - `GET /skills`, `/about`, `/testimonials` - Pages from configuration
//! - `GET /blog`, `GET /blog/{filename}` - Markdown posts
//! - `GET|POST /contact` - Contact form
//! - `GET|POST /upload` - Image upload
//! - `GET /health` - Health check (JSON)
//! - `/files/*` - Uploaded files; everything else falls through to the public directory

mod blog;
mod contact;
mod health;
mod pages;
mod projects;
mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::upload::{FILES_ROUTE, MAX_UPLOAD_BYTES};

pub use pages::TOP_REPOS;

/// Request body cap for uploads: the file limit plus room for multipart framing.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Build the complete site router.
pub fn router(state: AppState) -> Router {
    let paths = &state.config.paths;
    let not_found = pages::not_found.with_state(state.clone());

    let uploads = ServeDir::new(&paths.upload_dir).fallback(not_found.clone());
    let public = ServeDir::new(&paths.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found);

    Router::new()
        .route("/", get(pages::home))
        .route("/projects", get(projects::list))
        .route("/projects/{repo_name}", get(projects::detail))
        .route("/skills", get(pages::skills))
        .route("/about", get(pages::about))
        .route("/testimonials", get(pages::testimonials))
        .route("/blog", get(blog::summary))
        .route("/blog/{filename}", get(blog::post))
        .route("/contact", get(contact::form).post(contact::submit))
        .route(
            "/upload",
            get(pages::upload_form)
                .post(upload::receive)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/health", get(health::health_check))
        .nest_service(FILES_ROUTE, uploads)
        .fallback_service(public)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::cache::{RepositoryPage, RepositorySource};
    use crate::config::{Config, ContentPaths};
    use crate::contact::{ContactForm, Mailer};
    use crate::error::Result;
    use crate::github::{Repository, prepare_page};
    use crate::twitch::{LiveStatus, LiveStatusSource};

    struct FixedRepos(Vec<Repository>);

    #[async_trait]
    impl RepositorySource for FixedRepos {
        async fn fetch_page(&self, page: u32, _per_page: u32) -> Result<RepositoryPage> {
            let raw = if page == 1 { self.0.clone() } else { Vec::new() };
            Ok(RepositoryPage {
                received: raw.len(),
                repos: prepare_page(raw),
            })
        }
    }

    struct Live;

    #[async_trait]
    impl LiveStatusSource for Live {
        async fn live_status(&self) -> Option<LiveStatus> {
            Some(LiveStatus::from_stream_count(1))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, _form: &ContactForm) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Harness {
        dir: TempDir,
        mailer: Arc<RecordingMailer>,
        state: AppState,
    }

    impl Harness {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let paths = ContentPaths {
                public_dir: dir.path().join("public"),
                blog_dir: dir.path().join("posts"),
                upload_dir: dir.path().join("uploads"),
            };
            std::fs::create_dir_all(&paths.public_dir).unwrap();
            std::fs::create_dir_all(&paths.blog_dir).unwrap();

            let mut config = Config {
                paths,
                ..Default::default()
            };
            config.site.site_name = "Test Site".to_string();
            config.site.github_username = "tester".to_string();
            config.site.twitch_username = "tester".to_string();

            let repos = vec![
                repo("alpha", 1, false),
                repo("myrepo", 50, false),
                repo("beta", 20, false),
                repo("forked", 99, true),
                repo("gamma", 10, false),
                repo("delta", 5, false),
            ];
            let mailer = Arc::new(RecordingMailer::default());
            let state = AppState::new(
                config,
                Arc::new(FixedRepos(repos)),
                Some(Arc::new(Live)),
                mailer.clone(),
            );
            Self { dir, mailer, state }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            router(self.state.clone()).oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }
    }

    fn repo(name: &str, stars: u64, fork: bool) -> Repository {
        Repository {
            name: name.to_string(),
            stargazers_count: stars,
            fork,
            html_url: format!("https://github.com/tester/{name}"),
            ..Default::default()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn contact_request(body: &str) -> Request<Body> {
        Request::post("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(filename: &str, data: &[u8]) -> Request<Body> {
        let boundary = "folio-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_home_shows_top_four_and_live_status() {
        let harness = Harness::new();
        let response = harness.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Currently streaming!"));
        for name in ["myrepo", "beta", "gamma", "delta"] {
            assert!(html.contains(&format!("/projects/{name}")), "missing {name}");
        }
        assert!(!html.contains("/projects/alpha"));
        assert!(!html.contains("/projects/forked"));
    }

    #[tokio::test]
    async fn test_projects_lists_all_non_forks() {
        let harness = Harness::new();
        let html = body_text(harness.get("/projects").await).await;
        assert!(html.contains("5 repositories"));
        assert!(html.contains("/projects/alpha"));
        assert!(!html.contains("/projects/forked"));
    }

    #[tokio::test]
    async fn test_project_detail_ignores_case() {
        let harness = Harness::new();
        let response = harness.get("/projects/MyRepo").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("https://github.com/tester/myrepo"));
    }

    #[tokio::test]
    async fn test_project_detail_missing_is_404() {
        let harness = Harness::new();
        let response = harness.get("/projects/forked").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Nothing here"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let harness = Harness::new();
        let response = harness.get("/no/such/page").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<h1>404</h1>"));
    }

    #[tokio::test]
    async fn test_static_files_served_from_public_dir() {
        let harness = Harness::new();
        std::fs::write(
            harness.dir.path().join("public").join("robots.txt"),
            "User-agent: *\n",
        )
        .unwrap();

        let response = harness.get("/robots.txt").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "User-agent: *\n");
    }

    #[tokio::test]
    async fn test_blog_lists_newest_first_and_renders_post() {
        let harness = Harness::new();
        let posts = harness.dir.path().join("posts");
        std::fs::write(posts.join("early.md"), "# Early Post\nDate: 2024-01-01\n").unwrap();
        std::fs::write(posts.join("later.md"), "# Later Post\nDate: 2024-06-01\n").unwrap();

        let html = body_text(harness.get("/blog").await).await;
        let later = html.find("Later Post").unwrap();
        let early = html.find("Early Post").unwrap();
        assert!(later < early);

        let response = harness.get("/blog/early").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<h1>Early Post</h1>"));

        assert_eq!(
            harness.get("/blog/missing").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_contact_blank_field_rerenders_with_error() {
        let harness = Harness::new();
        let response = harness
            .send(contact_request("name=Ann&email=&message=Hello"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("All fields are required."));
        assert!(html.contains(r#"value="Ann""#));
        assert_eq!(harness.mailer.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_contact_without_form_body_is_validation_error() {
        let harness = Harness::new();
        let request = Request::post("/contact").body(Body::empty()).unwrap();
        let response = harness.send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("All fields are required."));
        assert_eq!(harness.mailer.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_contact_success_clears_form() {
        let harness = Harness::new();
        let response = harness
            .send(contact_request("name=Ann&email=ann%40example.com&message=Hello"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Your message has been sent successfully!"));
        assert!(!html.contains(r#"value="Ann""#));
        assert_eq!(harness.mailer.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upload_png_is_stored_and_served() {
        let harness = Harness::new();
        let response = harness.send(upload_request("shot.png", b"png-bytes")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        let url = json["fileUrl"].as_str().unwrap().to_string();
        let name = url.strip_prefix("/files/").unwrap();
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");

        let served = harness.get(&url).await;
        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(body_text(served).await, "png-bytes");
    }

    #[tokio::test]
    async fn test_upload_gif_is_rejected() {
        let harness = Harness::new();
        let response = harness.send(upload_request("anim.gif", b"GIF89a")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Invalid file type"));
    }

    #[tokio::test]
    async fn test_upload_oversize_is_rejected() {
        let harness = Harness::new();
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let response = harness.send(upload_request("big.jpg", &big)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let harness = Harness::new();
        let boundary = "b";
        let request = Request::post("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(format!("--{boundary}--\r\n")))
            .unwrap();
        let response = harness.send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_does_not_refresh() {
        let harness = Harness::new();
        let response = harness.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["repo_refreshes"], 0);
        assert!(json["repos_cached_at"].is_null());
    }

    #[tokio::test]
    async fn test_config_pages_render() {
        let harness = Harness::new();
        for uri in ["/skills", "/about", "/testimonials", "/contact", "/upload"] {
            assert_eq!(harness.get(uri).await.status(), StatusCode::OK, "{uri}");
        }
    }
}
