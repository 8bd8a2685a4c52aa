#![allow(dead_code)]

use doc_portal::config::{BackendSettings, ServerSettings, Settings, TelemetrySettings};
use doc_portal::startup::Application;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub backend: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the portal on a random port in front of a fresh mock backend.
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let backend_url = backend.uri();
        Self::spawn_with_backend_url(backend, backend_url).await
    }

    /// Spawn the portal pointing at `backend_url`, which need not be `backend`.
    pub async fn spawn_with_backend_url(backend: MockServer, backend_url: String) -> Self {
        Self::spawn_with(backend, backend_url, 5).await
    }

    /// Spawn the portal with a backend call timeout of `timeout_secs`.
    pub async fn spawn_with_timeout(timeout_secs: u64) -> Self {
        let backend = MockServer::start().await;
        let backend_url = backend.uri();
        Self::spawn_with(backend, backend_url, timeout_secs).await
    }

    async fn spawn_with(backend: MockServer, backend_url: String, timeout_secs: u64) -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            backend: BackendSettings {
                url: backend_url,
                timeout_secs,
            },
            telemetry: TelemetrySettings::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            backend,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// POST the request form the way HTMX does.
    pub async fn submit_form(&self, email: &str, document_name: &str) -> reqwest::Response {
        self.client
            .post(self.url("/request-document"))
            .header("HX-Request", "true")
            .form(&[("email", email), ("document_name", document_name)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Press Approve or Reject on the dashboard.
    pub async fn act(&self, action: &str, id: i64) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/admin/requests/{}/{}", id, action)))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Backend list response fixture.
pub fn request_list(rows: &[(i64, &str)]) -> serde_json::Value {
    json!(rows
        .iter()
        .map(|(id, status)| json!({
            "id": id,
            "email": format!("user{}@example.com", id),
            "document": format!("Rev-{}", id),
            "status": status,
        }))
        .collect::<Vec<_>>())
}

pub async fn mount_list(backend: &MockServer, rows: &[(i64, &str)], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/get-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_list(rows)))
        .expect(expected_calls)
        .mount(backend)
        .await;
}

/// An address nothing listens on, for network-failure cases.
pub fn unreachable_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
