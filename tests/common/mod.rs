//! Common test utilities for E2E tests
#![allow(dead_code)]

use chrono::Utc;
use conduit::data::{Article, EntityId};
use conduit::{config, AppState};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// HMAC secret shared with tests that need to forge or mint tokens
pub const TEST_TOKEN_SECRET: &str = "test-secret-key-32-bytes-long!!";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig { path: db_path },
            auth: config::AuthConfig {
                token_secret: TEST_TOKEN_SECRET.to_string(),
                token_ttl_seconds: 3600,
            },
            users: config::UsersConfig {
                default_image: "https://static.productionready.io/images/smiley-cyrus.jpg"
                    .to_string(),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router and spawn server in background
        let app = conduit::build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register an account through the API, returning its access token
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&serde_json::json!({
                "user": {
                    "username": username,
                    "email": email,
                    "password": password,
                }
            }))
            .send()
            .await
            .expect("registration request succeeds");
        assert_eq!(response.status(), 201, "registration failed");

        let body: serde_json::Value = response.json().await.expect("registration body");
        body["user"]["token"]
            .as_str()
            .expect("token in registration body")
            .to_string()
    }

    /// Seed an article directly in the store, authored by an existing user
    pub async fn seed_article(&self, slug: &str, author_username: &str) {
        let author = self
            .state
            .db
            .find_user_by_username(author_username)
            .await
            .unwrap()
            .expect("author exists");

        let article = Article {
            id: EntityId::new().0,
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            description: "a description".to_string(),
            body: "a body".to_string(),
            author_id: author.id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state.db.insert_article(&article).await.unwrap();
    }
}
