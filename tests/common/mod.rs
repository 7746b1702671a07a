use legal_aid::configuration::{get_configuration, Settings};
use serde_json::Value;
use sqlx::SqlitePool;
use std::net::TcpListener;
use tempfile::TempDir;

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
    pub output_dir: std::path::PathBuf,
    pub client: reqwest::Client,
    // removed together with the database and generated documents
    _workdir: TempDir,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sends a chat message and returns the assistant reply
    pub async fn chat(&self, user_id: &str, query: &str) -> String {
        let response = self
            .post_json(
                "/chat",
                &serde_json::json!({"user_query": query, "user_id": user_id}),
            )
            .await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.expect("Invalid JSON");
        body["response"].as_str().unwrap_or_default().to_string()
    }
}

pub async fn spawn_app_with_configuration(mut configuration: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let workdir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_dir = workdir.path().join("generated_documents");
    configuration.database.path = workdir.path().join("chat_history.db").display().to_string();
    configuration.documents.output_dir = output_dir.display().to_string();
    configuration.public_url = address.clone();

    let db_pool = legal_aid::db::connect(&configuration.database)
        .await
        .expect("Failed to open test database");

    let server = legal_aid::startup::run(listener, db_pool.clone(), configuration)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool,
        output_dir,
        client: reqwest::Client::new(),
        _workdir: workdir,
    }
}

pub async fn spawn_app() -> TestApp {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    // connectors always run as mocks in tests
    configuration.connectors = Default::default();
    spawn_app_with_configuration(configuration).await
}
