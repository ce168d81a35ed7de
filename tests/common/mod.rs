use std::sync::{Arc, Once};
use uuid::Uuid;
use vision_qa_service::config::VisionQaConfig;
use vision_qa_service::services::init_metrics;
use vision_qa_service::services::providers::{MockVisionProvider, VisionProvider};
use vision_qa_service::startup::Application;

pub const DEFAULT_MOCK_ANSWER: &str = "A red apple on a table.";

// Initialize metrics once for all tests
static INIT_METRICS: Once = Once::new();

fn ensure_metrics_initialized() {
    INIT_METRICS.call_once(|| {
        init_metrics();
    });
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: String,
    pub public_dir: String,
    client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with a provider that always answers
    /// [`DEFAULT_MOCK_ANSWER`].
    pub async fn spawn() -> Self {
        Self::spawn_with_provider(Arc::new(MockVisionProvider::replying(DEFAULT_MOCK_ANSWER)))
            .await
    }

    pub async fn spawn_with_provider(provider: Arc<dyn VisionProvider>) -> Self {
        ensure_metrics_initialized();

        let upload_dir = format!("target/test-uploads-{}", Uuid::new_v4());
        let public_dir = format!("target/test-public-{}", Uuid::new_v4());
        tokio::fs::create_dir_all(&public_dir)
            .await
            .expect("Failed to create public directory");

        let mut config = VisionQaConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.storage.upload_dir = upload_dir.clone();
        config.static_assets.public_dir = public_dir.clone();

        let app = Application::build_with_provider(config, provider)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(app.run_until_stopped());

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            upload_dir,
            public_dir,
            client,
        }
    }

    /// POST /upload with the given fields, omitting absent ones.
    pub async fn post_upload(
        &self,
        question: Option<&str>,
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> reqwest::Response {
        let mut form = reqwest::multipart::Form::new();
        if let Some(question) = question {
            form = form.text("question", question.to_string());
        }
        if let Some((filename, mime_type, data)) = file {
            form = form.part(
                "file",
                reqwest::multipart::Part::bytes(data)
                    .file_name(filename.to_string())
                    .mime_str(mime_type)
                    .unwrap(),
            );
        }

        self.client
            .post(format!("{}/upload", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Number of files currently left in the upload directory.
    pub async fn residual_upload_count(&self) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.upload_dir).await {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut count = 0;
        while let Ok(Some(_)) = entries.next_entry().await {
            count += 1;
        }
        count
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
        let _ = tokio::fs::remove_dir_all(&self.public_dir).await;
    }
}
