//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with an in-memory
//! database, a temporary upload directory and a `wiremock` server standing in
//! for both the geocoding and the weather service.

// Not every test binary uses every helper.
#![allow(unused)]

use agritrust_server::{
    config, router,
    state::{build_app_state_with_provider, AppState},
};
use agritrust_test_utils::{setup_tracing, TestSetup};
use anyhow::Result;
use axum::serve;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use std::{fs::File, io::Write, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use wiremock::MockServer;

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub upload_dir: PathBuf,
    pub app_state: AppState,
    _work_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        setup_tracing();
        let mock_server = MockServer::start().await;

        let work_dir = tempdir()?;
        let upload_dir = work_dir.path().join("uploads");
        let config_path = work_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: ":memory:"
upload_dir: "{}"
geocoder:
  base_url: "{}"
  user_agent: "agritrust-test"
  timeout_secs: 5
weather:
  base_url: "{}"
  timeout_secs: 5
"#,
            upload_dir.display(),
            mock_server.uri(),
            mock_server.uri()
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(config_path.to_str())?;
        let setup = TestSetup::new().await?;
        let app_state = build_app_state_with_provider(config, setup.provider).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(server_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            upload_dir,
            app_state,
            _work_dir: work_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts `data` as the multipart `file` part to `path`.
    pub async fn upload(&self, path: &str, filename: &str, data: impl Into<Vec<u8>>) -> Result<Response> {
        let form = Form::new().part("file", Part::bytes(data.into()).file_name(filename.to_string()));
        self.post_form(path, form).await
    }

    pub async fn post_form(&self, path: &str, form: Form) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await?)
    }

    /// Number of files currently in the upload directory.
    pub fn stored_upload_count(&self) -> Result<usize> {
        Ok(std::fs::read_dir(&self.upload_dir)?.count())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
