//! Background worker for gateway HTTP operations.
//!
//! All network I/O happens here, in a separate tokio task, so the UI loop
//! never blocks on the gateway. The worker receives [`Command`]s from the
//! UI and answers with [`GateEvent`]s; a failed request produces a log line
//! and no event, leaving the UI's state untouched. Updates and commands are
//! fire-and-forget: a failure leaves the optimistic local state and the
//! backend inconsistent until the next full refetch reconciles them.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use sbergate_api::GateClient;

use super::messages::{Command, GateEvent};

/// Background worker that talks to the gateway's REST API.
pub struct GateWorker {
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<GateEvent>,
    /// Gateway API client.
    client: GateClient,
}

impl GateWorker {
    /// Create a new worker.
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<GateEvent>,
        client: GateClient,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            client,
        }
    }

    /// Run the worker's main loop.
    ///
    /// Consumes the worker and runs until a [`Command::Shutdown`] arrives
    /// or the command channel closes.
    pub async fn run(mut self) {
        info!(url = %self.client.base_url(), "GateWorker started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Shutdown => {
                    info!("GateWorker received shutdown command");
                    break;
                }
                cmd => self.handle_command(cmd).await,
            }
        }

        info!("GateWorker stopped");
    }

    async fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::LoadAll => {
                self.load_version().await;
                self.load_categories().await;
                // Runs regardless of how the steps above went.
                self.load_devices().await;
            }
            Command::RefreshDevices => self.load_devices().await,
            Command::UpdateDevice { device_id, patch } => {
                debug!(%device_id, ?patch, "Sending device update");
                if let Err(e) = self.client.update_device(&device_id, &patch).await {
                    warn!(error = %e, %device_id, "Device update failed");
                }
            }
            Command::RunCommand { command } => {
                info!(command, "Dispatching gateway command");
                if let Err(e) = self.client.send_command(&command).await {
                    warn!(error = %e, command, "Command dispatch failed");
                }
            }
            Command::Shutdown => {}
        }
    }

    async fn load_version(&self) {
        match self.client.version().await {
            Ok(Some(version)) => {
                let _ = self.event_tx.send(GateEvent::Version(version)).await;
            }
            Ok(None) => debug!("Gateway reported no version"),
            Err(e) => warn!(error = %e, "Version query failed"),
        }
    }

    async fn load_categories(&self) {
        match self.client.categories().await {
            Ok(categories) => {
                let _ = self.event_tx.send(GateEvent::Categories(categories)).await;
            }
            Err(e) => {
                warn!(error = %e, "Category fetch failed, keeping previous list");
            }
        }
    }

    async fn load_devices(&self) {
        match self.client.devices().await {
            Ok(devices) => {
                let _ = self.event_tx.send(GateEvent::Devices(devices)).await;
            }
            Err(e) => warn!(error = %e, "Device fetch failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture server");
        let addr = listener.local_addr().expect("read local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve fixture");
        });
        format!("http://{addr}")
    }

    async fn run_worker(base_url: &str, commands: Vec<Command>) -> Vec<GateEvent> {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let client = GateClient::new(base_url).unwrap();
        let handle = tokio::spawn(GateWorker::new(cmd_rx, event_tx, client).run());

        for cmd in commands {
            cmd_tx.send(cmd).await.unwrap();
        }
        cmd_tx.send(Command::Shutdown).await.unwrap();
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("worker did not stop")
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn load_all_emits_version_categories_then_devices() {
        let router = Router::new()
            .route(
                "/api/version",
                get(|| async { Json(json!({"version": "1.0.0"})) }),
            )
            .route(
                "/api/v1/categories",
                get(|| async { Json(json!({"categories": ["свет", "розетка"]})) }),
            )
            .route(
                "/api/v2/devices",
                get(|| async { Json(json!({"devices": {"light.kitchen": {"enabled": true}}})) }),
            );
        let base_url = spawn_server(router).await;

        let events = run_worker(&base_url, vec![Command::LoadAll]).await;

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], GateEvent::Version(v) if v == "1.0.0"));
        match &events[1] {
            GateEvent::Categories(c) => assert_eq!(c, &["розетка", "свет"]),
            other => panic!("expected categories, got {other:?}"),
        }
        match &events[2] {
            GateEvent::Devices(devices) => {
                assert_eq!(devices["light.kitchen"].id, "light.kitchen");
                assert!(devices["light.kitchen"].enabled);
            }
            other => panic!("expected devices, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn category_failure_still_fetches_devices() {
        let router = Router::new()
            .route(
                "/api/v1/categories",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/api/v2/devices",
                get(|| async { Json(json!({"devices": {"sensor.hall": {}}})) }),
            );
        let base_url = spawn_server(router).await;

        let events = run_worker(&base_url, vec![Command::LoadAll]).await;

        // No version route, categories 500: only the device fetch lands.
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], GateEvent::Devices(d) if d.contains_key("sensor.hall")));
    }

    #[tokio::test]
    async fn updates_and_commands_produce_no_events() {
        let captured: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/api/v2/devices",
                post(
                    |State(captured): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                        captured.lock().unwrap().push(body);
                        Json(json!({}))
                    },
                ),
            )
            .route(
                "/api/v2/command",
                post(
                    |State(captured): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                        captured.lock().unwrap().push(body);
                        Json(json!({}))
                    },
                ),
            )
            .with_state(captured.clone());
        let base_url = spawn_server(router).await;

        let events = run_worker(
            &base_url,
            vec![
                Command::UpdateDevice {
                    device_id: "X".to_string(),
                    patch: sbergate_api::DevicePatch::enabled(true),
                },
                Command::RunCommand {
                    command: "exit".to_string(),
                },
            ],
        )
        .await;

        assert!(events.is_empty());
        let bodies = captured.lock().unwrap();
        assert_eq!(
            bodies.as_slice(),
            [
                json!({"devices": [{"X": {"enabled": true}}]}),
                json!({"command": "exit"}),
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_gateway_is_swallowed() {
        let events = run_worker("http://127.0.0.1:9", vec![Command::LoadAll]).await;
        assert!(events.is_empty());
    }
}
