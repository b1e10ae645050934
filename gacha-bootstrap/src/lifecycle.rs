use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::oneshot;
use tracing::{info, warn};

use gacha_application::ops::drive_session;
use gacha_application::{AppState, GachaSession, SessionEvent};
use gacha_interfaces_console::{ConsoleOutcome, DisplayOptions};

use crate::context::AppContext;

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub config_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// A session running on its own worker thread and runtime.
pub struct SessionHandle {
    events: mpsc::Receiver<SessionEvent>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl SessionHandle {
    pub fn events(&self) -> &mpsc::Receiver<SessionEvent> {
        &self.events
    }

    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Loads configuration and starts polling. Returns once the worker has built
/// its context, so configuration errors surface here.
pub fn start_session(options: SessionOptions) -> Result<SessionHandle> {
    let (events_tx, events_rx) = mpsc::channel();
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let worker = std::thread::Builder::new()
        .name("gacha-session".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .thread_name("gacha-session-rt")
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(anyhow!("session runtime init failed: {err}")));
                    return;
                }
            };

            runtime.block_on(async move {
                let context =
                    match AppContext::new(options.config_path.as_deref(), options.log_file).await {
                        Ok(context) => context,
                        Err(err) => {
                            let _ = ready_tx.send(Err(err));
                            return;
                        }
                    };
                let _ = ready_tx.send(Ok(()));
                run_session(context.state, events_tx, shutdown_rx).await;
            });
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(SessionHandle {
            events: events_rx,
            shutdown_tx: Some(shutdown_tx),
            worker: Some(worker),
        }),
        Ok(Err(err)) => {
            let _ = worker.join();
            Err(err)
        }
        Err(_) => {
            let _ = worker.join();
            Err(anyhow!("session worker exited during startup"))
        }
    }
}

/// Renders the session on this thread until it ends, then stops the worker.
pub fn present(handle: SessionHandle, options: &DisplayOptions) -> Result<ConsoleOutcome> {
    // Unlocked handles: the worker logs to stderr while the console runs.
    let outcome = gacha_interfaces_console::run(
        handle.events(),
        options,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    handle.stop();
    outcome
}

async fn run_session(
    state: AppState,
    events: mpsc::Sender<SessionEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let interval = Duration::from_millis(state.config.poll_interval_ms);
    let mut session = GachaSession::new(state);
    let publish = events.clone();

    tokio::select! {
        state = drive_session(&mut session, interval, |event| {
            let _ = publish.send(event);
        }) => {
            info!(?state, "session finished");
        }
        _ = &mut shutdown_rx => {
            info!("session stopped");
            let _ = events.send(SessionEvent::Cancelled);
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            let _ = events.send(SessionEvent::Cancelled);
        }
    }
}
