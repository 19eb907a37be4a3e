// ABOUTME: Application wiring: wizard state plus the background install dispatch
// The pipeline runs on a blocking worker and reports back through one channel message

pub mod events;
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use state::{AsyncAction, InstallOutcome, Step, StepKind, WizardState};

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::install::{InstallPipeline, InstallRequest};

pub struct App {
    pub state: WizardState,
    pipeline: Arc<InstallPipeline>,
    install_tx: mpsc::UnboundedSender<InstallOutcome>,
    install_rx: mpsc::UnboundedReceiver<InstallOutcome>,
    install_in_flight: bool,
}

impl App {
    pub fn new(state: WizardState, pipeline: InstallPipeline) -> Self {
        let (install_tx, install_rx) = mpsc::unbounded_channel();
        Self {
            state,
            pipeline: Arc::new(pipeline),
            install_tx,
            install_rx,
            install_in_flight: false,
        }
    }

    /// Start queued work and apply any finished installation
    pub fn tick(&mut self) {
        if let Some(action) = self.state.pending_async_action.take() {
            match action {
                AsyncAction::RunInstall(request) => self.spawn_install(request),
            }
        }

        while let Ok(outcome) = self.install_rx.try_recv() {
            self.finish_install(outcome);
        }
    }

    pub fn install_in_flight(&self) -> bool {
        self.install_in_flight
    }

    /// Wait for the in-flight installation to report, if there is one
    pub async fn wait_for_install(&mut self) {
        if !self.install_in_flight {
            return;
        }
        if let Some(outcome) = self.install_rx.recv().await {
            self.finish_install(outcome);
        }
    }

    fn spawn_install(&mut self, request: InstallRequest) {
        info!("Dispatching installation of {:?}", request.bundle_path);
        self.install_in_flight = true;

        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.install_tx.clone();

        tokio::spawn(async move {
            let outcome = match tokio::task::spawn_blocking(move || pipeline.run(&request)).await {
                Ok(Ok(report)) => Ok(report),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => {
                    error!("Installation task failed: {}", e);
                    Err(format!("Installation task failed: {e}"))
                }
            };
            let _ = tx.send(outcome);
        });
    }

    fn finish_install(&mut self, outcome: InstallOutcome) {
        self.install_in_flight = false;
        EventHandler::process_event(AppEvent::InstallFinished(outcome), &mut self.state);
    }
}
