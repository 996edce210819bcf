//! Agent run loop
//!
//! Receives messages from a delivery mechanism and hands each one to the
//! sink. Per-message failures are logged and do not stop the worker;
//! construction failures are fatal before the loop ever starts.

use nebula_config::{Config, OutputMode};
use nebula_sink::{JsonDiskConfig, JsonDiskSink, MetricsSnapshot, SinkError};
use tokio_util::sync::CancellationToken;

use crate::delivery::Delivery;

/// The Nebula worker: one sink, one loop
pub struct NebulaAgent {
    sink: JsonDiskSink,
}

impl NebulaAgent {
    /// Wrap an already-constructed sink
    pub fn new(sink: JsonDiskSink) -> Self {
        Self { sink }
    }

    /// Build the agent from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Config` for an unsupported file type or an
    /// unusable output location; the worker must refuse to start rather
    /// than fail on the first message.
    pub fn from_config(config: &Config) -> Result<Self, SinkError> {
        let agent = &config.agent;

        let mut sink_config = JsonDiskConfig::default()
            .with_file_type(&agent.file_type)
            .with_output_root(&agent.output_root);
        if let Some(ref run_id) = agent.run_id {
            sink_config = sink_config.with_run_id(run_id);
        }
        if let Some(ref directory) = agent.directory {
            sink_config = sink_config.with_directory(directory);
        }
        if agent.mode == OutputMode::PerRun {
            sink_config = sink_config.with_per_run_addressing();
        }

        Ok(Self::new(JsonDiskSink::new(sink_config)?))
    }

    /// The agent's sink
    #[inline]
    pub fn sink(&self) -> &JsonDiskSink {
        &self.sink
    }

    /// Run the agent until delivery closes or shutdown is requested
    ///
    /// Each received message is logged and persisted. A persist failure is
    /// logged and the loop continues - the sink stays usable and previously
    /// written lines are unaffected; redelivery is the transport's call.
    ///
    /// Returns the final metrics snapshot.
    pub async fn run<D: Delivery>(self, mut delivery: D, shutdown: CancellationToken) -> MetricsSnapshot {
        tracing::info!(
            base_dir = %self.sink.base_dir().display(),
            "nebula agent starting"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                received = delivery.recv() => {
                    let Some(message) = received else {
                        tracing::info!("delivery closed");
                        break;
                    };

                    tracing::info!(selector = %message.selector(), "processing message");
                    if let Err(error) = self.sink.persist(&message) {
                        tracing::error!(
                            selector = %message.selector(),
                            %error,
                            "failed to persist message"
                        );
                    }
                }
            }
        }

        let snapshot = self.sink.metrics().snapshot();
        tracing::info!(
            received = snapshot.messages_received,
            written = snapshot.messages_written,
            bytes = snapshot.bytes_written,
            skipped = snapshot.empty_payloads,
            errors = snapshot.write_errors,
            "nebula agent shutting down"
        );

        snapshot
    }
}
