use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context};
use log::warn;
use percept_core::{ResultRecord, ResultSink};

/// Default REST path the HTTP sink posts to, matching the survey's
/// backing table endpoint.
pub const DEFAULT_RESULT_ENDPOINT: &str = "/data-api/rest/SurveyResult";

/// Channel-fed worker thread shared by the concrete sinks. `submit`
/// hands the record off and returns immediately, so persistence latency
/// never delays the participant-facing flow. Delivery errors are the
/// worker's problem to log; nothing propagates back.
struct SinkWorker {
    tx: Option<Sender<ResultRecord>>,
    handle: Option<JoinHandle<()>>,
}

impl SinkWorker {
    fn spawn(
        name: &str,
        mut deliver: impl FnMut(ResultRecord) + Send + 'static,
    ) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<ResultRecord>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for record in rx {
                    deliver(record);
                }
            })
            .context("spawning result sink worker")?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    fn submit(&self, record: ResultRecord) -> anyhow::Result<()> {
        self.tx
            .as_ref()
            .ok_or_else(|| anyhow!("result sink worker has shut down"))?
            .send(record)
            .map_err(|_| anyhow!("result sink worker has shut down"))
    }
}

impl Drop for SinkWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        drop(self.tx.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Appends one JSON object per line to a local file.
pub struct JsonlResultSink {
    worker: SinkWorker,
}

impl JsonlResultSink {
    pub fn create(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening results file {}", path.display()))?;

        let worker = SinkWorker::spawn("percept-results-file", move |record| {
            let line = match serde_json::to_string(&record) {
                Ok(line) => line,
                Err(err) => {
                    warn!("could not serialize result record: {err}");
                    return;
                }
            };
            if let Err(err) = writeln!(file, "{line}") {
                warn!("could not append result record: {err}");
            }
        })?;
        Ok(Self { worker })
    }
}

impl ResultSink for JsonlResultSink {
    fn submit(&mut self, record: ResultRecord) -> anyhow::Result<()> {
        self.worker.submit(record)
    }
}

/// POSTs each record to a REST endpoint. Non-success responses are
/// logged and dropped, like every other telemetry failure.
pub struct HttpResultSink {
    worker: SinkWorker,
}

impl HttpResultSink {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let endpoint = endpoint.into();
        let client = reqwest::blocking::Client::new();

        let worker = SinkWorker::spawn("percept-results-http", move |record| {
            match client.post(&endpoint).json(&record).send() {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => warn!("result endpoint answered {}", response.status()),
                Err(err) => warn!("could not post result record: {err}"),
            }
        })?;
        Ok(Self { worker })
    }
}

impl ResultSink for HttpResultSink {
    fn submit(&mut self, record: ResultRecord) -> anyhow::Result<()> {
        self.worker.submit(record)
    }
}
