//! Test doubles shared by the collector tests.

use crate::{
    client::{
        Backend,
        Command,
    },
    error::ScrapeError,
    metrics::{
        LabelInjector,
        NodeIdentity,
    },
};
use prometheus::proto::MetricFamily;
use std::{
    collections::HashMap,
    future::Future,
    io,
    pin::Pin,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Duration,
};

/// In-memory backend answering with canned replies; unknown commands fail.
#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<HashMap<Command, String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn reply(self, command: Command, body: &str) -> Self {
        self.set_reply(command, body);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, command: Command, body: &str) {
        self.replies.lock().unwrap().insert(command, body.to_string());
    }

    pub fn fail(&self, command: Command) {
        self.replies.lock().unwrap().remove(&command);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Backend for FakeBackend {
    fn send(&self, command: Command) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, ScrapeError>> + Send + '_>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            let reply = self.replies.lock().unwrap().get(&command).cloned();
            reply
                .map(String::into_bytes)
                .ok_or_else(|| ScrapeError::BackendUnreachable {
                    address: "fake:2181".to_string(),
                    command,
                    source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
                })
        })
    }
}

pub fn identity() -> NodeIdentity {
    NodeIdentity {
        host: "zk1:2181".to_string(),
        node: "zk1".to_string(),
        cluster: "main".to_string(),
        subsystem_name: "coordination".to_string(),
        subsystem_id: "7".to_string(),
    }
}

pub fn injector() -> (Arc<LabelInjector>, NodeIdentity) {
    let identity = identity();
    let injector = LabelInjector::new(&identity, [("env".to_string(), "prod".to_string())]);
    (Arc::new(injector), identity)
}

/// Value of the first sample of `name` carrying all `labels`.
pub fn sample(families: &[MetricFamily], name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    families
        .iter()
        .filter(|family| family.get_name() == name)
        .flat_map(|family| family.get_metric())
        .find(|metric| {
            labels.iter().all(|(label, value)| {
                metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == *label && pair.get_value() == *value)
            })
        })
        .map(|metric| metric.get_gauge().get_value())
}
