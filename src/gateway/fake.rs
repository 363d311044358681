//! Scripted in-memory gateway used by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use super::{ContainerId, LogStream, RuntimeGateway};
use crate::error::GatewayError;

/// One recorded gateway call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Resolve(String),
    Open(String),
    Stop(String),
    Start(String),
}

/// Behaviour of one `open_log_stream` call.
pub(crate) enum Session {
    /// `open_log_stream` itself fails.
    OpenFails,
    /// Emits the given items, then ends.
    Lines(Vec<Result<String, GatewayError>>),
    /// Emits the given lines, then blocks forever.
    Hang(Vec<String>),
}

impl Session {
    pub(crate) fn lines(lines: &[&str]) -> Self {
        Session::Lines(lines.iter().map(|l| Ok(l.to_string())).collect())
    }
}

#[derive(Default)]
struct Script {
    sessions: VecDeque<Session>,
    stop: VecDeque<Result<(), GatewayError>>,
    start: VecDeque<Result<(), GatewayError>>,
    calls: Vec<Call>,
    pulled: Vec<String>,
}

/// In-memory [`RuntimeGateway`].
///
/// When the session script is exhausted, every further `open_log_stream` fails.
#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    script: Arc<Mutex<Script>>,
    known: Option<(String, String)>,
    stop_delay: Duration,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes `resolve(name)` return `id`; any other name is `NotFound`.
    pub(crate) fn with_container(mut self, name: &str, id: &str) -> Self {
        self.known = Some((name.to_string(), id.to_string()));
        self
    }

    /// Makes `stop` take this long before returning.
    pub(crate) fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = delay;
        self
    }

    pub(crate) fn push_session(&self, session: Session) -> &Self {
        self.script.lock().unwrap().sessions.push_back(session);
        self
    }

    pub(crate) fn push_stop(&self, res: Result<(), GatewayError>) -> &Self {
        self.script.lock().unwrap().stop.push_back(res);
        self
    }

    pub(crate) fn push_start(&self, res: Result<(), GatewayError>) -> &Self {
        self.script.lock().unwrap().start.push_back(res);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Lines the consumer actually pulled from the streams, in order.
    pub(crate) fn pulled(&self) -> Vec<String> {
        self.script.lock().unwrap().pulled.clone()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RuntimeGateway for FakeGateway {
    async fn resolve(&self, name: &str) -> Result<ContainerId, GatewayError> {
        self.record(Call::Resolve(name.to_string()));
        match &self.known {
            Some((known, id)) if known == name => Ok(ContainerId::new(id.as_str())),
            _ => Err(GatewayError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    async fn open_log_stream(&self, id: &ContainerId) -> Result<LogStream, GatewayError> {
        self.record(Call::Open(id.to_string()));
        let next = self.script.lock().unwrap().sessions.pop_front();
        let stream_error = || GatewayError::Stream {
            id: id.to_string(),
            error: "no such container".into(),
        };

        let (items, hang): (Vec<Result<String, GatewayError>>, bool) = match next {
            None | Some(Session::OpenFails) => return Err(stream_error()),
            Some(Session::Lines(items)) => (items, false),
            Some(Session::Hang(lines)) => (lines.into_iter().map(Ok).collect(), true),
        };

        let script = Arc::clone(&self.script);
        let tracked = stream::iter(items).inspect(move |item| {
            if let Ok(line) = item {
                script.lock().unwrap().pulled.push(line.clone());
            }
        });
        if hang {
            Ok(tracked.chain(stream::pending()).boxed())
        } else {
            Ok(tracked.boxed())
        }
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), GatewayError> {
        self.record(Call::Stop(id.to_string()));
        if !self.stop_delay.is_zero() {
            tokio::time::sleep(self.stop_delay).await;
        }
        self.script.lock().unwrap().stop.pop_front().unwrap_or(Ok(()))
    }

    async fn start(&self, id: &ContainerId) -> Result<(), GatewayError> {
        self.record(Call::Start(id.to_string()));
        self.script.lock().unwrap().start.pop_front().unwrap_or(Ok(()))
    }
}
