//! # Docker Engine implementation of [`RuntimeGateway`].
//!
//! Uses the Docker API via bollard. Connection settings follow the Docker
//! client defaults (`DOCKER_HOST`, or the local socket).
//!
//! ## Mapping
//! ```text
//! resolve          ──► GET  /containers/{name}/json     404 → NotFound, not running → NotFound
//! open_log_stream  ──► GET  /containers/{id}/logs       follow, stdout, stderr, tail=N
//! stop             ──► POST /containers/{id}/stop       304 (already stopped) → Ok
//! start            ──► POST /containers/{id}/start      304 (already started) → Ok
//! ```

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    InspectContainerOptions, LogsOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::models::ContainerInspectResponse;
use futures::StreamExt;

use super::{ContainerId, LogStream, RuntimeGateway, split_lines};
use crate::error::GatewayError;

/// HTTP status the engine returns when a stop/start request is already satisfied.
const NOT_MODIFIED: u16 = 304;
const NOT_FOUND: u16 = 404;

/// Docker Engine gateway.
#[derive(Clone, Debug)]
pub struct DockerGateway {
    docker: Docker,
    tail: String,
}

impl DockerGateway {
    /// Connects with the Docker client defaults.
    ///
    /// `tail` is the number of existing lines replayed when a stream opens
    /// (`"all"` replays everything).
    pub fn connect(tail: impl Into<String>) -> Result<Self, GatewayError> {
        let docker = Docker::connect_with_defaults().map_err(|e| GatewayError::Connect {
            error: e.to_string(),
        })?;
        Ok(Self::with_client(docker, tail))
    }

    /// Wraps an already configured bollard client.
    pub fn with_client(docker: Docker, tail: impl Into<String>) -> Self {
        Self {
            docker,
            tail: tail.into(),
        }
    }
}

fn status_code(err: &DockerError) -> Option<u16> {
    match err {
        DockerError::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

/// Inspect result → running container id.
fn map_resolve(
    res: Result<ContainerInspectResponse, DockerError>,
    name: &str,
) -> Result<ContainerId, GatewayError> {
    let not_found = || GatewayError::NotFound {
        name: name.to_string(),
    };
    let info = res.map_err(|e| match status_code(&e) {
        Some(NOT_FOUND) => not_found(),
        _ => GatewayError::Unavailable {
            error: e.to_string(),
        },
    })?;

    let running = info.state.as_ref().and_then(|s| s.running).unwrap_or(false);
    match info.id {
        Some(id) if running => Ok(ContainerId::new(id)),
        _ => Err(not_found()),
    }
}

fn map_stop(res: Result<(), DockerError>, id: &ContainerId) -> Result<(), GatewayError> {
    match res {
        Ok(()) => Ok(()),
        Err(e) if status_code(&e) == Some(NOT_MODIFIED) => Ok(()),
        Err(e) => Err(GatewayError::Stop {
            id: id.to_string(),
            error: e.to_string(),
        }),
    }
}

fn map_start(res: Result<(), DockerError>, id: &ContainerId) -> Result<(), GatewayError> {
    match res {
        Ok(()) => Ok(()),
        Err(e) if status_code(&e) == Some(NOT_MODIFIED) => Ok(()),
        Err(e) => Err(GatewayError::Start {
            id: id.to_string(),
            error: e.to_string(),
        }),
    }
}

#[async_trait]
impl RuntimeGateway for DockerGateway {
    async fn resolve(&self, name: &str) -> Result<ContainerId, GatewayError> {
        let res = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await;
        map_resolve(res, name)
    }

    async fn open_log_stream(&self, id: &ContainerId) -> Result<LogStream, GatewayError> {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            timestamps: false,
            tail: self.tail.clone(),
            ..Default::default()
        };

        let stream_id = id.to_string();
        let frames = self
            .docker
            .logs(id.as_str(), Some(options))
            .map(move |frame| {
                frame
                    .map(|output| output.into_bytes())
                    .map_err(|e| GatewayError::Stream {
                        id: stream_id.clone(),
                        error: e.to_string(),
                    })
            });

        Ok(split_lines(id.to_string(), frames).boxed())
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), GatewayError> {
        let res = self
            .docker
            .stop_container(id.as_str(), None::<StopContainerOptions>)
            .await;
        map_stop(res, id)
    }

    async fn start(&self, id: &ContainerId) -> Result<(), GatewayError> {
        let res = self
            .docker
            .start_container(id.as_str(), None::<StartContainerOptions<String>>)
            .await;
        map_start(res, id)
    }
}
