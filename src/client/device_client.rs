// CharacterWorks client implementation
//
// Every call is one POST to `http://{host}:{port}/`. The client holds no
// connection state; the target is passed per call so one client can drive
// several devices concurrently.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ClientError, Result};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::protocol::{
    Command, DeviceConfig, ListGridCellsCommand, ListGridNamesResponse, ListGridCellsResponse,
    ListLayersCommand, ListLayersResponse, ListMotionsResponse, ListMotionsWithIdsResponse,
};
use crate::schema::{self, Shape};

/// Deadline for the response headers of a single call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How much to trust a response body
///
/// `Trust` deserializes straight into the target type. `Schema` first checks
/// the JSON against the response schema and reports every mismatch by path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Trust,
    Schema,
}

/// Client for the CharacterWorks HTTP endpoint
#[derive(Debug, Clone)]
pub struct CharacterWorksClient<T = ReqwestTransport> {
    transport: T,
    timeout: Duration,
}

impl CharacterWorksClient<ReqwestTransport> {
    /// Create a client on the default reqwest transport
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }
}

impl<T: HttpTransport> CharacterWorksClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-call deadline (defaults to [`REQUEST_TIMEOUT`])
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one command and return the raw response
    ///
    /// The status code is not inspected here; see [`parse_response`].
    pub async fn send_command(
        &self,
        command: &Command,
        target: &DeviceConfig,
    ) -> Result<HttpResponse> {
        debug!(action = command.action(), "Sending command");
        self.post_json(command, target).await
    }

    /// Send several commands as one JSON array, in order
    pub async fn send_batch(
        &self,
        commands: &[Command],
        target: &DeviceConfig,
    ) -> Result<HttpResponse> {
        debug!(count = commands.len(), "Sending batch");
        self.post_json(commands, target).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        body: &B,
        target: &DeviceConfig,
    ) -> Result<HttpResponse> {
        let url = target.endpoint();
        let body = serde_json::to_vec(body).map_err(ClientError::Serialize)?;
        debug!(url = %url, bytes = body.len(), "POST");

        let request = HttpRequest::post_json(url.clone(), body);

        // Dropping the transport future on expiry aborts the request and
        // releases the timer.
        match tokio::time::timeout(self.timeout, self.transport.post(request)).await {
            Ok(Ok(response)) => {
                debug!(url = %url, status = response.status(), "Response received");
                Ok(response)
            }
            Ok(Err(source)) => Err(ClientError::Transport { url, source }),
            Err(_) => {
                warn!(url = %url, timeout_secs = self.timeout.as_secs(), "Request timed out");
                Err(ClientError::Timeout {
                    url,
                    timeout: self.timeout,
                })
            }
        }
    }

    /// Send a command and deserialize the response
    pub async fn send_command_and_parse<R: DeserializeOwned>(
        &self,
        command: &Command,
        target: &DeviceConfig,
    ) -> Result<R> {
        let response = self.send_command(command, target).await?;
        parse_response(response).await
    }

    /// Send a command and validate the response against `shape`
    pub async fn send_command_and_validate<R: DeserializeOwned>(
        &self,
        command: &Command,
        target: &DeviceConfig,
        shape: &Shape,
    ) -> Result<R> {
        let response = self.send_command(command, target).await?;
        parse_response_with_schema(response, shape).await
    }

    async fn query<R: DeserializeOwned>(
        &self,
        command: &Command,
        target: &DeviceConfig,
        shape: fn() -> Shape,
        validation: Validation,
    ) -> Result<R> {
        match validation {
            Validation::Trust => self.send_command_and_parse(command, target).await,
            Validation::Schema => {
                self.send_command_and_validate(command, target, &shape())
                    .await
            }
        }
    }

    /// Send a batch and deserialize whatever the device returns
    ///
    /// The batch reply is peer-defined; use `serde_json::Value` to keep it
    /// untyped.
    pub async fn send_batch_and_parse<R: DeserializeOwned>(
        &self,
        commands: &[Command],
        target: &DeviceConfig,
    ) -> Result<R> {
        let response = self.send_batch(commands, target).await?;
        parse_response(response).await
    }

    /// Send a batch and validate each query result against its schema
    ///
    /// The reply must be an array with one entry per command. Entries for
    /// non-query commands are passed through unchecked; violations are
    /// reported under the entry's index (`1.motions: Required`).
    pub async fn send_batch_and_validate(
        &self,
        commands: &[Command],
        target: &DeviceConfig,
    ) -> Result<Vec<Value>> {
        let shape = Shape::Tuple(
            commands
                .iter()
                .map(|command| schema::for_command(command).unwrap_or(Shape::Any))
                .collect(),
        );

        let response = self.send_batch(commands, target).await?;
        let value = read_json(response).await?;
        if let Err(errors) = schema::validate(&value, &shape) {
            warn!(violations = errors.violations().len(), "Batch response failed validation");
            return Err(errors.into());
        }
        serde_json::from_value(value).map_err(ClientError::Deserialize)
    }

    pub async fn list_motions(
        &self,
        target: &DeviceConfig,
        validation: Validation,
    ) -> Result<ListMotionsResponse> {
        self.query(
            &Command::ListMotions,
            target,
            schema::list_motions_response,
            validation,
        )
        .await
    }

    pub async fn list_motions_with_ids(
        &self,
        target: &DeviceConfig,
        validation: Validation,
    ) -> Result<ListMotionsWithIdsResponse> {
        self.query(
            &Command::ListMotionsWithIds,
            target,
            schema::list_motions_with_ids_response,
            validation,
        )
        .await
    }

    /// List the layer tree, optionally below `parent`
    pub async fn list_layers(
        &self,
        command: ListLayersCommand,
        target: &DeviceConfig,
        validation: Validation,
    ) -> Result<ListLayersResponse> {
        self.query(
            &Command::ListLayers(command),
            target,
            schema::list_layers_response,
            validation,
        )
        .await
    }

    pub async fn list_grid_names(
        &self,
        target: &DeviceConfig,
        validation: Validation,
    ) -> Result<ListGridNamesResponse> {
        self.query(
            &Command::ListGridNames,
            target,
            schema::list_grid_names_response,
            validation,
        )
        .await
    }

    pub async fn list_grid_cells(
        &self,
        grid: &str,
        target: &DeviceConfig,
        validation: Validation,
    ) -> Result<ListGridCellsResponse> {
        let command = Command::ListGridCells(ListGridCellsCommand {
            grid: grid.to_string(),
        });
        self.query(&command, target, schema::list_grid_cells_response, validation)
            .await
    }
}

/// Read the body, failing on non-2xx statuses and invalid JSON
async fn read_json(response: HttpResponse) -> Result<Value> {
    let bytes = read_ok_body(response).await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Deserialize)
}

async fn read_ok_body(response: HttpResponse) -> Result<Vec<u8>> {
    if !response.is_ok() {
        let status = response.status();
        let status_text = response.status_text().to_string();
        let body = response.text().await?;
        warn!(status, status_text = %status_text, "Device returned an error status");
        return Err(ClientError::Status {
            status,
            status_text,
            body,
        });
    }
    response.bytes().await
}

/// Read the body of a successful response as text
///
/// For commands that answer with an acknowledgement rather than JSON.
pub async fn read_success_text(response: HttpResponse) -> Result<String> {
    let bytes = read_ok_body(response).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Deserialize a response body, trusting the peer's shape
///
/// Non-2xx statuses fail with `HTTP {status} {text}: {body}`; bodies that
/// are not valid JSON for `R` fail with `Failed to parse JSON response: ...`.
pub async fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    let bytes = read_ok_body(response).await?;
    let parsed = serde_json::from_slice(&bytes).map_err(ClientError::Deserialize)?;
    debug!(bytes = bytes.len(), "Parsed response");
    Ok(parsed)
}

/// Deserialize a response body after checking it against `shape`
pub async fn parse_response_with_schema<R: DeserializeOwned>(
    response: HttpResponse,
    shape: &Shape,
) -> Result<R> {
    let value = read_json(response).await?;
    if let Err(errors) = schema::validate(&value, shape) {
        warn!(violations = errors.violations().len(), "Response failed validation");
        return Err(errors.into());
    }
    serde_json::from_value(value).map_err(ClientError::Deserialize)
}
