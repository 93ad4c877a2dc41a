// Command payloads
//
// Every command is a flat JSON object discriminated by its `action` field.
// Optional fields are omitted when absent; the device distinguishes a missing
// field from an empty one, so nothing here serializes as `null`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the device's HTTP endpoint lives
///
/// Supplied per call; the client keeps no connection state between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub host: String,
    pub port: u16,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Endpoint URL every command is POSTed to
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

/// Output context a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Live1,
    Live2,
    Preview,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Live1 => "live1",
            Channel::Live2 => "live2",
            Channel::Preview => "preview",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "live1" => Ok(Channel::Live1),
            "live2" => Ok(Channel::Live2),
            "preview" => Ok(Channel::Preview),
            other => Err(format!(
                "unknown channel '{}' (expected live1, live2 or preview)",
                other
            )),
        }
    }
}

/// Actions that share the trigger command shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    PlayMotions,
    StopMotions,
    FinishMotions,
    PauseMotions,
    EjectMotions,
    ResumeMotions,
    RestartMotions,
    FinishAndRestartMotions,
}

impl TriggerAction {
    pub const ALL: [TriggerAction; 8] = [
        TriggerAction::PlayMotions,
        TriggerAction::StopMotions,
        TriggerAction::FinishMotions,
        TriggerAction::PauseMotions,
        TriggerAction::EjectMotions,
        TriggerAction::ResumeMotions,
        TriggerAction::RestartMotions,
        TriggerAction::FinishAndRestartMotions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerAction::PlayMotions => "play_motions",
            TriggerAction::StopMotions => "stop_motions",
            TriggerAction::FinishMotions => "finish_motions",
            TriggerAction::PauseMotions => "pause_motions",
            TriggerAction::EjectMotions => "eject_motions",
            TriggerAction::ResumeMotions => "resume_motions",
            TriggerAction::RestartMotions => "restart_motions",
            TriggerAction::FinishAndRestartMotions => "finish_and_restart_motions",
        }
    }
}

impl fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerAction {
    type Err = String;

    /// Accepts the wire name (`play_motions`) or the short verb (`play`,
    /// `finish-and-restart`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        TriggerAction::ALL
            .into_iter()
            .find(|action| {
                let name = action.as_str();
                name == normalized || name.strip_suffix("_motions") == Some(normalized.as_str())
            })
            .ok_or_else(|| format!("unknown trigger action '{}'", s.trim()))
    }
}

/// Shared payload of the trigger family (play, stop, finish, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCommand {
    pub motions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_ids: Option<Vec<String>>,

    pub channel: Channel,
}

/// Set the text of a layer, addressed by path and/or id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTextCommand {
    /// Backslash-delimited layer path (`motion\layer`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<Vec<String>>,

    pub value: String,
    pub channel: Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateGridCommand {
    pub grid: String,

    /// `[row, column]`
    pub cell: (u32, u32),

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLayersCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListGridCellsCommand {
    pub grid: String,
}

/// One instruction for the device
///
/// Serializes as a single JSON object whose first key is `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    PlayMotions(TriggerCommand),
    StopMotions(TriggerCommand),
    FinishMotions(TriggerCommand),
    PauseMotions(TriggerCommand),
    EjectMotions(TriggerCommand),
    ResumeMotions(TriggerCommand),
    RestartMotions(TriggerCommand),
    FinishAndRestartMotions(TriggerCommand),
    SetText(SetTextCommand),
    ActivateGridCell(ActivateGridCommand),
    ListMotions,
    ListMotionsWithIds,
    ListLayers(ListLayersCommand),
    ListGridNames,
    ListGridCells(ListGridCellsCommand),
}

impl Command {
    /// Wrap a trigger payload in the variant for `action`
    pub fn trigger(action: TriggerAction, payload: TriggerCommand) -> Self {
        match action {
            TriggerAction::PlayMotions => Command::PlayMotions(payload),
            TriggerAction::StopMotions => Command::StopMotions(payload),
            TriggerAction::FinishMotions => Command::FinishMotions(payload),
            TriggerAction::PauseMotions => Command::PauseMotions(payload),
            TriggerAction::EjectMotions => Command::EjectMotions(payload),
            TriggerAction::ResumeMotions => Command::ResumeMotions(payload),
            TriggerAction::RestartMotions => Command::RestartMotions(payload),
            TriggerAction::FinishAndRestartMotions => Command::FinishAndRestartMotions(payload),
        }
    }

    /// Split a trigger command back into its action and payload
    pub fn as_trigger(&self) -> Option<(TriggerAction, &TriggerCommand)> {
        let pair = match self {
            Command::PlayMotions(p) => (TriggerAction::PlayMotions, p),
            Command::StopMotions(p) => (TriggerAction::StopMotions, p),
            Command::FinishMotions(p) => (TriggerAction::FinishMotions, p),
            Command::PauseMotions(p) => (TriggerAction::PauseMotions, p),
            Command::EjectMotions(p) => (TriggerAction::EjectMotions, p),
            Command::ResumeMotions(p) => (TriggerAction::ResumeMotions, p),
            Command::RestartMotions(p) => (TriggerAction::RestartMotions, p),
            Command::FinishAndRestartMotions(p) => (TriggerAction::FinishAndRestartMotions, p),
            _ => return None,
        };
        Some(pair)
    }

    /// Wire value of the `action` discriminator
    pub fn action(&self) -> &'static str {
        match self {
            Command::SetText(_) => "set_text",
            Command::ActivateGridCell(_) => "activate_grid_cell",
            Command::ListMotions => "list_motions",
            Command::ListMotionsWithIds => "list_motions_with_ids",
            Command::ListLayers(_) => "list_layers",
            Command::ListGridNames => "list_grid_names",
            Command::ListGridCells(_) => "list_grid_cells",
            trigger => trigger
                .as_trigger()
                .map(|(action, _)| action.as_str())
                .unwrap_or_default(),
        }
    }

    /// Whether the device answers this command with data
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Command::ListMotions
                | Command::ListMotionsWithIds
                | Command::ListLayers(_)
                | Command::ListGridNames
                | Command::ListGridCells(_)
        )
    }
}
