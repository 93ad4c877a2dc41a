// Command builders
//
// Turn loosely formatted operator input (comma-separated motion names, padded
// layer names) into well-formed commands. All builders are pure: the same
// arguments always produce the same command, and empty input is dropped
// rather than sent.

use crate::protocol::{
    ActivateGridCommand, Channel, Command, ListGridCellsCommand, ListLayersCommand,
    SetTextCommand, TriggerAction, TriggerCommand,
};

/// Separator the device uses between a motion and its sub-layers
pub const LAYER_PATH_SEPARATOR: char = '\\';

/// Split `" a , b , , c "` into `["a", "b", "c"]`
pub fn split_motion_names(motion_names: &str) -> Vec<String> {
    motion_names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(ids: Vec<String>) -> Option<Vec<String>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Build any trigger-family command from a comma-separated motion list
///
/// `motion_ids` is only sent when non-empty.
pub fn trigger(
    action: TriggerAction,
    motion_names: &str,
    channel: Channel,
    motion_ids: Vec<String>,
) -> Command {
    Command::trigger(
        action,
        TriggerCommand {
            motions: split_motion_names(motion_names),
            motion_ids: non_empty(motion_ids),
            channel,
        },
    )
}

pub fn play_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::PlayMotions, motion_names, channel, motion_ids)
}

pub fn stop_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::StopMotions, motion_names, channel, motion_ids)
}

pub fn finish_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::FinishMotions, motion_names, channel, motion_ids)
}

pub fn pause_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::PauseMotions, motion_names, channel, motion_ids)
}

pub fn eject_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::EjectMotions, motion_names, channel, motion_ids)
}

pub fn resume_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::ResumeMotions, motion_names, channel, motion_ids)
}

pub fn restart_motions(motion_names: &str, channel: Channel, motion_ids: Vec<String>) -> Command {
    trigger(TriggerAction::RestartMotions, motion_names, channel, motion_ids)
}

pub fn finish_and_restart_motions(
    motion_names: &str,
    channel: Channel,
    motion_ids: Vec<String>,
) -> Command {
    trigger(
        TriggerAction::FinishAndRestartMotions,
        motion_names,
        channel,
        motion_ids,
    )
}

/// Set text on `motion\layer`, joining the trimmed motion and layer names
pub fn set_text_from_motion_and_layer(
    motion: &str,
    layer: &str,
    value: &str,
    channel: Channel,
) -> Command {
    let path = format!("{}{}{}", motion.trim(), LAYER_PATH_SEPARATOR, layer.trim());
    Command::SetText(SetTextCommand {
        layer: Some(path),
        layer_id: None,
        value: value.to_string(),
        channel,
    })
}

/// Set text on a layer given its full path and/or id
///
/// A blank path is omitted, so the device resolves the layer by `layer_id`.
pub fn set_text_from_path(
    layer: &str,
    value: &str,
    channel: Channel,
    layer_id: Vec<String>,
) -> Command {
    let layer = layer.trim();
    Command::SetText(SetTextCommand {
        layer: (!layer.is_empty()).then(|| layer.to_string()),
        layer_id: non_empty(layer_id),
        value: value.to_string(),
        channel,
    })
}

pub fn activate_grid_cell(
    grid: &str,
    row: u32,
    column: u32,
    channel: Option<Channel>,
) -> Command {
    Command::ActivateGridCell(ActivateGridCommand {
        grid: grid.to_string(),
        cell: (row, column),
        channel,
    })
}

pub fn list_motions() -> Command {
    Command::ListMotions
}

pub fn list_motions_with_ids() -> Command {
    Command::ListMotionsWithIds
}

/// Filters for `list_layers`; empty values are treated as absent
#[derive(Debug, Clone, Default)]
pub struct ListLayersOptions {
    pub parent: Option<String>,
    pub parent_id: Vec<String>,
    pub channel: Option<Channel>,
}

pub fn list_layers(options: ListLayersOptions) -> Command {
    Command::ListLayers(ListLayersCommand {
        parent: options.parent.filter(|parent| !parent.is_empty()),
        parent_id: non_empty(options.parent_id),
        channel: options.channel,
    })
}

pub fn list_grid_names() -> Command {
    Command::ListGridNames
}

pub fn list_grid_cells(grid: &str) -> Command {
    Command::ListGridCells(ListGridCellsCommand {
        grid: grid.to_string(),
    })
}
