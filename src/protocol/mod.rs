// CharacterWorks payload model
// Commands sent to the device and the responses its query actions return

mod commands;
mod responses;

pub use commands::{
    ActivateGridCommand, Channel, Command, DeviceConfig, ListGridCellsCommand,
    ListLayersCommand, SetTextCommand, TriggerAction, TriggerCommand,
};
pub use responses::{
    GridCell, LayerInfo, ListGridCellsResponse, ListGridNamesResponse, ListLayersResponse,
    ListMotionsResponse, ListMotionsWithIdsResponse, MotionWithId,
};
