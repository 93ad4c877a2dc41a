// Structural response validation
//
// The device is an external process we do not control, so query responses
// can be checked against a declarative shape before they are trusted.

mod responses;
mod shape;

pub use responses::{
    for_command, grid_cell, layer_info, list_grid_cells_response, list_grid_names_response,
    list_layers_response, list_motions_response, list_motions_with_ids_response, motion_with_id,
};
pub use shape::{validate, Field, Shape, ValidationErrors, Violation};
