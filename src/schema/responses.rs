// Shapes of the query responses

use super::shape::{Field, Shape};
use crate::protocol::Command;

/// `{name, id}`
pub fn motion_with_id() -> Shape {
    Shape::object([
        Field::required("name", Shape::String),
        Field::required("id", Shape::String),
    ])
}

/// `{motions: string[]}`
pub fn list_motions_response() -> Shape {
    Shape::object([Field::required("motions", Shape::array(Shape::String))])
}

/// `{motions: {name, id}[]}`
pub fn list_motions_with_ids_response() -> Shape {
    Shape::object([Field::required("motions", Shape::array(motion_with_id()))])
}

/// One node of the layer tree; `children` recurses
pub fn layer_info() -> Shape {
    Shape::object([
        Field::required("name", Shape::String),
        Field::required("path", Shape::String),
        Field::required("id", Shape::String),
        Field::required("type", Shape::String),
        Field::optional("children", Shape::array(Shape::Lazy(layer_info))),
    ])
}

pub fn list_layers_response() -> Shape {
    Shape::object([Field::optional("children", Shape::array(Shape::Lazy(layer_info)))])
}

pub fn list_grid_names_response() -> Shape {
    Shape::object([Field::required("grids", Shape::array(Shape::String))])
}

pub fn grid_cell() -> Shape {
    Shape::object([
        Field::required("position", Shape::Tuple(vec![Shape::Number, Shape::Number])),
        Field::optional("text", Shape::String),
        Field::optional("color", Shape::String),
    ])
}

pub fn list_grid_cells_response() -> Shape {
    Shape::object([Field::optional("cells", Shape::array(grid_cell()))])
}

/// Expected response shape for a command, if the device answers it with data
pub fn for_command(command: &Command) -> Option<Shape> {
    match command {
        Command::ListMotions => Some(list_motions_response()),
        Command::ListMotionsWithIds => Some(list_motions_with_ids_response()),
        Command::ListLayers(_) => Some(list_layers_response()),
        Command::ListGridNames => Some(list_grid_names_response()),
        Command::ListGridCells(_) => Some(list_grid_cells_response()),
        _ => None,
    }
}
