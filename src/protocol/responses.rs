// Response payloads returned by the query actions

use serde::{Deserialize, Serialize};

/// Reply to `list_motions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMotionsResponse {
    pub motions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionWithId {
    pub name: String,
    pub id: String,
}

/// Reply to `list_motions_with_ids`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMotionsWithIdsResponse {
    pub motions: Vec<MotionWithId>,
}

/// One node of the layer tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    pub path: String,
    pub id: String,

    #[serde(rename = "type")]
    pub layer_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerInfo>>,
}

impl LayerInfo {
    /// Depth-first walk over this layer and all of its descendants
    pub fn walk(&self) -> Vec<&LayerInfo> {
        let mut out = vec![self];
        for child in self.children.iter().flatten() {
            out.extend(child.walk());
        }
        out
    }
}

/// Reply to `list_layers`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLayersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayerInfo>>,
}

impl ListLayersResponse {
    /// Find a layer anywhere in the tree by its backslash path
    pub fn find_by_path(&self, path: &str) -> Option<&LayerInfo> {
        self.children
            .iter()
            .flatten()
            .flat_map(|layer| layer.walk())
            .find(|layer| layer.path == path)
    }
}

/// Reply to `list_grid_names`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListGridNamesResponse {
    pub grids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// `[row, column]`
    pub position: (f64, f64),

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Reply to `list_grid_cells`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListGridCellsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<GridCell>>,
}
