use serde::{Deserialize, Serialize};

/// A rectangular block of cell values, as the API sends and receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(rename = "majorDimension", skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppendResponse {
    #[serde(rename = "spreadsheetId")]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub updates: Option<UpdateResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    #[serde(rename = "updatedRange", default)]
    pub updated_range: Option<String>,
    #[serde(rename = "updatedRows", default)]
    pub updated_rows: Option<u32>,
    #[serde(rename = "updatedCells", default)]
    pub updated_cells: Option<u32>,
}
