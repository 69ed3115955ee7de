use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One holder / adapter / clamp combination in the catalog table.
///
/// Field names follow the table export, so catalog dumps deserialize
/// directly into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    #[serde(default = "new_id")]
    pub id: String,

    pub spindle: Option<String>,

    /// Overall length in millimetres.
    pub length: Option<i64>,

    pub holder_angle: Option<String>,
    pub extension_angle: Option<String>,
    pub bore_diameter: Option<String>,
    pub cutting_diameter: Option<String>,
    pub edge_radius: Option<String>,
    pub thread: Option<String>,

    #[serde(rename = "productSKUMasterHolder")]
    pub master_holder_sku: Option<String>,
    #[serde(rename = "productSKUExtensionAdapter")]
    pub extension_adapter_sku: Option<String>,
    #[serde(rename = "productSKUClampingExtension")]
    pub clamping_extension_sku: Option<String>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Combination {
    /// An empty combination with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            spindle: None,
            length: None,
            holder_angle: None,
            extension_angle: None,
            bore_diameter: None,
            cutting_diameter: None,
            edge_radius: None,
            thread: None,
            master_holder_sku: None,
            extension_adapter_sku: None,
            clamping_extension_sku: None,
        }
    }

    /// Project this record into the shape returned to lookup clients.
    #[must_use]
    pub fn summary(&self) -> CombinationSummary {
        CombinationSummary {
            holder_sku: self.master_holder_sku.clone(),
            adapter_sku: self.extension_adapter_sku.clone(),
            clamp_sku: self.clamping_extension_sku.clone(),
            holder_angle: self.holder_angle.clone(),
            extension_angle: self.extension_angle.clone(),
            bore_diameter: self.bore_diameter.clone(),
            cutting_diameter: self.cutting_diameter.clone(),
            edge_radius: self.edge_radius.clone(),
            thread: self.thread.clone(),
        }
    }
}

/// A matched combination as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationSummary {
    #[serde(rename = "holderSKU")]
    pub holder_sku: Option<String>,
    #[serde(rename = "adapterSKU")]
    pub adapter_sku: Option<String>,
    #[serde(rename = "clampSKU")]
    pub clamp_sku: Option<String>,
    pub holder_angle: Option<String>,
    pub extension_angle: Option<String>,
    pub bore_diameter: Option<String>,
    pub cutting_diameter: Option<String>,
    pub edge_radius: Option<String>,
    pub thread: Option<String>,
}
