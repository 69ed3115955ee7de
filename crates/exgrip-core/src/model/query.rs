use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::Attribute;

/// The family of cutting tool a lookup is for.
///
/// Each tool type has exactly one active dimension attribute; the other
/// dimension fields in a query are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolType {
    StandardEndMills,
    ExgripMillingCutter,
    ExgripBallCutter,
    ExchangeableHeadMills,
}

impl ToolType {
    pub const ALL: [Self; 4] = [
        Self::StandardEndMills,
        Self::ExgripMillingCutter,
        Self::ExgripBallCutter,
        Self::ExchangeableHeadMills,
    ];

    /// The label clients send in the `toolType` field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StandardEndMills => "Standard End Mills",
            Self::ExgripMillingCutter => "EXGRIP Milling Cutter",
            Self::ExgripBallCutter => "EXGRIP Ball Cutter",
            Self::ExchangeableHeadMills => "Exchangeable Head Mills",
        }
    }

    /// Look up a tool type by its exact label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// The dimension attribute this tool type filters on.
    #[must_use]
    pub const fn dimension(self) -> Attribute {
        match self {
            Self::StandardEndMills => Attribute::BoreDiameter,
            Self::ExgripMillingCutter => Attribute::CuttingDiameter,
            Self::ExgripBallCutter => Attribute::EdgeRadius,
            Self::ExchangeableHeadMills => Attribute::Thread,
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter criteria for a catalog lookup, as posted by the configurator.
///
/// Every field is optional. Empty strings count as absent for all fields
/// except the dimension values, which are compared verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub id: Option<String>,
    pub spindle: Option<String>,

    /// Length range expression: `<=200`, `201-250`, `>600` or `300`.
    pub length: Option<String>,

    pub holder_angle: Option<String>,
    pub extension_angle: Option<String>,

    /// One of the [`ToolType`] labels.
    pub tool_type: Option<String>,

    // --- Dimension values, one per tool type ---
    /// Standard End Mills.
    pub bore_diameter: Option<String>,
    /// EXGRIP Milling Cutter.
    pub cutting_diameter: Option<String>,
    /// EXGRIP Ball Cutter.
    pub edge_radius: Option<String>,
    /// Exchangeable Head Mills.
    pub thread: Option<String>,

    // --- Result-only fields, accepted and ignored by the filter ---
    #[serde(rename = "productSKUClampingExtension")]
    pub clamping_extension_sku: Option<String>,
    #[serde(rename = "productSKUExtensionAdapter")]
    pub extension_adapter_sku: Option<String>,
    #[serde(rename = "productSKUMasterHolder")]
    pub master_holder_sku: Option<String>,
}

impl CatalogQuery {
    /// The raw value the query carries for a dimension attribute.
    ///
    /// Returns `None` for non-dimension attributes.
    #[must_use]
    pub fn dimension_value(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::BoreDiameter => self.bore_diameter.as_deref(),
            Attribute::CuttingDiameter => self.cutting_diameter.as_deref(),
            Attribute::EdgeRadius => self.edge_radius.as_deref(),
            Attribute::Thread => self.thread.as_deref(),
            Attribute::Spindle
            | Attribute::Length
            | Attribute::HolderAngle
            | Attribute::ExtensionAngle => None,
        }
    }

    /// Set the dimension value for `attribute`.
    ///
    /// Returns `false`, leaving the query untouched, for non-dimension
    /// attributes.
    pub fn set_dimension_value(&mut self, attribute: Attribute, value: String) -> bool {
        let slot = match attribute {
            Attribute::BoreDiameter => &mut self.bore_diameter,
            Attribute::CuttingDiameter => &mut self.cutting_diameter,
            Attribute::EdgeRadius => &mut self.edge_radius,
            Attribute::Thread => &mut self.thread,
            Attribute::Spindle
            | Attribute::Length
            | Attribute::HolderAngle
            | Attribute::ExtensionAngle => return false,
        };
        *slot = Some(value);
        true
    }

    /// Returns `true` when no field would contribute a comparison.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.spindle,
            &self.length,
            &self.holder_angle,
            &self.extension_angle,
            &self.tool_type,
        ]
        .into_iter()
        .all(|field| present(field.as_deref()).is_none())
    }
}

/// A field's value if it is set and non-empty.
pub(crate) fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_type_labels_round_trip() {
        for tool_type in ToolType::ALL {
            assert_eq!(ToolType::from_label(tool_type.label()), Some(tool_type));
        }
        assert_eq!(ToolType::from_label("standard end mills"), None);
        assert_eq!(ToolType::from_label("Drill"), None);
    }

    #[test]
    fn test_tool_type_dimensions() {
        assert_eq!(
            ToolType::StandardEndMills.dimension(),
            Attribute::BoreDiameter
        );
        assert_eq!(
            ToolType::ExgripMillingCutter.dimension(),
            Attribute::CuttingDiameter
        );
        assert_eq!(ToolType::ExgripBallCutter.dimension(), Attribute::EdgeRadius);
        assert_eq!(ToolType::ExchangeableHeadMills.dimension(), Attribute::Thread);
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let query: CatalogQuery = serde_json::from_str(
            r#"{
                "spindle": "HSK-A63",
                "length": "<=200",
                "holderAngle": "0",
                "toolType": "EXGRIP Ball Cutter",
                "edgeRadius": "R5",
                "productSKUMasterHolder": null
            }"#,
        )
        .unwrap();

        assert_eq!(query.spindle.as_deref(), Some("HSK-A63"));
        assert_eq!(query.length.as_deref(), Some("<=200"));
        assert_eq!(query.holder_angle.as_deref(), Some("0"));
        assert_eq!(query.tool_type.as_deref(), Some("EXGRIP Ball Cutter"));
        assert_eq!(query.dimension_value(Attribute::EdgeRadius), Some("R5"));
        assert!(query.extension_angle.is_none());
        assert!(query.master_holder_sku.is_none());
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let query = CatalogQuery {
            spindle: Some(String::new()),
            length: Some(String::new()),
            bore_diameter: Some("12".to_string()),
            ..CatalogQuery::default()
        };
        assert!(query.is_empty());
        assert!(CatalogQuery::default().is_empty());
    }

    #[test]
    fn test_set_dimension_value() {
        let mut query = CatalogQuery::default();
        assert!(query.set_dimension_value(Attribute::Thread, "M10".to_string()));
        assert_eq!(query.dimension_value(Attribute::Thread), Some("M10"));

        assert!(!query.set_dimension_value(Attribute::Spindle, "A".to_string()));
        assert!(query.spindle.is_none());
    }
}
