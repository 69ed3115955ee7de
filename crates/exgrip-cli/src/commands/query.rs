use anyhow::{bail, Result};

use exgrip_api::Config;
use exgrip_core::schema::Database;
use exgrip_core::{lookup, CatalogQuery, ToolType};

/// Filter flags of the `query` command.
#[derive(Debug, Default)]
pub struct QueryArgs {
    pub spindle: Option<String>,
    pub length: Option<String>,
    pub holder_angle: Option<String>,
    pub extension_angle: Option<String>,
    pub tool_type: Option<String>,
    pub dimension: Option<String>,
}

impl QueryArgs {
    fn into_query(self) -> Result<CatalogQuery> {
        let mut query = CatalogQuery {
            spindle: self.spindle,
            length: self.length,
            holder_angle: self.holder_angle,
            extension_angle: self.extension_angle,
            tool_type: self.tool_type,
            ..CatalogQuery::default()
        };

        if let Some(value) = self.dimension {
            let label = query.tool_type.as_deref().unwrap_or_default();
            let Some(tool_type) = ToolType::from_label(label) else {
                let labels: Vec<_> = ToolType::ALL.iter().map(|t| t.label()).collect();
                bail!(
                    "--dimension needs a known --tool-type\n\nValid tool types: {}",
                    labels.join(", ")
                );
            };
            query.set_dimension_value(tool_type.dimension(), value);
        }

        Ok(query)
    }
}

pub fn run_query(config: &Config, args: QueryArgs) -> Result<()> {
    let query = args.into_query()?;
    if query.is_empty() {
        bail!("No filter given.\n\nPass at least one of --spindle, --length, --holder-angle, --extension-angle or --tool-type.");
    }

    let db = Database::open(&config.database_path)?;
    let results = lookup(&db, &query)?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exgrip_core::Attribute;

    #[test]
    fn test_dimension_follows_tool_type() {
        let args = QueryArgs {
            tool_type: Some("EXGRIP Ball Cutter".to_string()),
            dimension: Some("R5".to_string()),
            ..QueryArgs::default()
        };
        let query = args.into_query().unwrap();

        assert_eq!(query.dimension_value(Attribute::EdgeRadius), Some("R5"));
        assert!(query.bore_diameter.is_none());
    }

    #[test]
    fn test_dimension_with_unknown_tool_type() {
        let args = QueryArgs {
            tool_type: Some("Drill".to_string()),
            dimension: Some("8".to_string()),
            ..QueryArgs::default()
        };
        assert!(args.into_query().is_err());
    }

    #[test]
    fn test_no_flags_is_empty() {
        let query = QueryArgs::default().into_query().unwrap();
        assert!(query.is_empty());
    }
}
