use crate::error::{Error, Result};
use crate::filter::length::LengthRange;
use crate::filter::predicate::{Attribute, Comparison, Operand, Predicate};
use crate::model::query::present;
use crate::model::{CatalogQuery, ToolType};

/// Accumulates comparisons and folds them into a [`Predicate`].
#[derive(Debug, Default)]
pub struct FilterBuilder {
    comparisons: Vec<Comparison>,
}

impl FilterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality comparison.
    pub fn equals(&mut self, attribute: Attribute, value: Operand) -> &mut Self {
        self.comparisons.push(Comparison::Equals { attribute, value });
        self
    }

    pub fn push(&mut self, comparison: Comparison) -> &mut Self {
        self.comparisons.push(comparison);
        self
    }

    /// AND everything added so far.
    ///
    /// # Errors
    /// Returns [`Error::NoCriteria`] when nothing was added.
    pub fn build(self) -> Result<Predicate> {
        Predicate::all(self.comparisons).ok_or(Error::NoCriteria)
    }
}

/// Build the scan predicate for a catalog query.
///
/// Present scalar fields become equality comparisons, `length` goes through
/// the [`LengthRange`] grammar, and a recognised `toolType` adds an equality
/// on its one dimension attribute using the query's value for it. When that
/// value is missing the comparison carries [`Operand::Absent`]. An
/// unrecognised `toolType` adds nothing.
///
/// # Errors
/// Returns [`Error::MalformedLength`] for an unparseable length and
/// [`Error::NoCriteria`] when no field contributed a comparison.
pub fn build_predicate(query: &CatalogQuery) -> Result<Predicate> {
    let mut builder = FilterBuilder::new();

    for (attribute, field) in [
        (Attribute::Spindle, &query.spindle),
        (Attribute::HolderAngle, &query.holder_angle),
        (Attribute::ExtensionAngle, &query.extension_angle),
    ] {
        if let Some(value) = present(field.as_deref()) {
            builder.equals(attribute, Operand::Text(value.to_string()));
        }
    }

    if let Some(length) = present(query.length.as_deref()) {
        builder.push(length.parse::<LengthRange>()?.comparison());
    }

    if let Some(label) = present(query.tool_type.as_deref()) {
        if let Some(tool_type) = ToolType::from_label(label) {
            let attribute = tool_type.dimension();
            builder.equals(
                attribute,
                Operand::from_optional(query.dimension_value(attribute)),
            );
        } else {
            log::debug!("Ignoring unrecognised tool type {:?}", label);
        }
    }

    let predicate = builder.build()?;
    log::debug!("Built predicate: {}", predicate);
    Ok(predicate)
}
