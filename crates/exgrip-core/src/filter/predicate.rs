use std::fmt;

/// A filterable attribute of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Spindle,
    Length,
    HolderAngle,
    ExtensionAngle,
    BoreDiameter,
    CuttingDiameter,
    EdgeRadius,
    Thread,
}

impl Attribute {
    /// The attribute name as it appears in queries and records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spindle => "spindle",
            Self::Length => "length",
            Self::HolderAngle => "holderAngle",
            Self::ExtensionAngle => "extensionAngle",
            Self::BoreDiameter => "boreDiameter",
            Self::CuttingDiameter => "cuttingDiameter",
            Self::EdgeRadius => "edgeRadius",
            Self::Thread => "thread",
        }
    }

    /// The column holding this attribute in the `combinations` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Spindle => "spindle",
            Self::Length => "length",
            Self::HolderAngle => "holder_angle",
            Self::ExtensionAngle => "extension_angle",
            Self::BoreDiameter => "bore_diameter",
            Self::CuttingDiameter => "cutting_diameter",
            Self::EdgeRadius => "edge_radius",
            Self::Thread => "thread",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The right-hand side of an equality comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Text(String),
    Integer(i64),
    /// No value was supplied. An absent operand never equals a stored value.
    Absent,
}

impl Operand {
    /// A text operand, or [`Operand::Absent`] when there is no value.
    #[must_use]
    pub fn from_optional(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, |v| Self::Text(v.to_string()))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Absent => f.write_str("<absent>"),
        }
    }
}

/// A single test on one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equals { attribute: Attribute, value: Operand },
    LessOrEqual { attribute: Attribute, bound: i64 },
    GreaterThan { attribute: Attribute, bound: i64 },
    /// Inclusive on both ends. `low > high` is kept as given.
    Between {
        attribute: Attribute,
        low: i64,
        high: i64,
    },
}

impl Comparison {
    #[must_use]
    pub const fn attribute(&self) -> Attribute {
        match self {
            Self::Equals { attribute, .. }
            | Self::LessOrEqual { attribute, .. }
            | Self::GreaterThan { attribute, .. }
            | Self::Between { attribute, .. } => *attribute,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { attribute, value } => write!(f, "{attribute} = {value}"),
            Self::LessOrEqual { attribute, bound } => write!(f, "{attribute} <= {bound}"),
            Self::GreaterThan { attribute, bound } => write!(f, "{attribute} > {bound}"),
            Self::Between {
                attribute,
                low,
                high,
            } => write!(f, "{attribute} BETWEEN {low} AND {high}"),
        }
    }
}

/// A non-empty AND of comparisons.
///
/// The only way to obtain one is through [`Predicate::all`] (or the filter
/// builder), which refuses an empty list, so a predicate can never describe
/// an unconstrained scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    comparisons: Vec<Comparison>,
}

impl Predicate {
    /// Combine comparisons with AND. Returns `None` for an empty list.
    #[must_use]
    pub fn all(comparisons: Vec<Comparison>) -> Option<Self> {
        if comparisons.is_empty() {
            None
        } else {
            Some(Self { comparisons })
        }
    }

    #[must_use]
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// All comparisons on the given attribute.
    pub fn on(&self, attribute: Attribute) -> impl Iterator<Item = &Comparison> {
        self.comparisons
            .iter()
            .filter(move |c| c.attribute() == attribute)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, comparison) in self.comparisons.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{comparison}")?;
        }
        Ok(())
    }
}
