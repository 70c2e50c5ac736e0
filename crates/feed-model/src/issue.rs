//! Validation issue and normalization error types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::NodeLocation;
use crate::error::ModelError;

/// Issue severity. Errors block feed generation, warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ModelError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Tree level an issue is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueScope {
    Complex,
    Building,
    Unit,
}

impl IssueScope {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complex => "complex",
            Self::Building => "building",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for IssueScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identifier of the rule that produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    // Structural (hierarchy builder)
    DuplicateId,
    FloorsTotalConflict,

    // Unit
    MissingId,
    MissingPrice,
    NonPositivePrice,
    MissingArea,
    NonPositiveArea,
    LivingAreaExceedsTotal,
    RoomAreasExceedTotal,
    FloorOutOfRange,
    FloorBoundUnchecked,
    MissingImages,
    InvalidImageUrl,
    MissingAddress,
    SuspiciousPricePerMeter,
    BuiltYearOutOfRange,
    MissingRecommendedField,
    UnknownRenovationType,
    ExpensiveWithoutDescription,

    // Building
    EmptyBuilding,
    InconsistentBuildingAddress,
    InconsistentBuiltYear,

    // Complex
    EmptyComplex,
}

impl IssueKind {
    pub const ALL: [IssueKind; 23] = [
        IssueKind::DuplicateId,
        IssueKind::FloorsTotalConflict,
        IssueKind::MissingId,
        IssueKind::MissingPrice,
        IssueKind::NonPositivePrice,
        IssueKind::MissingArea,
        IssueKind::NonPositiveArea,
        IssueKind::LivingAreaExceedsTotal,
        IssueKind::RoomAreasExceedTotal,
        IssueKind::FloorOutOfRange,
        IssueKind::FloorBoundUnchecked,
        IssueKind::MissingImages,
        IssueKind::InvalidImageUrl,
        IssueKind::MissingAddress,
        IssueKind::SuspiciousPricePerMeter,
        IssueKind::BuiltYearOutOfRange,
        IssueKind::MissingRecommendedField,
        IssueKind::UnknownRenovationType,
        IssueKind::ExpensiveWithoutDescription,
        IssueKind::EmptyBuilding,
        IssueKind::InconsistentBuildingAddress,
        IssueKind::InconsistentBuiltYear,
        IssueKind::EmptyComplex,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId => "duplicate-id",
            Self::FloorsTotalConflict => "floors-total-conflict",
            Self::MissingId => "missing-id",
            Self::MissingPrice => "missing-price",
            Self::NonPositivePrice => "non-positive-price",
            Self::MissingArea => "missing-area",
            Self::NonPositiveArea => "non-positive-area",
            Self::LivingAreaExceedsTotal => "living-area-exceeds-total",
            Self::RoomAreasExceedTotal => "room-areas-exceed-total",
            Self::FloorOutOfRange => "floor-out-of-range",
            Self::FloorBoundUnchecked => "floor-bound-unchecked",
            Self::MissingImages => "missing-images",
            Self::InvalidImageUrl => "invalid-image-url",
            Self::MissingAddress => "missing-address",
            Self::SuspiciousPricePerMeter => "suspicious-price-per-meter",
            Self::BuiltYearOutOfRange => "built-year-out-of-range",
            Self::MissingRecommendedField => "missing-recommended-field",
            Self::UnknownRenovationType => "unknown-renovation-type",
            Self::ExpensiveWithoutDescription => "expensive-without-description",
            Self::EmptyBuilding => "empty-building",
            Self::InconsistentBuildingAddress => "inconsistent-building-address",
            Self::InconsistentBuiltYear => "inconsistent-built-year",
            Self::EmptyComplex => "empty-complex",
        }
    }

    pub fn scope(&self) -> IssueScope {
        match self {
            Self::FloorsTotalConflict
            | Self::EmptyBuilding
            | Self::InconsistentBuildingAddress
            | Self::InconsistentBuiltYear => IssueScope::Building,
            Self::EmptyComplex => IssueScope::Complex,
            _ => IssueScope::Unit,
        }
    }

    /// Severity before any policy override.
    ///
    /// Values that corrupt feed consumers (prices, areas, identity, floor
    /// bounds) are errors; listing-quality findings are warnings.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DuplicateId
            | Self::MissingId
            | Self::MissingPrice
            | Self::NonPositivePrice
            | Self::MissingArea
            | Self::NonPositiveArea
            | Self::LivingAreaExceedsTotal
            | Self::RoomAreasExceedTotal
            | Self::FloorOutOfRange => Severity::Error,
            Self::FloorsTotalConflict
            | Self::FloorBoundUnchecked
            | Self::MissingImages
            | Self::InvalidImageUrl
            | Self::MissingAddress
            | Self::SuspiciousPricePerMeter
            | Self::BuiltYearOutOfRange
            | Self::MissingRecommendedField
            | Self::UnknownRenovationType
            | Self::ExpensiveWithoutDescription
            | Self::EmptyBuilding
            | Self::InconsistentBuildingAddress
            | Self::InconsistentBuiltYear
            | Self::EmptyComplex => Severity::Warning,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DuplicateId => "internal_id already used by an earlier row",
            Self::FloorsTotalConflict => "rows of one building disagree on floors_total",
            Self::MissingId => "internal_id is absent",
            Self::MissingPrice => "price is absent",
            Self::NonPositivePrice => "price is zero or negative",
            Self::MissingArea => "area_total is absent",
            Self::NonPositiveArea => "an area is zero or negative",
            Self::LivingAreaExceedsTotal => "area_living is not smaller than area_total",
            Self::RoomAreasExceedTotal => "area_living + area_kitchen exceeds area_total",
            Self::FloorOutOfRange => "floor outside [1, floors_total]",
            Self::FloorBoundUnchecked => "building floors_total unknown, upper floor bound unchecked",
            Self::MissingImages => "unit has no images",
            Self::InvalidImageUrl => "image is not an http(s) URL",
            Self::MissingAddress => "address is absent",
            Self::SuspiciousPricePerMeter => "price per square meter outside the plausible range",
            Self::BuiltYearOutOfRange => "built_year outside the plausible range",
            Self::MissingRecommendedField => "rooms, renovation or windows_view not filled",
            Self::UnknownRenovationType => "renovation is not a known finishing type",
            Self::ExpensiveWithoutDescription => {
                "price in the top fifth of the batch but no description"
            }
            Self::EmptyBuilding => "building has no units",
            Self::InconsistentBuildingAddress => "units of one building use different addresses",
            Self::InconsistentBuiltYear => "units of one building state different built years",
            Self::EmptyComplex => "complex has no buildings",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for IssueKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        IssueKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.code() == wanted)
            .ok_or_else(|| ModelError::UnknownIssueKind(s.to_string()))
    }
}

/// Where an issue points back to: the source row and/or the node path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// 1-based data row number, when the issue concerns one row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Node path such as `Sunrise/B1/U1`.
    pub path: String,
}

impl SourceRef {
    pub fn row(row: usize, path: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            path: path.into(),
        }
    }

    pub fn node(path: impl Into<String>) -> Self {
        Self {
            row: None,
            path: path.into(),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} (row {row})", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// A validation finding on the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub scope: IssueScope,
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    pub source_ref: SourceRef,
    /// Traversal position, used only for ordering.
    #[serde(skip)]
    pub location: NodeLocation,
}

impl ValidationIssue {
    pub fn new(
        kind: IssueKind,
        location: NodeLocation,
        source_ref: SourceRef,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: kind.default_severity(),
            scope: kind.scope(),
            kind,
            field: None,
            message: message.into(),
            source_ref,
            location,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// A single-field coercion failure found while normalizing a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub row: usize,
    pub field: String,
    /// Offending raw value, rendered as text.
    pub value: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} = {:?}: {}",
            self.row, self.field, self.value, self.message
        )
    }
}
