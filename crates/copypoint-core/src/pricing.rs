//! # Price Matrix Types
//!
//! Request/response types for the copy-center price matrix.
//!
//! A printed service is described by four closed dimensions:
//!
//! ```text
//!   (paper size) × (paper type) × (color mode) × (sidedness)
//! ```
//!
//! Every exact combination maps to at most one configured unit price.
//! There is no fuzzy matching and no fallback across dimensions: an
//! unconfigured combination is a business-configuration error surfaced
//! as [`CoreError::PriceNotConfigured`](crate::error::CoreError), never
//! a default price.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Matrix Dimensions
// =============================================================================

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    A4,
    A3,
    Oficio,
}

impl PaperSize {
    pub const ALL: [PaperSize; 3] = [PaperSize::A4, PaperSize::A3, PaperSize::Oficio];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::A4 => "a4",
            PaperSize::A3 => "a3",
            PaperSize::Oficio => "oficio",
        }
    }
}

/// Paper stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaperType {
    Plain80g,
    Glossy150g,
    Photo,
}

impl PaperType {
    pub const ALL: [PaperType; 3] = [PaperType::Plain80g, PaperType::Glossy150g, PaperType::Photo];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaperType::Plain80g => "plain_80g",
            PaperType::Glossy150g => "glossy_150g",
            PaperType::Photo => "photo",
        }
    }
}

/// Monochrome or full color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Mono,
    Color,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Mono, ColorMode::Color];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Mono => "mono",
            ColorMode::Color => "color",
        }
    }
}

/// Single or double sided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Sidedness {
    Simplex,
    Duplex,
}

impl Sidedness {
    pub const ALL: [Sidedness; 2] = [Sidedness::Simplex, Sidedness::Duplex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sidedness::Simplex => "simplex",
            Sidedness::Duplex => "duplex",
        }
    }
}

// =============================================================================
// Price Request / Quote
// =============================================================================

/// A fully specified price-matrix lookup.
///
/// All four dimensions are required. The UI works with optional combo
/// selections, so [`PriceRequest::try_new`] rejects a missing dimension
/// as invalid input before any lookup happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRequest {
    pub size: PaperSize,
    pub paper: PaperType,
    pub color: ColorMode,
    pub sidedness: Sidedness,
}

impl PriceRequest {
    pub fn new(size: PaperSize, paper: PaperType, color: ColorMode, sidedness: Sidedness) -> Self {
        PriceRequest { size, paper, color, sidedness }
    }

    /// Builds a request from possibly-unset UI selections.
    ///
    /// Fails with the name of the first missing dimension.
    pub fn try_new(
        size: Option<PaperSize>,
        paper: Option<PaperType>,
        color: Option<ColorMode>,
        sidedness: Option<Sidedness>,
    ) -> Result<Self, ValidationError> {
        let required = |field: &str| ValidationError::Required { field: field.to_string() };

        Ok(PriceRequest {
            size: size.ok_or_else(|| required("size"))?,
            paper: paper.ok_or_else(|| required("paper"))?,
            color: color.ok_or_else(|| required("color"))?,
            sidedness: sidedness.ok_or_else(|| required("sidedness"))?,
        })
    }

    /// Line description snapshot for a service sold at this combination.
    pub fn description(&self) -> String {
        format!(
            "Copy {} {} {} {}",
            self.size.as_str(),
            self.paper.as_str(),
            self.color.as_str(),
            self.sidedness.as_str()
        )
    }
}

impl fmt::Display for PriceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} | {} | {} | {}]",
            self.size.as_str(),
            self.paper.as_str(),
            self.color.as_str(),
            self.sidedness.as_str()
        )
    }
}

/// The resolved unit price for a matrix combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_price_cents: i64,
}

impl PriceQuote {
    pub fn new(unit_price_cents: i64) -> Self {
        PriceQuote { unit_price_cents }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
