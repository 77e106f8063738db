#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Vehicle, fuel, and PCAF data quality taxonomy types.
//!
//! This crate defines the closed set of vehicle and fuel categories used
//! across the financed-emissions toolchain. Loan uploads and emission
//! factor tables both normalize their free-text categories into these
//! enums, so an unknown category fails at the boundary instead of
//! producing a silent factor lookup miss.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Engine size bucket that matches every engine class.
pub const ENGINE_SIZE_WILDCARD: &str = "all";

/// PCAF motor vehicle category of the financed asset.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VehicleType {
    /// Private passenger car
    PassengerCar,
    /// Motorcycle or scooter
    Motorcycle,
    /// Generic commercial vehicle (vans, pickups used for business)
    CommercialVehicle,

    // ── Extended PCAF categories ────────────────────────
    /// Light commercial truck (e.g., delivery vans)
    LightCommercialTruck,
    /// Medium or heavy commercial truck
    MediumHeavyCommercialTruck,
    /// Bus or coach
    Bus,
    /// Motorhome or camper
    RecreationalVehicle,
    /// Recreational boat
    Boat,
    /// Construction or mining equipment
    YellowEquipment,
}

impl VehicleType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PassengerCar,
            Self::Motorcycle,
            Self::CommercialVehicle,
            Self::LightCommercialTruck,
            Self::MediumHeavyCommercialTruck,
            Self::Bus,
            Self::RecreationalVehicle,
            Self::Boat,
            Self::YellowEquipment,
        ]
    }

    /// Human-readable label for reports and prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PassengerCar => "Passenger Car",
            Self::Motorcycle => "Motorcycle",
            Self::CommercialVehicle => "Commercial Vehicle",
            Self::LightCommercialTruck => "Light Commercial Truck",
            Self::MediumHeavyCommercialTruck => "Medium/Heavy Commercial Truck",
            Self::Bus => "Bus",
            Self::RecreationalVehicle => "Recreational Vehicle",
            Self::Boat => "Boat",
            Self::YellowEquipment => "Yellow Equipment",
        }
    }
}

/// Fuel or drivetrain type of the financed vehicle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FuelType {
    /// Petrol / gasoline internal combustion
    Gasoline,
    /// Diesel internal combustion
    Diesel,
    /// Battery electric
    Electric,
    /// Hybrid electric
    Hybrid,
    /// Compressed or liquefied natural gas
    NaturalGas,
    /// Liquefied petroleum gas
    Propane,
}

impl FuelType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Gasoline,
            Self::Diesel,
            Self::Electric,
            Self::Hybrid,
            Self::NaturalGas,
            Self::Propane,
        ]
    }

    /// Human-readable label for reports and prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gasoline => "Gasoline",
            Self::Diesel => "Diesel",
            Self::Electric => "Electric",
            Self::Hybrid => "Hybrid",
            Self::NaturalGas => "Natural Gas",
            Self::Propane => "Propane",
        }
    }
}

/// Engine size bucket such as `"1.0-1.5L"`, `"2.0L+"`, or `"125-400cc"`.
///
/// The bucket `"all"` is a wildcard used by factor rows that apply to every
/// engine size (electric and hybrid vehicles).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EngineSizeClass(String);

impl EngineSizeClass {
    /// Creates a class from a raw bucket string. Surrounding whitespace is
    /// trimmed and an empty string becomes the wildcard.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ENGINE_SIZE_WILDCARD) {
            Self::all()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The wildcard class.
    #[must_use]
    pub fn all() -> Self {
        Self(ENGINE_SIZE_WILDCARD.to_string())
    }

    /// Whether this is the `"all"` wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == ENGINE_SIZE_WILDCARD
    }

    /// Returns the bucket string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EngineSizeClass {
    fn default() -> Self {
        Self::all()
    }
}

impl From<String> for EngineSizeClass {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for EngineSizeClass {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<EngineSizeClass> for String {
    fn from(value: EngineSizeClass) -> Self {
        value.0
    }
}

impl std::fmt::Display for EngineSizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// PCAF data quality score, from 1 (verified actual) to 5 (highly uncertain).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "snake_case")]
pub enum DataQualityScore {
    /// Level 1: asset-specific measured data
    VerifiedActual = 1,
    /// Level 2: mix of asset-specific and proxy data
    PartiallyVerified = 2,
    /// Level 3: representative proxy data
    EstimatedProxy = 3,
    /// Level 4: average proxy data
    EstimatedAverage = 4,
    /// Level 5: highly uncertain data
    VeryEstimated = 5,
}

/// Highest score that still counts as PCAF compliant.
pub const PCAF_COMPLIANT_MAX_SCORE: u8 = 3;

impl DataQualityScore {
    /// Returns the numeric value of this score.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a score from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidDataQualityScoreError> {
        match value {
            1 => Ok(Self::VerifiedActual),
            2 => Ok(Self::PartiallyVerified),
            3 => Ok(Self::EstimatedProxy),
            4 => Ok(Self::EstimatedAverage),
            5 => Ok(Self::VeryEstimated),
            _ => Err(InvalidDataQualityScoreError { value }),
        }
    }

    /// Whether a loan scored at this level meets the PCAF reporting bar.
    #[must_use]
    pub const fn is_pcaf_compliant(self) -> bool {
        self.value() <= PCAF_COMPLIANT_MAX_SCORE
    }

    /// Short label for this level.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VerifiedActual => "Verified Actual",
            Self::PartiallyVerified => "Partially Verified",
            Self::EstimatedProxy => "Estimated Proxy",
            Self::EstimatedAverage => "Estimated Average",
            Self::VeryEstimated => "Very Estimated",
        }
    }

    /// One-line description of the data backing this level.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::VerifiedActual => "Asset-specific measured data",
            Self::PartiallyVerified => "Mix of asset-specific and proxy data",
            Self::EstimatedProxy => "Representative proxy data",
            Self::EstimatedAverage => "Average proxy data",
            Self::VeryEstimated => "Highly uncertain data",
        }
    }

    /// Returns all variants of this enum, best first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::VerifiedActual,
            Self::PartiallyVerified,
            Self::EstimatedProxy,
            Self::EstimatedAverage,
            Self::VeryEstimated,
        ]
    }
}

impl TryFrom<u8> for DataQualityScore {
    type Error = InvalidDataQualityScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<DataQualityScore> for u8 {
    fn from(value: DataQualityScore) -> Self {
        value.value()
    }
}

/// Error returned when attempting to create a [`DataQualityScore`] from an
/// invalid numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDataQualityScoreError {
    /// The invalid score value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidDataQualityScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid data quality score {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidDataQualityScoreError {}

/// PCAF motor vehicle data option, describing which inputs were available.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum PcafDataOption {
    /// Actual fuel consumption with a vehicle-specific factor
    #[serde(rename = "1a")]
    #[strum(serialize = "1a")]
    Option1a,
    /// Known vehicle with actual distance travelled
    #[serde(rename = "1b")]
    #[strum(serialize = "1b")]
    Option1b,
    /// Statistical distance with known vehicle specifications
    #[serde(rename = "2a")]
    #[strum(serialize = "2a")]
    Option2a,
    /// Known vehicle type with statistical data
    #[serde(rename = "2b")]
    #[strum(serialize = "2b")]
    Option2b,
    /// Vehicle category with average proxy data
    #[serde(rename = "3a")]
    #[strum(serialize = "3a")]
    Option3a,
    /// Assumed vehicle type or average vehicle data
    #[serde(rename = "3b")]
    #[strum(serialize = "3b")]
    Option3b,
}

impl PcafDataOption {
    /// Data quality score PCAF assigns to this option.
    #[must_use]
    pub const fn default_score(self) -> DataQualityScore {
        match self {
            Self::Option1a | Self::Option1b => DataQualityScore::VerifiedActual,
            Self::Option2a | Self::Option2b => DataQualityScore::PartiallyVerified,
            Self::Option3a => DataQualityScore::EstimatedProxy,
            Self::Option3b => DataQualityScore::EstimatedAverage,
        }
    }

    /// Display name for this option.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Option1a => "Verified Actual - Vehicle Specific",
            Self::Option1b => "Partially Verified - Known Vehicle",
            Self::Option2a => "Estimated - Statistical km/year",
            Self::Option2b => "Estimated - Known Vehicle Type",
            Self::Option3a => "Proxy - Vehicle Category",
            Self::Option3b => "Proxy - Assumed Average",
        }
    }
}
