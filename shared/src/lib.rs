use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default daily intake target in milliliters, used until the user sets one
pub const DEFAULT_DAILY_GOAL_ML: i64 = 3000;

/// The fixed set of fluids a drink can be logged as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluidType {
    Water,
    Tea,
    Coffee,
    Smoothie,
    #[serde(rename = "Carbonated water")]
    CarbonatedWater,
    Soda,
    #[serde(rename = "Coconut water")]
    CoconutWater,
    Milk,
    Juice,
    #[serde(rename = "Protein shake")]
    ProteinShake,
    #[serde(rename = "Sports drink")]
    SportsDrink,
    #[serde(rename = "Energy drink")]
    EnergyDrink,
    Soup,
    #[serde(rename = "Hot chocolate")]
    HotChocolate,
    Wine,
    Beer,
    Liquor,
    #[serde(rename = "Sparkling water")]
    SparklingWater,
}

/// Catalog order, as shown in the drink picker
pub const ALL_FLUID_TYPES: [FluidType; 18] = [
    FluidType::Water,
    FluidType::Tea,
    FluidType::Coffee,
    FluidType::Smoothie,
    FluidType::CarbonatedWater,
    FluidType::Soda,
    FluidType::CoconutWater,
    FluidType::Milk,
    FluidType::Juice,
    FluidType::ProteinShake,
    FluidType::SportsDrink,
    FluidType::EnergyDrink,
    FluidType::Soup,
    FluidType::HotChocolate,
    FluidType::Wine,
    FluidType::Beer,
    FluidType::Liquor,
    FluidType::SparklingWater,
];

impl FluidType {
    /// Human-readable name used in the UI and on disk
    pub fn display_name(&self) -> &'static str {
        match self {
            FluidType::Water => "Water",
            FluidType::Tea => "Tea",
            FluidType::Coffee => "Coffee",
            FluidType::Smoothie => "Smoothie",
            FluidType::CarbonatedWater => "Carbonated water",
            FluidType::Soda => "Soda",
            FluidType::CoconutWater => "Coconut water",
            FluidType::Milk => "Milk",
            FluidType::Juice => "Juice",
            FluidType::ProteinShake => "Protein shake",
            FluidType::SportsDrink => "Sports drink",
            FluidType::EnergyDrink => "Energy drink",
            FluidType::Soup => "Soup",
            FluidType::HotChocolate => "Hot chocolate",
            FluidType::Wine => "Wine",
            FluidType::Beer => "Beer",
            FluidType::Liquor => "Liquor",
            FluidType::SparklingWater => "Sparkling water",
        }
    }

    /// Lenient lookup: unknown names are treated as water
    pub fn from_display_name(name: &str) -> FluidType {
        name.parse().unwrap_or(FluidType::Water)
    }
}

impl Default for FluidType {
    fn default() -> Self {
        FluidType::Water
    }
}

impl fmt::Display for FluidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for FluidType {
    type Err = FluidTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_FLUID_TYPES
            .iter()
            .copied()
            .find(|fluid| fluid.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FluidTypeError::Unknown(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FluidTypeError {
    Unknown(String),
}

impl fmt::Display for FluidTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluidTypeError::Unknown(name) => write!(f, "Unknown fluid type: {}", name),
        }
    }
}

impl std::error::Error for FluidTypeError {}

/// A single recorded drink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidLog {
    /// Unique within one user's log, assigned from the epoch-millisecond clock
    pub id: u64,
    pub fluid_type: FluidType,
    /// Display time as entered by the user (e.g. "08:30 AM")
    pub time: String,
    pub amount_ml: u32,
}

/// Fields supplied when logging a new drink; the id is assigned by the log store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDrinkRequest {
    pub fluid_type: FluidType,
    pub time: String,
    pub amount_ml: u32,
}

/// Replacement fields for an existing log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditLogRequest {
    pub id: u64,
    pub fluid_type: FluidType,
    pub time: String,
    pub amount_ml: u32,
}

/// Physical profile used to estimate hydration needs.
///
/// Fields stay free-form text; the UI validates them as non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub weight: String,
    pub height: String,
    pub age: String,
    pub sex: String,
    pub activity: String,
    pub environment: String,
}

impl UserRecord {
    /// True when every field is blank, i.e. setup was skipped
    pub fn is_empty(&self) -> bool {
        [
            &self.weight,
            &self.height,
            &self.age,
            &self.sex,
            &self.activity,
            &self.environment,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Where the achievement celebration currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementState {
    NotAchieved,
    AchievedPendingNotice,
    AchievedNoticeShown,
}

impl Default for AchievementState {
    fn default() -> Self {
        AchievementState::NotAchieved
    }
}

/// Everything the home screen needs to draw the progress ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total_ml: u64,
    pub goal_ml: i64,
    /// total / goal, 0.0 when the goal is not positive
    pub progress: f64,
    pub remaining_ml: u64,
    pub achieved: bool,
    /// Always `NotAchieved` when the goal is not positive
    pub achievement: AchievementState,
}

/// Result of a log mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMutationOutcome {
    /// False when the targeted id did not exist
    pub applied: bool,
    /// The entry as it now stands (or as it was, for deletions)
    pub entry: Option<FluidLog>,
    pub snapshot: ProgressSnapshot,
    /// True exactly when this mutation crossed the goal from below
    pub achievement_notice: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSuggestionSource {
    Coach,
    Default,
}

/// A proposed daily goal; nothing is stored until the user accepts it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSuggestion {
    pub goal_ml: i64,
    pub source: GoalSuggestionSource,
}

/// Per-fluid intake for the progress breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidTypeTotal {
    pub fluid_type: FluidType,
    pub amount_ml: u64,
}
