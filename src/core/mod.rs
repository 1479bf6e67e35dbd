// Controlled vocabularies and sort keys shared across services and the API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dance style taught in a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanceStyle {
    Ballroom,
    Latin,
    Salsa,
    Tango,
    Other,
}

impl DanceStyle {
    pub const ALL: [DanceStyle; 5] = [
        DanceStyle::Ballroom,
        DanceStyle::Latin,
        DanceStyle::Salsa,
        DanceStyle::Tango,
        DanceStyle::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DanceStyle::Ballroom => "ballroom",
            DanceStyle::Latin => "latin",
            DanceStyle::Salsa => "salsa",
            DanceStyle::Tango => "tango",
            DanceStyle::Other => "other",
        }
    }
}

impl fmt::Display for DanceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DanceStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ballroom" => Ok(DanceStyle::Ballroom),
            "latin" => Ok(DanceStyle::Latin),
            "salsa" => Ok(DanceStyle::Salsa),
            "tango" => Ok(DanceStyle::Tango),
            "other" => Ok(DanceStyle::Other),
            other => Err(format!("unknown dance style: {}", other)),
        }
    }
}

/// Skill level a class is pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!("unknown skill level: {}", other)),
        }
    }
}

/// Role a registered user holds on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "instructor" => Ok(UserRole::Instructor),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// Perceived room temperature reported in an environment review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Cool,
    Moderate,
    Warm,
}

impl Temperature {
    pub const ALL: [Temperature; 3] =
        [Temperature::Cool, Temperature::Moderate, Temperature::Warm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Temperature::Cool => "cool",
            Temperature::Moderate => "moderate",
            Temperature::Warm => "warm",
        }
    }
}

impl FromStr for Temperature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cool" => Ok(Temperature::Cool),
            "moderate" => Ok(Temperature::Moderate),
            "warm" => Ok(Temperature::Warm),
            other => Err(format!("unknown temperature: {}", other)),
        }
    }
}

/// Kind of waiting area available at a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingAreaKind {
    Indoor,
    Outdoor,
    Both,
}

impl WaitingAreaKind {
    pub const ALL: [WaitingAreaKind; 3] = [
        WaitingAreaKind::Indoor,
        WaitingAreaKind::Outdoor,
        WaitingAreaKind::Both,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaitingAreaKind::Indoor => "indoor",
            WaitingAreaKind::Outdoor => "outdoor",
            WaitingAreaKind::Both => "both",
        }
    }
}

impl FromStr for WaitingAreaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indoor" => Ok(WaitingAreaKind::Indoor),
            "outdoor" => Ok(WaitingAreaKind::Outdoor),
            "both" => Ok(WaitingAreaKind::Both),
            other => Err(format!("unknown waiting area kind: {}", other)),
        }
    }
}

/// How staff verified a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    InPerson,
    Video,
    Photo,
}

impl VerificationMethod {
    pub const ALL: [VerificationMethod; 3] = [
        VerificationMethod::InPerson,
        VerificationMethod::Video,
        VerificationMethod::Photo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::InPerson => "in_person",
            VerificationMethod::Video => "video",
            VerificationMethod::Photo => "photo",
        }
    }
}

impl FromStr for VerificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_person" => Ok(VerificationMethod::InPerson),
            "video" => Ok(VerificationMethod::Video),
            "photo" => Ok(VerificationMethod::Photo),
            other => Err(format!("unknown verification method: {}", other)),
        }
    }
}

/// Sports/benefit card a venue accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportsCard {
    Multisport,
    Medicover,
    OkSystem,
    Benefit,
    Fitprofit,
    Other,
}

impl SportsCard {
    pub const ALL: [SportsCard; 6] = [
        SportsCard::Multisport,
        SportsCard::Medicover,
        SportsCard::OkSystem,
        SportsCard::Benefit,
        SportsCard::Fitprofit,
        SportsCard::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportsCard::Multisport => "multisport",
            SportsCard::Medicover => "medicover",
            SportsCard::OkSystem => "ok_system",
            SportsCard::Benefit => "benefit",
            SportsCard::Fitprofit => "fitprofit",
            SportsCard::Other => "other",
        }
    }
}

impl FromStr for SportsCard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multisport" => Ok(SportsCard::Multisport),
            "medicover" => Ok(SportsCard::Medicover),
            "ok_system" => Ok(SportsCard::OkSystem),
            "benefit" => Ok(SportsCard::Benefit),
            "fitprofit" => Ok(SportsCard::Fitprofit),
            "other" => Ok(SportsCard::Other),
            other => Err(format!("unknown sports card: {}", other)),
        }
    }
}

/// Physical facility a venue offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facility {
    Parking,
    ChangingRoom,
    Lockers,
    Toilets,
    Shower,
    AirConditioning,
    Mirrors,
    LedLights,
    BalletBarre,
    Poles,
    ChairsAvailable,
    WaterDispenser,
    WifiAvailable,
    FloorTypeWood,
    FloorTypeMarble,
    FloorTypeTile,
    FloorTypeConcrete,
    FloorTypeCarpet,
    FloorTypeSoft,
    HighCeiling,
    LowCeiling,
    GoodAcoustics,
    AudioSystemBluetooth,
    AudioSystemUsbC,
    AudioSystemMiniJack,
    AudioSystemOther,
}

impl Facility {
    pub const ALL: [Facility; 26] = [
        Facility::Parking,
        Facility::ChangingRoom,
        Facility::Lockers,
        Facility::Toilets,
        Facility::Shower,
        Facility::AirConditioning,
        Facility::Mirrors,
        Facility::LedLights,
        Facility::BalletBarre,
        Facility::Poles,
        Facility::ChairsAvailable,
        Facility::WaterDispenser,
        Facility::WifiAvailable,
        Facility::FloorTypeWood,
        Facility::FloorTypeMarble,
        Facility::FloorTypeTile,
        Facility::FloorTypeConcrete,
        Facility::FloorTypeCarpet,
        Facility::FloorTypeSoft,
        Facility::HighCeiling,
        Facility::LowCeiling,
        Facility::GoodAcoustics,
        Facility::AudioSystemBluetooth,
        Facility::AudioSystemUsbC,
        Facility::AudioSystemMiniJack,
        Facility::AudioSystemOther,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facility::Parking => "parking",
            Facility::ChangingRoom => "changing_room",
            Facility::Lockers => "lockers",
            Facility::Toilets => "toilets",
            Facility::Shower => "shower",
            Facility::AirConditioning => "air_conditioning",
            Facility::Mirrors => "mirrors",
            Facility::LedLights => "led_lights",
            Facility::BalletBarre => "ballet_barre",
            Facility::Poles => "poles",
            Facility::ChairsAvailable => "chairs_available",
            Facility::WaterDispenser => "water_dispenser",
            Facility::WifiAvailable => "wifi_available",
            Facility::FloorTypeWood => "floor_type_wood",
            Facility::FloorTypeMarble => "floor_type_marble",
            Facility::FloorTypeTile => "floor_type_tile",
            Facility::FloorTypeConcrete => "floor_type_concrete",
            Facility::FloorTypeCarpet => "floor_type_carpet",
            Facility::FloorTypeSoft => "floor_type_soft",
            Facility::HighCeiling => "high_ceiling",
            Facility::LowCeiling => "low_ceiling",
            Facility::GoodAcoustics => "good_acoustics",
            Facility::AudioSystemBluetooth => "audio_system_bluetooth",
            Facility::AudioSystemUsbC => "audio_system_usb_c",
            Facility::AudioSystemMiniJack => "audio_system_mini_jack",
            Facility::AudioSystemOther => "audio_system_other",
        }
    }
}

impl FromStr for Facility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facility::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown facility: {}", s))
    }
}

/// Status of a weekly recurring schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Active,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Active => "active",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ScheduleStatus::Active),
            "cancelled" => Ok(ScheduleStatus::Cancelled),
            other => Err(format!("unknown schedule status: {}", other)),
        }
    }
}

/// Status of a one-off special schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialScheduleStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
    Extra,
}

impl SpecialScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialScheduleStatus::Scheduled => "scheduled",
            SpecialScheduleStatus::Rescheduled => "rescheduled",
            SpecialScheduleStatus::Cancelled => "cancelled",
            SpecialScheduleStatus::Extra => "extra",
        }
    }
}

impl FromStr for SpecialScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SpecialScheduleStatus::Scheduled),
            "rescheduled" => Ok(SpecialScheduleStatus::Rescheduled),
            "cancelled" => Ok(SpecialScheduleStatus::Cancelled),
            "extra" => Ok(SpecialScheduleStatus::Extra),
            other => Err(format!("unknown special schedule status: {}", other)),
        }
    }
}

/// Sort order for class listings. Every ordering gets a trailing id
/// tie-break in the query layer so results are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassSortKey {
    RatingDesc,
    PriceAsc,
    PriceDesc,
    DateDesc,
    /// Rating descending, then newest first.
    #[default]
    Default,
}

/// Sort order for review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSortKey {
    #[default]
    DateDesc,
    DateAsc,
    RatingDesc,
    RatingAsc,
}

/// Sort order for instructor listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructorSortKey {
    RatingDesc,
    ClassesCountDesc,
    /// Rating descending, then classes count descending.
    #[default]
    Default,
}

// Review slider/rating bounds, shared by payload validation and the
// metadata endpoint.
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;
pub const SLIDER_MIN: i32 = 0;
pub const SLIDER_MAX: i32 = 100;
pub const COMMENT_MIN_CHARS: usize = 10;
pub const COMMENT_MAX_CHARS: usize = 2000;
pub const NOTES_MAX_CHARS: usize = 500;
