//! Enumerations shared by tracked-entity search criteria and query parameters.
//!
//! All enums serialize in `SCREAMING_SNAKE_CASE` and parse case-insensitively
//! from query-string values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// How the selected organisation units are expanded when searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganisationUnitSelectionMode {
    /// Only the given units
    Selected,
    /// The given units and their immediate children
    Children,
    /// The given units and all units below them
    Descendants,
    /// The user's tracked-entity search units and their descendants
    Accessible,
    /// The user's data capture units and their descendants
    Capture,
    /// Every unit in the system
    All,
}

impl OrganisationUnitSelectionMode {
    pub const ALL_MODES: [Self; 6] = [
        Self::Selected,
        Self::Children,
        Self::Descendants,
        Self::Accessible,
        Self::Capture,
        Self::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selected => "SELECTED",
            Self::Children => "CHILDREN",
            Self::Descendants => "DESCENDANTS",
            Self::Accessible => "ACCESSIBLE",
            Self::Capture => "CAPTURE",
            Self::All => "ALL",
        }
    }
}

/// Enrollment status of a tracked entity within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramStatus {
    Active,
    Completed,
    Cancelled,
}

impl ProgramStatus {
    pub const ALL_STATUSES: [Self; 3] = [Self::Active, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// Status of a program stage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Active,
    Completed,
    Visited,
    Schedule,
    Overdue,
    Skipped,
}

impl EventStatus {
    pub const ALL_STATUSES: [Self; 6] = [
        Self::Active,
        Self::Completed,
        Self::Visited,
        Self::Schedule,
        Self::Overdue,
        Self::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Visited => "VISITED",
            Self::Schedule => "SCHEDULE",
            Self::Overdue => "OVERDUE",
            Self::Skipped => "SKIPPED",
        }
    }
}

/// Which users' assignments an event search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignedUserSelectionMode {
    /// Events assigned to the current user
    Current,
    /// Events assigned to the explicitly provided users
    Provided,
    /// Events with no assigned user
    None,
    /// Events assigned to any user
    Any,
}

impl AssignedUserSelectionMode {
    pub const ALL_MODES: [Self; 4] = [Self::Current, Self::Provided, Self::None, Self::Any];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::Provided => "PROVIDED",
            Self::None => "NONE",
            Self::Any => "ANY",
        }
    }
}

/// Comparison operator of a query filter, e.g. the `GT` in `uid:GT:10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    Sw,
    Ew,
    In,
}

impl QueryOperator {
    pub const ALL_OPERATORS: [Self; 10] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::Lt,
        Self::Le,
        Self::Like,
        Self::Sw,
        Self::Ew,
        Self::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Gt => "GT",
            Self::Ge => "GE",
            Self::Lt => "LT",
            Self::Le => "LE",
            Self::Like => "LIKE",
            Self::Sw => "SW",
            Self::Ew => "EW",
            Self::In => "IN",
        }
    }
}

fn parse_case_insensitive<T: Copy>(
    kind: &'static str,
    value: &str,
    candidates: &[T],
    as_str: impl Fn(&T) -> &'static str,
) -> Result<T, CoreError> {
    let value = value.trim();
    candidates
        .iter()
        .find(|c| as_str(*c).eq_ignore_ascii_case(value))
        .copied()
        .ok_or_else(|| CoreError::invalid_enum_value(kind, value))
}

impl FromStr for OrganisationUnitSelectionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_case_insensitive("ouMode", s, &Self::ALL_MODES, Self::as_str)
    }
}

impl FromStr for ProgramStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_case_insensitive("programStatus", s, &Self::ALL_STATUSES, Self::as_str)
    }
}

impl FromStr for EventStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_case_insensitive("eventStatus", s, &Self::ALL_STATUSES, Self::as_str)
    }
}

impl FromStr for AssignedUserSelectionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_case_insensitive("assignedUserMode", s, &Self::ALL_MODES, Self::as_str)
    }
}

impl FromStr for QueryOperator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_case_insensitive("operator", s, &Self::ALL_OPERATORS, Self::as_str)
    }
}

impl fmt::Display for OrganisationUnitSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AssignedUserSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
