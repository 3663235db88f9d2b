/// Project aggregate type definitions
///
/// A `Project` is the aggregate root: it owns its materials and ordered steps
/// and is tagged with shared categories through a join relation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Store-assigned project identity
pub type ProjectId = i64;

/// A home-improvement project and its owned sub-collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Assigned by the store on insert; `None` until then
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    pub name: String,
    pub estimated_hours: Hours,
    pub actual_hours: Hours,
    /// 1 (trivial) through 5 (hard)
    pub difficulty: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Sorted by `order`
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A material owned by exactly one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i64,
    pub project_id: ProjectId,
    pub name: String,
}

/// One step of a project's instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i64,
    pub project_id: ProjectId,
    pub text: String,
    /// Sequence key; need not be contiguous
    pub order: i32,
}

/// Shared tag; outlives any project referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
}

/// Rejected project field values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("difficulty must be between 1 and 5, got {0}")]
    Difficulty(i32),

    #[error("no fields to change")]
    NoChanges,
}

impl Project {
    /// New unsaved project with empty sub-collections
    pub fn new(
        name: impl Into<String>,
        estimated_hours: Hours,
        actual_hours: Hours,
        difficulty: i32,
        notes: Option<String>,
    ) -> Self {
        Self {
            project_id: None,
            name: name.into(),
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Check field values before they reach the store
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(ValidationError::Difficulty(self.difficulty));
        }
        Ok(())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.project_id {
            Some(id) => write!(f, "{}: {}", id, self.name)?,
            None => write!(f, "(unsaved): {}", self.name)?,
        }
        write!(
            f,
            " [estimated {}h, actual {}h, difficulty {}]",
            self.estimated_hours, self.actual_hours, self.difficulty
        )
    }
}

/// Partial update: `None` leaves a field untouched.
///
/// `notes` is doubly optional so clearing the notes (`Some(None)`) differs
/// from leaving them alone (`None`). Every present value is written as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<Hours>,
    #[serde(default)]
    pub actual_hours: Option<Hours>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.estimated_hours.is_none()
            && self.actual_hours.is_none()
            && self.difficulty.is_none()
            && self.notes.is_none()
    }

    /// Same rules as `Project::validate`, for the fields that are present
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ValidationError::Empty { field: "name" });
        }
        match self.difficulty {
            Some(difficulty) if !(1..=5).contains(&difficulty) => {
                Err(ValidationError::Difficulty(difficulty))
            }
            _ => Ok(()),
        }
    }

    /// Copy every present field onto `project`
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(hours) = self.estimated_hours {
            project.estimated_hours = hours;
        }
        if let Some(hours) = self.actual_hours {
            project.actual_hours = hours;
        }
        if let Some(difficulty) = self.difficulty {
            project.difficulty = difficulty;
        }
        if let Some(notes) = self.notes {
            project.notes = notes;
        }
    }
}

/// Non-negative hour count with two fixed fractional digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours {
    hundredths: i64,
}

/// Why a string is not a valid `Hours` value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hours value '{0}': expected a non-negative number with at most two decimals")]
pub struct ParseHoursError(String);

impl Hours {
    pub const ZERO: Hours = Hours { hundredths: 0 };

    /// Largest value a store column holds (99999.99)
    const MAX_HUNDREDTHS: i64 = 9_999_999;

    pub fn from_hundredths(hundredths: i64) -> Option<Self> {
        (0..=Self::MAX_HUNDREDTHS)
            .contains(&hundredths)
            .then_some(Self { hundredths })
    }

    pub fn hundredths(&self) -> i64 {
        self.hundredths
    }

    /// Value bound into the REAL store column
    pub(crate) fn to_store(self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    /// Rounds to the nearest hundredth; exact for anything `to_store` wrote
    pub(crate) fn from_store(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::from_hundredths((value * 100.0).round() as i64)
    }
}

impl FromStr for Hours {
    type Err = ParseHoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHoursError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if !digits_only(whole) || !digits_only(frac) || frac.len() > 2 {
            return Err(err());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };

        whole
            .checked_mul(100)
            .and_then(|h| h.checked_add(frac))
            .and_then(Hours::from_hundredths)
            .ok_or_else(err)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hours {
    /// Accepts either a JSON string ("2.5") or a JSON number (2.5)
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text,
            Repr::Number(number) => number.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}
