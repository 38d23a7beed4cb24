//! Structured user signals produced upstream (face and food detection,
//! health metrics). Every field is optional.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Case-insensitive; anything that is not male or female is `Other`
impl From<&str> for Gender {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => Gender::Male,
            "female" | "f" | "woman" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        Gender::from(raw.as_str())
    }
}

impl FromStr for Gender {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Gender::from(s))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    /// under 18
    Youth,
    /// 18 to 29
    YoungAdult,
    /// 30 to 49
    Adult,
    /// 50 and over
    Senior,
}

impl AgeBracket {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=17 => AgeBracket::Youth,
            18..=29 => AgeBracket::YoungAdult,
            30..=49 => AgeBracket::Adult,
            _ => AgeBracket::Senior,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiBracket {
    /// below 18.5
    Underweight,
    /// 18.5 up to 25
    Healthy,
    /// 25 up to 30
    Overweight,
    /// 30 and above
    Obese,
}

impl BmiBracket {
    /// `None` for NaN or infinite input
    pub fn from_bmi(bmi: f64) -> Option<Self> {
        if !bmi.is_finite() {
            return None;
        }
        Some(if bmi < 18.5 {
            BmiBracket::Underweight
        } else if bmi < 25.0 {
            BmiBracket::Healthy
        } else if bmi < 30.0 {
            BmiBracket::Overweight
        } else {
            BmiBracket::Obese
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub bmi: Option<f64>,
    pub conditions: Vec<String>,
}

/// Everything known about a user when asking for recommendations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSignalBundle {
    pub profile: UserProfile,
    pub food_items: Vec<String>,
    pub health_status: HealthStatus,
}

impl UserSignalBundle {
    pub fn new() -> Self {
        UserSignalBundle::default()
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.profile.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.profile.gender = Some(gender);
        self
    }

    pub fn with_food_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.food_items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bmi(mut self, bmi: f64) -> Self {
        self.health_status.bmi = Some(bmi);
        self
    }

    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.health_status.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// true when no field carries a signal
    pub fn is_empty(&self) -> bool {
        self.profile.age.is_none()
            && self.profile.gender.is_none()
            && self.food_items.is_empty()
            && self.health_status.bmi.is_none()
            && self.health_status.conditions.is_empty()
    }
}
