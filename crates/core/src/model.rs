use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Review status of a submitted homework, as reported by the grading API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    /// Reviewer accepted the work.
    Approved,
    /// Reviewer picked the work up.
    Reviewing,
    /// Reviewer returned the work with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// Looks up a status code; anything outside the known three is an error.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }

    /// Localized verdict shown to the student.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// One submission entry from the `homeworks` list.
///
/// `status` stays a raw string here: unknown codes are only rejected when the
/// record is formatted, so a payload with an unfamiliar status still passes
/// shape validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    /// Name of the homework (usually the repository name).
    pub homework_name: String,
    /// Raw status code.
    pub status: String,
}

/// Validated body of a `200 OK` status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Submissions whose status changed since the requested `from_date`,
    /// newest first. Older entries that failed to decode are left out.
    pub homeworks: Vec<Submission>,
    /// Server time the response was produced at; the next query window
    /// starts here.
    pub current_date: i64,
}

impl StatusUpdate {
    /// Most recent status change, if any.
    pub fn latest(&self) -> Option<&Submission> {
        self.homeworks.first()
    }
}
