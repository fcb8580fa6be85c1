use std::fmt::Display;

use crate::model::{HomeworkStatus, Submission};
use crate::validation::ValidationError;

/// Composes the chat message for a status change.
pub fn parse_status(submission: &Submission) -> Result<String, ValidationError> {
    let verdict = HomeworkStatus::from_code(&submission.status)?.verdict();
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        submission.homework_name, verdict
    ))
}

/// Composes the chat message for a failed polling cycle.
pub fn failure_message(error: &dyn Display) -> String {
    format!("Сбой в работе программы: {error}")
}
