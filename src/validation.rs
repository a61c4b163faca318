//! Caller-side validation of timer forms
//!
//! The registry only insists on a positive duration. Everything a user can
//! get wrong in a form is checked here first, with messages meant for display.

use serde::Deserialize;

use crate::{
    error::ValidationError,
    state::{NewTimer, TimerUpdate},
    utils::DurationParts,
};

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 50;

const MAX_HOURS: u64 = 23;
const MAX_MINUTES: u64 = 59;
const MAX_SECONDS: u64 = 59;

/// Form submitted to create a timer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimerForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

/// Form submitted to edit a timer; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimerUpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
}

/// Validate a creation form and turn it into registry input
pub fn validate_timer_form(form: &TimerForm) -> Result<NewTimer, ValidationError> {
    let title = validate_title(&form.title)?;
    let duration = validate_duration(form.hours, form.minutes, form.seconds)?;

    Ok(NewTimer {
        title,
        description: form.description.trim().to_string(),
        duration,
    })
}

/// Validate an edit form. Time parts are only checked when at least one is given.
pub fn validate_timer_update(form: &TimerUpdateForm) -> Result<TimerUpdate, ValidationError> {
    let title = form.title.as_deref().map(validate_title).transpose()?;

    let has_time = form.hours.is_some() || form.minutes.is_some() || form.seconds.is_some();
    let duration = if has_time {
        Some(validate_duration(
            form.hours.unwrap_or(0),
            form.minutes.unwrap_or(0),
            form.seconds.unwrap_or(0),
        )?)
    } else {
        None
    };

    Ok(TimerUpdate {
        title,
        description: form.description.as_deref().map(|d| d.trim().to_string()),
        duration,
    })
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

fn validate_duration(hours: u64, minutes: u64, seconds: u64) -> Result<u64, ValidationError> {
    let parts = DurationParts {
        hours: hours.min(MAX_HOURS),
        minutes: minutes.min(MAX_MINUTES),
        seconds: seconds.min(MAX_SECONDS),
    };

    match parts.total_seconds() {
        0 => Err(ValidationError::DurationRequired),
        total => Ok(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, hours: u64, minutes: u64, seconds: u64) -> TimerForm {
        TimerForm {
            title: title.to_string(),
            description: String::new(),
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        assert_eq!(validate_timer_form(&form("", 1, 0, 0)), Err(ValidationError::TitleRequired));
        assert_eq!(validate_timer_form(&form("   ", 1, 0, 0)), Err(ValidationError::TitleRequired));
    }

    #[test]
    fn long_title_is_rejected() {
        let title = "A".repeat(51);
        assert_eq!(validate_timer_form(&form(&title, 1, 0, 0)), Err(ValidationError::TitleTooLong));
        assert!(validate_timer_form(&form(&"A".repeat(50), 1, 0, 0)).is_ok());
    }

    #[test]
    fn zero_time_is_rejected() {
        assert_eq!(
            validate_timer_form(&form("Valid Title", 0, 0, 0)),
            Err(ValidationError::DurationRequired)
        );
        assert_eq!(
            ValidationError::DurationRequired.to_string(),
            "Please set a time greater than 0"
        );
    }

    #[test]
    fn valid_form_is_trimmed_and_totalled() {
        let input = validate_timer_form(&TimerForm {
            title: "  Valid Timer ".to_string(),
            description: " Testing ".to_string(),
            hours: 1,
            minutes: 10,
            seconds: 30,
        })
        .unwrap();
        assert_eq!(input.title, "Valid Timer");
        assert_eq!(input.description, "Testing");
        assert_eq!(input.duration, 4230);
    }

    #[test]
    fn time_parts_are_clamped() {
        let input = validate_timer_form(&form("Long", 99, 99, 99)).unwrap();
        assert_eq!(input.duration, 23 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn update_checks_only_present_fields() {
        let update = validate_timer_update(&TimerUpdateForm {
            description: Some("new".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.duration, None);
        assert_eq!(update.description.as_deref(), Some("new"));

        let update = validate_timer_update(&TimerUpdateForm {
            minutes: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.duration, Some(120));
    }

    #[test]
    fn update_rejects_bad_fields() {
        let err = validate_timer_update(&TimerUpdateForm {
            title: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(err, Err(ValidationError::TitleRequired));

        let err = validate_timer_update(&TimerUpdateForm {
            seconds: Some(0),
            ..Default::default()
        });
        assert_eq!(err, Err(ValidationError::DurationRequired));
    }
}
