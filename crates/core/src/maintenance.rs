//! Maintenance vocabulary: task priorities and frequencies.
//!
//! Both are stored as text in the database and validated at the API
//! boundary. The enums exist for exhaustive matching; repositories and the
//! reconciler pass the strings through untouched.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Priority constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All valid task priorities.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

// ---------------------------------------------------------------------------
// Frequency constants
// ---------------------------------------------------------------------------

pub const FREQUENCY_DAILY: &str = "daily";
pub const FREQUENCY_WEEKLY: &str = "weekly";
pub const FREQUENCY_YEARLY: &str = "yearly";

/// All valid task frequencies.
pub const VALID_FREQUENCIES: &[&str] = &[FREQUENCY_DAILY, FREQUENCY_WEEKLY, FREQUENCY_YEARLY];

/// Default frequency for manually created tasks that omit one.
pub const DEFAULT_FREQUENCY: &str = FREQUENCY_DAILY;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Task priority with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => PRIORITY_LOW,
            Self::Medium => PRIORITY_MEDIUM,
            Self::High => PRIORITY_HIGH,
        }
    }

    /// Parse from a string, returning an error for unknown priorities.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PRIORITY_LOW => Ok(Self::Low),
            PRIORITY_MEDIUM => Ok(Self::Medium),
            PRIORITY_HIGH => Ok(Self::High),
            other => Err(CoreError::Validation(format!(
                "Unknown priority: '{other}'. Valid priorities: {}",
                VALID_PRIORITIES.join(", ")
            ))),
        }
    }
}

/// Task frequency with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Yearly,
}

impl Frequency {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => FREQUENCY_DAILY,
            Self::Weekly => FREQUENCY_WEEKLY,
            Self::Yearly => FREQUENCY_YEARLY,
        }
    }

    /// Parse from a string, returning an error for unknown frequencies.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            FREQUENCY_DAILY => Ok(Self::Daily),
            FREQUENCY_WEEKLY => Ok(Self::Weekly),
            FREQUENCY_YEARLY => Ok(Self::Yearly),
            other => Err(CoreError::Validation(format!(
                "Unknown frequency: '{other}'. Valid frequencies: {}",
                VALID_FREQUENCIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate a priority string from a request body.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    Priority::from_str(priority).map(|_| ())
}

/// Validate a frequency string from a request body.
pub fn validate_frequency(frequency: &str) -> Result<(), CoreError> {
    Frequency::from_str(frequency).map(|_| ())
}

/// Validate a task description: non-blank after trimming.
pub fn validate_task_text(task: &str) -> Result<(), CoreError> {
    if task.trim().is_empty() {
        return Err(CoreError::Validation(
            "Task description must not be blank".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for s in VALID_PRIORITIES {
            assert_eq!(Priority::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn test_frequency_round_trip() {
        for s in VALID_FREQUENCIES {
            assert_eq!(Frequency::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let err = Priority::from_str("urgent").unwrap_err();
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn test_unknown_frequency_rejected() {
        assert!(Frequency::from_str("monthly").is_err());
    }

    #[test]
    fn test_priority_ordering() {
        // Used by list ordering assertions: high sorts above low.
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_blank_task_text_rejected() {
        assert!(validate_task_text("   ").is_err());
        assert!(validate_task_text("Check oil").is_ok());
    }
}
