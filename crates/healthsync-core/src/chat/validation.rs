//! Input validation for user submissions.

use std::time::Duration;

/// Minimum trimmed length of a submission, in characters.
pub const MIN_INPUT_CHARS: usize = 2;

/// Maximum trimmed length of a submission, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

/// How long a rejection notice stays visible.
pub const NOTICE_DISMISS_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooShort,
    TooLong,
}

/// Transient, auto-dismissing notice shown when input is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputNotice {
    pub reason: RejectReason,
    pub text: String,
    pub dismiss_after: Duration,
}

impl InputNotice {
    fn new(reason: RejectReason) -> Self {
        let text = match reason {
            RejectReason::TooShort => "Please enter a bit more detail so I can assist you.".to_string(),
            RejectReason::TooLong => {
                format!("Please keep your message under {MAX_INPUT_CHARS} characters.")
            }
        };
        Self {
            reason,
            text,
            dismiss_after: NOTICE_DISMISS_AFTER,
        }
    }
}

/// Trim `input` and check its length. Returns the trimmed text.
pub fn validate_input(input: &str) -> Result<&str, InputNotice> {
    let trimmed = input.trim();
    let chars = trimmed.chars().count();
    if chars < MIN_INPUT_CHARS {
        return Err(InputNotice::new(RejectReason::TooShort));
    }
    if chars > MAX_INPUT_CHARS {
        return Err(InputNotice::new(RejectReason::TooLong));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_after_trim() {
        for input in ["", " ", "a", "  b  ", "\n\tx\n"] {
            let notice = validate_input(input).unwrap_err();
            assert_eq!(notice.reason, RejectReason::TooShort, "input {input:?}");
            assert_eq!(notice.dismiss_after, NOTICE_DISMISS_AFTER);
        }
    }

    #[test]
    fn test_accepts_bounds() {
        assert_eq!(validate_input("  hi  ").unwrap(), "hi");
        let max = "a".repeat(MAX_INPUT_CHARS);
        assert_eq!(validate_input(&max).unwrap().len(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_rejects_long() {
        let long = "a".repeat(MAX_INPUT_CHARS + 1);
        let notice = validate_input(&long).unwrap_err();
        assert_eq!(notice.reason, RejectReason::TooLong);
        assert!(notice.text.contains("1000"));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 1000 multi-byte characters is still within bounds.
        let accented = "é".repeat(MAX_INPUT_CHARS);
        assert!(validate_input(&accented).is_ok());
        assert!(validate_input("é").is_err());
    }
}
