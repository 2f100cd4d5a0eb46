//! Status enums for shop state.

use serde::{Deserialize, Serialize};

/// Visual theme of the storefront.
///
/// Persisted under the `theme` storage key as `"light"` or `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon shown on the toggle control (offers the opposite theme).
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("invalid theme: {s}")),
        }
    }
}

/// Stage of a single checkout attempt.
///
/// ```text
/// Idle -> Processing -> Success -> (cleanup) -> Idle
/// ```
///
/// The pay control is disabled for the whole of `Processing` and `Success`,
/// which serializes payment attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    #[default]
    Idle,
    Processing,
    Success,
}

impl PaymentStage {
    /// Label of the pay control in this stage.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Pay Now 🔒",
            Self::Processing => "Processing... ⏳",
            Self::Success => "Success! ✅",
        }
    }

    /// Whether the pay control accepts input.
    #[must_use]
    pub const fn control_enabled(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for PaymentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serde() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }

    #[test]
    fn test_payment_stage_control() {
        assert!(PaymentStage::Idle.control_enabled());
        assert!(!PaymentStage::Processing.control_enabled());
        assert!(!PaymentStage::Success.control_enabled());
    }

    #[test]
    fn test_payment_stage_labels() {
        assert!(PaymentStage::Idle.label().starts_with("Pay Now"));
        assert!(PaymentStage::Processing.label().starts_with("Processing"));
        assert!(PaymentStage::Success.label().starts_with("Success!"));
    }
}
