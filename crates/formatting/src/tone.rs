use serde::Serialize;

/// Display tone of a balance cell.
///
/// A positive balance means cost not yet recovered, so it is the alert
/// tone; a negative balance is shown as healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Alert,
    Healthy,
    Neutral,
}

impl Tone {
    pub fn for_balance(value: f64) -> Self {
        if value > 0.0 {
            Tone::Alert
        } else if value < 0.0 {
            Tone::Healthy
        } else {
            Tone::Neutral
        }
    }

    /// Colour name, `None` for neutral
    pub fn color(self) -> Option<&'static str> {
        match self {
            Tone::Alert => Some("red"),
            Tone::Healthy => Some("green"),
            Tone::Neutral => None,
        }
    }

    /// Inline CSS for HTML tables
    pub fn css(self) -> &'static str {
        match self {
            Tone::Alert => "color: red; font-weight: bold;",
            Tone::Healthy => "color: green; font-weight: bold;",
            Tone::Neutral => "",
        }
    }
}
