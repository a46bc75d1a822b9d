use std::fmt;

/// How prominently the host should render the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorLevel {
    Neutral,
    LowPriority,
    Normal,
}

/// Indicator glyph requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorShape {
    Ring,
    Dot,
}

/// A snapshot of the node state for the host's status indicator.
///
/// The text is the backlog length, suffixed with the active pass-through mode
/// when one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: IndicatorLevel,
    pub shape: IndicatorShape,
    pub text: String,
}

impl Status {
    /// Derives the presentation state from the node state.
    ///
    /// Exactly one of three states applies, checked in priority order:
    /// disabled (pass everything through), first-message-bypass while idle,
    /// or normal queueing.
    pub fn of(queue_len: usize, disabled: bool, first_message_bypass: bool, busy: bool) -> Self {
        if disabled {
            Self {
                level: IndicatorLevel::Neutral,
                shape: IndicatorShape::Ring,
                text: format!("{queue_len} (bypass all)"),
            }
        } else if first_message_bypass && !busy {
            Self {
                level: IndicatorLevel::LowPriority,
                shape: IndicatorShape::Ring,
                text: format!("{queue_len} (bypass first)"),
            }
        } else {
            Self {
                level: IndicatorLevel::Normal,
                shape: IndicatorShape::Ring,
                text: queue_len.to_string(),
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
