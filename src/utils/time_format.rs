//! Conversions between raw second counts and display values

/// A duration split into clock parts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Format a countdown as `HH:MM:SS`
pub fn format_time(total_seconds: u64) -> String {
    let parts = DurationParts::from_seconds(total_seconds);
    format!("{:02}:{:02}:{:02}", parts.hours, parts.minutes, parts.seconds)
}

/// Format an uptime compactly, e.g. `1h 2m 3s`, `4m 5s` or `6s`
pub fn format_uptime(total_seconds: u64) -> String {
    let DurationParts { hours, minutes, seconds } = DurationParts::from_seconds(total_seconds);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
