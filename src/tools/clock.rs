//! Clock tool: current local date and time

use chrono::{DateTime, Local};

use super::ToolResult;

const SOURCE: &str = "clock";

/// The current local date and time as a spoken reply
#[must_use]
pub fn now() -> ToolResult {
    ToolResult::success(format_reply(Local::now()), SOURCE)
}

fn format_reply(now: DateTime<Local>) -> String {
    format!(
        "It's {} on {}.",
        now.format("%H:%M"),
        now.format("%A, %B %e, %Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;
    use chrono::TimeZone;

    #[test]
    fn formats_a_fixed_instant() {
        let instant = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 0).unwrap();
        let reply = format_reply(instant);
        assert!(reply.contains("09:26"));
        assert!(reply.contains("March"));
        assert!(reply.contains("2025"));
    }

    #[test]
    fn now_reports_success() {
        assert_eq!(now().status, ToolStatus::Success);
    }
}
