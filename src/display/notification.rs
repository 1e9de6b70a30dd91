//! Notification display formatting

use crate::models::{Notification, NotificationKind};

fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "ℹ",
        NotificationKind::Success => "✓",
        NotificationKind::Warning => "!",
        NotificationKind::Error => "✗",
    }
}

/// Format notifications newest first with an unread marker
pub fn format_notifications(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.\n".to_string();
    }

    let unread = notifications.iter().filter(|n| !n.read).count();
    let mut output = format!("Notifications ({} unread)\n", unread);
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for notification in notifications {
        output.push_str(&format!(
            "{} {} {} {}\n    {}\n",
            if notification.read { " " } else { "•" },
            kind_icon(notification.kind),
            notification.timestamp.format("%H:%M:%S"),
            notification.title,
            notification.message
        ));
    }

    output
}
