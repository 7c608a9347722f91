// Desktop notifications for errors the user has to act on
use anyhow::Result;
use tracing::info;
use notify_rust::Notification;

pub fn show_notification(title: &str, message: &str) -> Result<()> {
    info!("Showing notification: {} - {}", title, message);

    Notification::new()
        .summary(title)
        .body(message)
        .timeout(notify_rust::Timeout::Milliseconds(3000))
        .show()
        .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

    Ok(())
}

pub fn show_error_notification(action: &str, code: u32) -> Result<()> {
    let message = match code {
        crate::actions::CONFIGURATION_MISSING => "No output device configured".to_string(),
        other => format!("Error {}", other),
    };
    show_notification(&format!("Audio Output: {}", action), &message)
}
