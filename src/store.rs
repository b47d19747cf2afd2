//! The popup-facing state-store surface: typed accessors over the context's
//! session storage plus the side effects of a fake-date write.

use tracing::info;

use crate::notify::TimeUpdateNotifier;
use crate::page::PageContext;

pub const FAKE_DATE_KEY: &str = "timeTravelDate";
pub const TICK_START_KEY: &str = "timeTravelTickStartTimestamp";

/// The stored fake-date string, or empty when fake time is disabled.
pub fn get_fake_date(ctx: &PageContext) -> String {
    ctx.storage_get(FAKE_DATE_KEY).unwrap_or_default()
}

/// Stores the fake date verbatim (empty deletes), then fires the activation
/// hook, then dispatches the detached network notification. The notification
/// is best-effort and can neither block nor fail the local update.
pub fn set_fake_date(ctx: &PageContext, notifier: &TimeUpdateNotifier, date: &str) {
    info!(host = %ctx.host(), value = %date, "set fake date");
    if date.is_empty() {
        ctx.storage_remove(FAKE_DATE_KEY);
    } else {
        ctx.storage_set(FAKE_DATE_KEY, date);
    }
    ctx.fire_activation_hook();
    notifier.dispatch(date);
}

pub fn get_tick_start_timestamp(ctx: &PageContext) -> Option<String> {
    ctx.storage_get(TICK_START_KEY)
}

/// Enables clock ticking if `timestamp` is non-empty. The caller supplies the
/// real-time epoch-milliseconds string for the toggle moment; it is stored
/// verbatim. Empty clears the anchor, freezing the clock again.
pub fn set_tick_start_timestamp(ctx: &PageContext, timestamp: &str) {
    if timestamp.is_empty() {
        ctx.storage_remove(TICK_START_KEY);
    } else {
        ctx.storage_set(TICK_START_KEY, timestamp);
    }
}

/// True once the clock override has been installed in this context.
pub fn is_override_active(ctx: &PageContext) -> bool {
    ctx.has_activation_hook()
}
