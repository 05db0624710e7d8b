use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const STATUS_FORM: &str =
    "Tab/Shift+Tab move between fields • ←/→ change priority • Enter saves • Esc cancels";
pub(crate) const STATUS_HELP: &str = "Keyboard reference: Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion: arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_DELETE_CANCELLED: &str = "Deletion cancelled";
pub(crate) const STATUS_NOT_FOUND: &str = "Task not found";

pub(crate) const DUE_DATE_HINT: &str = "YYYY-MM-DD, today, tomorrow, fri, +3d (blank for none)";
