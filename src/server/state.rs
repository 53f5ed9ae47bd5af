use std::sync::Mutex;
use std::time::Duration;

pub struct AppState {
    /// HTML of the most recently rendered map, if any batch has run.
    pub last_map: Mutex<Option<String>>,
    pub delay: Duration,
    pub timeout: Duration,
}
