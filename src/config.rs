use log::Level;

/// Where lead submissions are posted. Set at build time through
/// `LANDING_LEAD_ENDPOINT`; without it the page runs against the mock.
pub fn get_lead_endpoint() -> Option<&'static str> {
    option_env!("LANDING_LEAD_ENDPOINT").filter(|endpoint| !endpoint.trim().is_empty())
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // chatty while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
