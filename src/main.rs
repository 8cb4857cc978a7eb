use log::info;

mod browser;
mod config;
mod dom;
mod error;
mod focus;
mod lead_form;
mod manager;
mod page;
mod phone;
mod random;
mod scroll;
mod selectors;
mod submission;
mod throttle;

mod components {
    pub mod lead_modal;
}
mod effects {
    pub mod features;
    pub mod particles;
    pub mod shapes;
    pub mod slideshow;
}

#[cfg(test)]
mod testing;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(err) = console_log::init_with_level(config::log_level()) {
        gloo_console::warn!(format!("error initializing log: {}", err));
    }

    info!("Starting landing page");
    browser::run();
}
