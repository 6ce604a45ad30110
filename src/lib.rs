// Core of the quiz: bank, matching engine, session state machine and config.
// The terminal front-end lives in the binary (main.rs, app.rs, event.rs, ui/)
// and reaches everything here through `simeq::*`, as do the integration
// tests and criterion benches.

pub mod bank;
pub mod config;
pub mod engine;
pub mod session;
