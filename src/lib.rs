mod clock;
mod config;
mod date;
mod errors;
mod notify;
mod page;
mod store;
mod telemetry;

pub use clock::{ClockOverride, DateArg};
pub use config::NotifyConfig;
pub use date::PageDate;
pub use errors::Error;
pub use notify::TimeUpdateNotifier;
pub use page::PageContext;
pub use store::{
    FAKE_DATE_KEY, TICK_START_KEY, get_fake_date, get_tick_start_timestamp, is_override_active,
    set_fake_date, set_tick_start_timestamp,
};
