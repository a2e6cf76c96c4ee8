pub mod cooldown;
pub mod exchange_log;
