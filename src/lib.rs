// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod notifier;
pub mod sampler;
