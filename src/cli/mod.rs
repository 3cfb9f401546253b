//! Terminal front end for each command

pub mod chart;
pub mod convert;
pub mod history;
pub mod rates;
pub mod setup;
pub mod ui;
pub mod watch;
