pub mod diagnostics;
pub mod report;
pub mod request;
pub mod server;
pub mod simulator;
pub mod statistics;
