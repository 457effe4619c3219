pub mod clock;
pub mod dispatch_policy;
pub mod engine;
