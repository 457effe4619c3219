use crate::domain::request::Request;

/// One unit of service capacity.
///
/// A server holds at most one request. It is idle when `current_request` is
/// `None`; otherwise `time_remaining` counts the ticks left until the request
/// completes.
#[derive(Debug, Clone, Default)]
pub struct Server {
    current_request: Option<Request>,
    time_remaining: i64,
}

impl Server {
    pub fn new() -> Server {
        Server { current_request: None, time_remaining: 0 }
    }

    /// Assigns `request` to this server.
    ///
    /// The caller must make sure the server is idle, this is not re-checked.
    pub fn start_next(&mut self, request: Request) {
        self.time_remaining = request.processing_time();
        self.current_request = Some(request);
    }

    /// Advances the server by one logical second.
    ///
    /// Returns the request that completed during this tick, if any.
    pub fn tick(&mut self) -> Option<Request> {
        if self.current_request.is_none() {
            return None;
        }

        self.time_remaining -= 1;
        if self.time_remaining <= 0 {
            self.time_remaining = 0;
            return self.current_request.take();
        }

        None
    }

    pub fn busy(&self) -> bool {
        self.current_request.is_some()
    }

    pub fn current_request(&self) -> Option<&Request> {
        self.current_request.as_ref()
    }

    pub fn time_remaining(&self) -> i64 {
        self.time_remaining
    }
}
