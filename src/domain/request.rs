use std::fmt;

/// A request waiting for service.
///
/// Built once from a parsed input row and never mutated afterwards. The pending
/// queue owns it until dispatch, then the server owns it until completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    timestamp: i64,
    processing_time: i64,
}

impl Request {
    pub fn new(timestamp: i64, processing_time: i64) -> Request {
        Request { timestamp, processing_time }
    }

    /// Arrival second of the request.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Number of ticks a server needs to complete the request.
    pub fn processing_time(&self) -> i64 {
        self.processing_time
    }

    /// Wait time of the request if it is dispatched at `dispatch_second`.
    pub fn wait_time_at(&self, dispatch_second: i64) -> i64 {
        dispatch_second - self.timestamp
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request(arrival: {}s, processing: {}s)", self.timestamp, self.processing_time)
    }
}
