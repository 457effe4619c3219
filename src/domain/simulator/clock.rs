/// The logical clock of one simulation run.
///
/// Counts whole seconds starting at 0. It only moves forward through
/// [`LogicalClock::advance`], once per simulation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalClock {
    current_second: i64,
}

impl LogicalClock {
    pub fn new() -> LogicalClock {
        LogicalClock { current_second: 0 }
    }

    pub fn get_current_time_in_s(&self) -> i64 {
        self.current_second
    }

    pub fn advance(&mut self) {
        self.current_second += 1;
    }
}
