use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::request::Request;
use crate::domain::simulator::engine::SimulationOutcome;
use crate::error::Result;

/// A request was assigned to a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEvent {
    pub second: i64,
    pub server_index: usize,
    pub request: Request,
    /// Wait as stored in the sample set, i.e. after the wait policy was applied.
    pub wait: i64,
}

/// Receives the events of exactly one simulation run.
///
/// A sink is built by the caller, handed to the engine for the duration of
/// `run` and inspected afterwards. Nothing is shared between runs.
pub trait DiagnosticsSink {
    fn on_dispatch(&mut self, event: &DispatchEvent);

    fn on_completion(&mut self, second: i64, server_index: usize, request: &Request);

    fn on_finish(&mut self, _outcome: &SimulationOutcome) {}
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn on_dispatch(&mut self, _event: &DispatchEvent) {}

    fn on_completion(&mut self, _second: i64, _server_index: usize, _request: &Request) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn on_dispatch(&mut self, event: &DispatchEvent) {
        log::debug!("Second {}: dispatched {} to server {} after waiting {}s.", event.second, event.request, event.server_index, event.wait);
    }

    fn on_completion(&mut self, second: i64, server_index: usize, request: &Request) {
        log::trace!("Second {}: server {} completed {}.", second, server_index, request);
    }

    fn on_finish(&mut self, outcome: &SimulationOutcome) {
        log::info!(
            "Simulation finished after {}s on {} server(s) with {} dispatched request(s).",
            outcome.simulated_seconds,
            outcome.server_count,
            outcome.samples.len()
        );
    }
}

/// Forwards every event to each of the wrapped sinks, in order.
#[derive(Default)]
pub struct FanOutSink<'a> {
    sinks: Vec<&'a mut dyn DiagnosticsSink>,
}

impl<'a> FanOutSink<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: &'a mut dyn DiagnosticsSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl DiagnosticsSink for FanOutSink<'_> {
    fn on_dispatch(&mut self, event: &DispatchEvent) {
        for sink in self.sinks.iter_mut() {
            sink.on_dispatch(event);
        }
    }

    fn on_completion(&mut self, second: i64, server_index: usize, request: &Request) {
        for sink in self.sinks.iter_mut() {
            sink.on_completion(second, server_index, request);
        }
    }

    fn on_finish(&mut self, outcome: &SimulationOutcome) {
        for sink in self.sinks.iter_mut() {
            sink.on_finish(outcome);
        }
    }
}

/// Columns of the diagnostics CSV, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatParameter {
    /// Logical second of the event.
    Second,

    /// "DISPATCH" or "COMPLETION"
    Event,

    /// Index of the server in the pool
    Server,

    /// Arrival timestamp of the request
    Timestamp,

    ProcessingTime,

    /// Only set for dispatch events
    Wait,
}

impl StatParameter {
    pub const ALL: [StatParameter; 6] =
        [StatParameter::Second, StatParameter::Event, StatParameter::Server, StatParameter::Timestamp, StatParameter::ProcessingTime, StatParameter::Wait];

    pub fn header(&self) -> &'static str {
        match self {
            StatParameter::Second => "Second",
            StatParameter::Event => "Event",
            StatParameter::Server => "Server",
            StatParameter::Timestamp => "Timestamp",
            StatParameter::ProcessingTime => "ProcessingTime",
            StatParameter::Wait => "Wait",
        }
    }

    pub fn headers() -> Vec<&'static str> {
        Self::ALL.iter().map(StatParameter::header).collect()
    }
}

/// store values in their native format, only format them when writing to the CSV.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Integer(i64),
    Text(String),
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Integer(v)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Integer(v as i64)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

impl StatValue {
    fn render(&self) -> String {
        match self {
            StatValue::Integer(i) => i.to_string(),
            StatValue::Text(t) => t.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticEvent {
    data: HashMap<StatParameter, StatValue>,
}

impl StatisticEvent {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn set<V: Into<StatValue>>(&mut self, param: StatParameter, value: V) -> &mut Self {
        self.data.insert(param, value.into());
        self
    }

    pub fn get(&self, param: StatParameter) -> Option<&StatValue> {
        self.data.get(&param)
    }

    fn to_row(&self) -> Vec<String> {
        StatParameter::ALL
            .iter()
            .map(|param| match self.data.get(param) {
                Some(value) => value.render(),
                None => "NA".to_string(),
            })
            .collect()
    }
}

/// Collects the events of one run in memory and writes them as a `;` separated table.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    events: Vec<StatisticEvent>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[StatisticEvent] {
        &self.events
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

        csv_wtr.write_record(StatParameter::headers())?;
        for event in &self.events {
            csv_wtr.write_record(event.to_row())?;
        }
        csv_wtr.flush()?;

        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_csv(file)?;
        log::info!("Wrote {} diagnostic event(s) to '{}'.", self.events.len(), path.as_ref().display());
        Ok(())
    }
}

impl DiagnosticsSink for StatsRecorder {
    fn on_dispatch(&mut self, event: &DispatchEvent) {
        let mut stat = StatisticEvent::new();
        stat.set(StatParameter::Second, event.second)
            .set(StatParameter::Event, "DISPATCH")
            .set(StatParameter::Server, event.server_index)
            .set(StatParameter::Timestamp, event.request.timestamp())
            .set(StatParameter::ProcessingTime, event.request.processing_time())
            .set(StatParameter::Wait, event.wait);
        self.events.push(stat);
    }

    fn on_completion(&mut self, second: i64, server_index: usize, request: &Request) {
        let mut stat = StatisticEvent::new();
        stat.set(StatParameter::Second, second)
            .set(StatParameter::Event, "COMPLETION")
            .set(StatParameter::Server, server_index)
            .set(StatParameter::Timestamp, request.timestamp())
            .set(StatParameter::ProcessingTime, request.processing_time());
        self.events.push(stat);
    }
}
