use std::collections::VecDeque;

use crate::domain::diagnostics::{DiagnosticsSink, DispatchEvent, LogSink};
use crate::domain::request::Request;
use crate::domain::server::Server;
use crate::domain::simulator::clock::LogicalClock;
use crate::domain::simulator::dispatch_policy::{DispatchPolicy, PolicyType};
use crate::domain::statistics::{WaitPolicy, WaitTimeSamples};
use crate::error::Result;

/// Result of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub samples: WaitTimeSamples,
    /// Number of seconds the clock advanced before the pending queue ran dry.
    pub simulated_seconds: i64,
    pub server_count: usize,
    pub policy_type: PolicyType,
}

impl SimulationOutcome {
    pub fn average_wait(&self) -> Result<f64> {
        self.samples.average()
    }
}

/// Drains a backlog of requests over a pool of identical servers.
///
/// Every second the engine
/// 1. probes the one server chosen by the policy and, if it is idle, dispatches the head of the queue to it,
/// 2. ticks every server once, in index order,
/// 3. advances the clock and rotates the policy.
///
/// The run stops as soon as the pending queue is empty. Requests still in
/// service at that point do not influence the recorded waits.
pub struct SimulationEngine<'a> {
    policy_type: PolicyType,
    policy: Box<dyn DispatchPolicy>,
    servers: Vec<Server>,
    pending: VecDeque<Request>,
    clock: LogicalClock,
    samples: WaitTimeSamples,
    sink: &'a mut dyn DiagnosticsSink,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(policy_type: PolicyType, requests: Vec<Request>, wait_policy: WaitPolicy, sink: &'a mut dyn DiagnosticsSink) -> Result<Self> {
        let policy = policy_type.get_instance()?;
        let servers = (0..policy.server_count()).map(|_| Server::new()).collect();

        Ok(SimulationEngine {
            policy_type,
            policy,
            servers,
            pending: requests.into(),
            clock: LogicalClock::new(),
            samples: WaitTimeSamples::new(wait_policy),
            sink,
        })
    }

    pub fn run(mut self) -> SimulationOutcome {
        log::debug!(
            "Starting {} simulation with {} server(s) and {} pending request(s).",
            self.policy.name(),
            self.servers.len(),
            self.pending.len()
        );

        while !self.pending.is_empty() {
            self.step();
        }

        let outcome = SimulationOutcome {
            samples: self.samples,
            simulated_seconds: self.clock.get_current_time_in_s(),
            server_count: self.servers.len(),
            policy_type: self.policy_type,
        };
        self.sink.on_finish(&outcome);

        outcome
    }

    fn step(&mut self) {
        let now = self.clock.get_current_time_in_s();
        let server_index = self.policy.probe();

        let server = &mut self.servers[server_index];
        if !server.busy() {
            if let Some(request) = self.pending.pop_front() {
                server.start_next(request);
                let wait = self.samples.record(request.wait_time_at(now));
                self.sink.on_dispatch(&DispatchEvent { second: now, server_index, request, wait });
            }
        }

        for (index, server) in self.servers.iter_mut().enumerate() {
            if let Some(completed) = server.tick() {
                self.sink.on_completion(now, index, &completed);
            }
        }

        self.clock.advance();
        self.policy.rotate();
    }
}

/// Runs `requests` through a single server and returns the average wait.
pub fn simulate_one_server(requests: &[Request]) -> Result<f64> {
    let mut sink = LogSink;
    SimulationEngine::new(PolicyType::SingleServer, requests.to_vec(), WaitPolicy::Signed, &mut sink)?.run().average_wait()
}

/// Runs `requests` through `servers` round-robin probed servers and returns the average wait.
pub fn simulate_many_servers(requests: &[Request], servers: usize) -> Result<f64> {
    let mut sink = LogSink;
    let policy_type = PolicyType::from_server_count(Some(servers))?;
    SimulationEngine::new(policy_type, requests.to_vec(), WaitPolicy::Signed, &mut sink)?.run().average_wait()
}
