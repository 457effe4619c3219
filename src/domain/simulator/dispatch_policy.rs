use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

/// Decides which server the engine probes for idleness in the current second.
///
/// Exactly one server is probed per second. The engine calls [`DispatchPolicy::rotate`]
/// once at the end of every second, after all servers were ticked.
pub trait DispatchPolicy: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Size of the server pool the policy probes over.
    fn server_count(&self) -> usize;

    /// Index of the server to probe in the current second.
    fn probe(&self) -> usize;

    fn rotate(&mut self);
}

/// A pool of one server which is probed every second.
#[derive(Debug, Default)]
pub struct SingleServerPolicy;

impl DispatchPolicy for SingleServerPolicy {
    fn name(&self) -> &'static str {
        "single-server"
    }

    fn server_count(&self) -> usize {
        1
    }

    fn probe(&self) -> usize {
        0
    }

    fn rotate(&mut self) {}
}

/// Probes server `0, 1, .., N-1, 0, ..`, one index per second.
///
/// Only the server under the pointer may receive a request in a given second,
/// even if other servers are idle.
#[derive(Debug)]
pub struct RoundRobinPolicy {
    server_count: usize,
    pointer: usize,
}

impl RoundRobinPolicy {
    pub fn new(server_count: usize) -> Result<RoundRobinPolicy> {
        if server_count == 0 {
            return Err(Error::InvalidServerCount(server_count));
        }

        Ok(RoundRobinPolicy { server_count, pointer: 0 })
    }
}

impl DispatchPolicy for RoundRobinPolicy {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn server_count(&self) -> usize {
        self.server_count
    }

    fn probe(&self) -> usize {
        self.pointer
    }

    fn rotate(&mut self) {
        self.pointer = (self.pointer + 1) % self.server_count;
    }
}

/// The available assignment policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PolicyType {
    SingleServer,
    RoundRobin { servers: usize },
}

impl PolicyType {
    /// `None` selects the single-server engine, `Some(n)` the round-robin engine over `n` servers.
    pub fn from_server_count(servers: Option<usize>) -> Result<PolicyType> {
        match servers {
            None => Ok(PolicyType::SingleServer),
            Some(0) => Err(Error::InvalidServerCount(0)),
            Some(servers) => Ok(PolicyType::RoundRobin { servers }),
        }
    }

    pub fn server_count(&self) -> usize {
        match self {
            PolicyType::SingleServer => 1,
            PolicyType::RoundRobin { servers } => *servers,
        }
    }

    /// Factory method to return a concrete instance of a [`DispatchPolicy`] based on the enum variant.
    pub fn get_instance(&self) -> Result<Box<dyn DispatchPolicy>> {
        match self {
            PolicyType::SingleServer => Ok(Box::new(SingleServerPolicy)),
            PolicyType::RoundRobin { servers } => Ok(Box::new(RoundRobinPolicy::new(*servers)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_server_always_probes_index_zero() {
        let mut policy = SingleServerPolicy;

        for _ in 0..5 {
            assert_eq!(policy.probe(), 0);
            policy.rotate();
        }
        assert_eq!(policy.server_count(), 1);
    }

    #[test]
    fn test_round_robin_visits_every_index_in_order() {
        let mut policy = RoundRobinPolicy::new(3).unwrap();

        let mut probed = Vec::new();
        for _ in 0..7 {
            probed.push(policy.probe());
            policy.rotate();
        }

        assert_eq!(probed, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_round_robin_probes_each_index_equally_often() {
        let servers = 4;
        let mut policy = RoundRobinPolicy::new(servers).unwrap();
        let mut counts = vec![0usize; servers];

        for _ in 0..(servers * 250) {
            counts[policy.probe()] += 1;
            policy.rotate();
        }

        assert!(counts.iter().all(|&c| c == 250), "uneven probe counts: {:?}", counts);
    }

    #[test]
    fn test_zero_servers_are_rejected() {
        assert!(matches!(RoundRobinPolicy::new(0), Err(Error::InvalidServerCount(0))));
        assert!(matches!(PolicyType::from_server_count(Some(0)), Err(Error::InvalidServerCount(0))));
    }

    #[test]
    fn test_policy_type_from_server_count() {
        assert_eq!(PolicyType::from_server_count(None).unwrap(), PolicyType::SingleServer);
        assert_eq!(PolicyType::from_server_count(Some(3)).unwrap(), PolicyType::RoundRobin { servers: 3 });
        assert_eq!(PolicyType::RoundRobin { servers: 3 }.get_instance().unwrap().server_count(), 3);
        assert_eq!(PolicyType::SingleServer.get_instance().unwrap().name(), "single-server");
    }
}
