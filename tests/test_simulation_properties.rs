use server_queue_simulation::domain::diagnostics::NullSink;
use server_queue_simulation::domain::request::Request;
use server_queue_simulation::domain::simulator::dispatch_policy::PolicyType;
use server_queue_simulation::domain::simulator::engine::{SimulationEngine, SimulationOutcome, simulate_many_servers, simulate_one_server};
use server_queue_simulation::domain::statistics::WaitPolicy;
use server_queue_simulation::loader::parser::parse_requests;

fn requests(rows: &[(i64, i64)]) -> Vec<Request> {
    rows.iter().map(|&(timestamp, processing_time)| Request::new(timestamp, processing_time)).collect()
}

fn run(policy_type: PolicyType, reqs: Vec<Request>) -> SimulationOutcome {
    let mut sink = NullSink;
    SimulationEngine::new(policy_type, reqs, WaitPolicy::Signed, &mut sink).unwrap().run()
}

/// A small deterministic workload with bursts and gaps.
fn mixed_workload() -> Vec<(i64, i64)> {
    (0..40).map(|i| (i * 2 + (i % 3), 1 + (i * 7) % 5)).collect()
}

#[test]
fn test_every_request_produces_one_sample() {
    let rows = mixed_workload();

    for policy_type in [PolicyType::SingleServer, PolicyType::RoundRobin { servers: 1 }, PolicyType::RoundRobin { servers: 3 }, PolicyType::RoundRobin { servers: 8 }] {
        let outcome = run(policy_type, requests(&rows));
        assert_eq!(outcome.samples.len(), rows.len(), "sample count differs for {:?}", policy_type);
    }
}

#[test]
fn test_same_arrival_second_request_waits_for_first() {
    let outcome = run(PolicyType::SingleServer, requests(&[(0, 6), (0, 2)]));
    assert_eq!(outcome.samples.as_slice(), &[0, 6]);

    for (t, p1, p2) in [(1, 1, 1), (4, 5, 2), (3, 4, 9)] {
        // The leading request keeps the server busy until second `t`.
        let outcome = run(PolicyType::SingleServer, requests(&[(0, t), (t, p1), (t, p2)]));
        assert_eq!(outcome.samples.as_slice(), &[0, 0, p1]);
    }
}

#[test]
fn test_staggered_arrivals_each_land_on_an_idle_server() {
    let servers = 5;
    let rows: Vec<(i64, i64)> = (0..servers as i64).map(|k| (k, 10 + k)).collect();

    let outcome = run(PolicyType::RoundRobin { servers }, requests(&rows));

    assert!(outcome.samples.as_slice().iter().all(|&w| w == 0), "waits: {:?}", outcome.samples.as_slice());
}

#[test]
fn test_simultaneous_arrivals_are_dispatched_one_probe_per_second() {
    let servers = 4;
    let rows: Vec<(i64, i64)> = (0..servers as i64).map(|k| (0, 20 + k)).collect();

    let outcome = run(PolicyType::RoundRobin { servers }, requests(&rows));

    assert_eq!(outcome.samples.as_slice(), &[0, 1, 2, 3]);
}

#[test]
fn test_longer_service_never_lowers_average_wait() {
    let rows = mixed_workload();
    let policy_types =
        [PolicyType::SingleServer, PolicyType::RoundRobin { servers: 2 }, PolicyType::RoundRobin { servers: 3 }, PolicyType::RoundRobin { servers: 4 }];

    for policy_type in policy_types {
        let baseline = run(policy_type, requests(&rows)).average_wait().unwrap();

        for index in 0..rows.len() {
            for extra in 1..=5 {
                let mut slower = rows.clone();
                slower[index].1 += extra;
                let average = run(policy_type, requests(&slower)).average_wait().unwrap();

                assert!(
                    average >= baseline,
                    "{:?}: slowing request {} by {} lowered average {} -> {}",
                    policy_type,
                    index,
                    extra,
                    baseline,
                    average
                );
            }
        }
    }
}

#[test]
fn test_timestamps_at_the_integer_limit_average_without_overflow() {
    let reqs = parse_requests("9223372036854775807,a,1\n9223372036854775807,b,1\n").unwrap();

    let average = simulate_one_server(&reqs).unwrap();

    // waits are -MAX and 1 - MAX
    assert!((average / -(i64::MAX as f64) - 1.0).abs() < 1e-12, "average {}", average);
}

#[test]
fn test_reference_scenarios() {
    let reqs = requests(&[(0, 5), (1, 3), (2, 2)]);

    assert_eq!(format!("{:.2}", simulate_one_server(&reqs).unwrap()), "3.33");
    assert_eq!(format!("{:.2}", simulate_many_servers(&reqs, 2).unwrap()), "1.00");
}

#[test]
fn test_one_round_robin_server_matches_single_server() {
    let rows = mixed_workload();

    let single = run(PolicyType::SingleServer, requests(&rows));
    let round_robin = run(PolicyType::RoundRobin { servers: 1 }, requests(&rows));

    assert_eq!(single.samples.as_slice(), round_robin.samples.as_slice());
    assert_eq!(single.simulated_seconds, round_robin.simulated_seconds);
}
