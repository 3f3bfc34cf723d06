//! Property-based checks for spec.md §8's invariants 1-6, run directly
//! over synthetic `PacketRecord`s (bypassing frame decode, which has its
//! own unit tests) through the real projector/executor/`InMemoryGraph`
//! chain.

use proptest::prelude::*;

use pcapgraph::cache::RecencyCache;
use pcapgraph::graph::{ConnectionKey, Executor, InMemoryGraph, Label};
use pcapgraph::model::{FrameType, IpEndpoints, MacEndpoints, OuiByRole, PacketRecord, Ports};
use pcapgraph::projector::{self, Fidelity, Intent};

const IP_PAIRS: [(&str, &str); 2] = [("10.0.0.1", "10.0.0.2"), ("10.0.0.3", "10.0.0.4")];
const DST_PORTS: [u16; 2] = [80, 443];
const SERVICES: [(&str, i64); 3] = [("http", 999), ("dns", 5), ("unknown", 1)];

fn mac(s: &str) -> pcapgraph::model::MacAddr {
    s.parse().unwrap()
}

/// One record's free variables: which IP pair, which port, a timestamp, a
/// length, and which service/service_layer pairing it carries.
fn record_input() -> impl Strategy<Value = (usize, usize, u32, u32, usize)> {
    (0..IP_PAIRS.len(), 0..DST_PORTS.len(), 0u32..1000, 1u32..1500, 0..SERVICES.len())
}

fn build_record(input: (usize, usize, u32, u32, usize)) -> PacketRecord {
    let (ip_idx, port_idx, ts, len, service_idx) = input;
    let (src, dst) = IP_PAIRS[ip_idx];
    let (service, service_layer) = SERVICES[service_idx];
    PacketRecord {
        protocol: "tcp".to_string(),
        ip: IpEndpoints {
            src: Some(src.parse().unwrap()),
            dst: Some(dst.parse().unwrap()),
        },
        mac: MacEndpoints {
            src: Some(mac("aa:aa:aa:aa:aa:aa")),
            dst: Some(mac("bb:bb:bb:bb:bb:bb")),
            tra: None,
            rec: None,
        },
        oui: OuiByRole::default(),
        ports: Ports {
            src: Some(1000),
            dst: Some(DST_PORTS[port_idx]),
        },
        timestamp: f64::from(ts),
        length: len,
        service: Some(service.to_string()),
        service_layer,
        ssid: None,
        frame_type: FrameType::Beacon,
    }
}

/// Run `records` through project→execute once, with a fresh cache of the
/// given capacity. Returns the final graph and the total number of intents
/// the executor applied.
fn run_sequence(records: &[PacketRecord], cache_capacity: usize) -> (InMemoryGraph, usize) {
    let mut cache = RecencyCache::new(cache_capacity);
    let mut executor = Executor::new(InMemoryGraph::new());
    let mut total_intents = 0usize;
    for (index, record) in records.iter().enumerate() {
        let intents = projector::project(record, Fidelity::Full, &mut cache);
        total_intents += intents.len();
        for intent in &intents {
            executor.execute(intent, index as u64).unwrap();
        }
    }
    (executor.into_client(), total_intents)
}

/// Group key used by every invariant below: `(src_ip, dst_ip, dst_port)`,
/// the distinguishing part of an `IP -[CONNECTED]-> IP` edge at fixed
/// protocol `tcp`.
fn group_key(record: &PacketRecord) -> (String, String, u16) {
    (
        record.ip.src.unwrap().to_string(),
        record.ip.dst.unwrap().to_string(),
        record.ports.dst.unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    /// Invariant 1: replaying the same packet sequence on a fresh graph
    /// twice yields identical final graph state.
    #[test]
    fn idempotent_under_replay(inputs in prop::collection::vec(record_input(), 1..20)) {
        let records: Vec<_> = inputs.into_iter().map(build_record).collect();
        let (first, _) = run_sequence(&records, 50);
        let (second, _) = run_sequence(&records, 50);
        prop_assert_eq!(first, second);
    }

    /// Invariants 2, 3, 4: for every `CONNECTED` edge, `count`/`data_size`
    /// match the contributing packets, `first_seen`/`last_seen` are the
    /// min/max timestamp, and `(service, service_layer)` come from the
    /// contributing packet with the largest `service_layer` (ties: earliest).
    #[test]
    fn connection_aggregates_match_contributing_packets(
        inputs in prop::collection::vec(record_input(), 1..20)
    ) {
        let records: Vec<_> = inputs.into_iter().map(build_record).collect();
        let (graph, _) = run_sequence(&records, 50);

        let mut groups: std::collections::HashMap<(String, String, u16), Vec<&PacketRecord>> =
            std::collections::HashMap::new();
        for record in &records {
            groups.entry(group_key(record)).or_default().push(record);
        }

        for ((src, dst, port), group) in &groups {
            let key = ConnectionKey {
                port: Some(i64::from(*port)),
                protocol: "tcp".to_string(),
            };
            let connection = graph.connection(Label::Ip, src, dst, &key).unwrap();

            let expected_count = group.len() as u64;
            let expected_data_size: u64 = group.iter().map(|r| u64::from(r.length)).sum();
            let expected_first = group.iter().map(|r| r.timestamp).fold(f64::INFINITY, f64::min);
            let expected_last = group.iter().map(|r| r.timestamp).fold(f64::NEG_INFINITY, f64::max);

            let mut dominant: Option<(&str, i64)> = None;
            for record in group {
                let beats_current = match dominant {
                    Some((_, best)) => record.service_layer > best,
                    None => true,
                };
                if beats_current {
                    dominant = Some((record.service.as_deref().unwrap(), record.service_layer));
                }
            }
            let (expected_service, expected_service_layer) = dominant.unwrap();

            prop_assert_eq!(connection.count, expected_count);
            prop_assert_eq!(connection.data_size, expected_data_size);
            prop_assert_eq!(connection.first_seen, Some(expected_first));
            prop_assert_eq!(connection.last_seen, Some(expected_last));
            prop_assert_eq!(connection.service.as_deref(), Some(expected_service));
            prop_assert_eq!(connection.service_layer, Some(expected_service_layer));
        }
    }

    /// Invariant 5: disabling the cache (capacity 0, so nothing ever stays
    /// resident) never changes the final graph — only how many times the
    /// executor is called, since node/edge intents are idempotent on the
    /// graph side but skipped on a cache hit.
    #[test]
    fn disabling_cache_changes_call_count_not_final_graph(
        inputs in prop::collection::vec(record_input(), 1..20)
    ) {
        let records: Vec<_> = inputs.into_iter().map(build_record).collect();
        let (cached, cached_calls) = run_sequence(&records, 50);
        let (uncached, uncached_calls) = run_sequence(&records, 0);

        prop_assert_eq!(cached, uncached);
        prop_assert!(uncached_calls >= cached_calls);
    }

    /// Invariant 6: a `probe_response` frame never produces a `CONNECTED`
    /// MAC edge, only the `PROBE_RESPONSE` simple edge.
    #[test]
    fn probe_response_never_yields_a_connected_edge(
        inputs in prop::collection::vec(record_input(), 1..10)
    ) {
        for input in inputs {
            let mut record = build_record(input);
            record.ip = IpEndpoints::default();
            record.ports = Ports::default();
            record.frame_type = FrameType::ProbeResponse;
            let mut cache = RecencyCache::new(50);
            let intents = projector::project(&record, Fidelity::Full, &mut cache);
            prop_assert!(!intents.iter().any(|i| matches!(i, Intent::UpsertConnection(_))));
        }
    }
}
