use proptest::prelude::*;
use std::cmp::Ordering;
use wave_search::query::{
    EvalZone, OrderSpec, QueryBuilder, QueryCompiler, SearchError, SearchFilter, SearchScope,
};
use wave_search::{ParticipantId, WaveSummary, WaveletSummary, build_comparator, parse_query};

const DAY: i64 = 86_400_000;
const JAN_1_2023: i64 = 1_672_531_200_000;

fn participant(address: &str) -> ParticipantId {
    ParticipantId::of(address).unwrap()
}

fn wave(id: &str, creator: &str, created: i64, modified: i64) -> WaveSummary {
    WaveSummary::new(id, vec![WaveletSummary::new(
        "conv+root",
        participant(creator),
        created,
        modified,
    )])
}

fn sorted_ids(query: &str, mut waves: Vec<WaveSummary>) -> Vec<String> {
    let parsed = parse_query(query).unwrap();
    let ordering = build_comparator(&parsed);
    waves.sort_by(ordering.comparator());
    waves.iter().map(|w| w.id.to_string()).collect()
}

#[test]
fn test_compound_order_falls_through_to_id() {
    let waves = vec![
        wave("w4", "bob@example.com", 10, 200),
        wave("w2", "alice@example.com", 10, 100),
        wave("w3", "alice@example.com", 20, 100),
        wave("w1", "bob@example.com", 30, 100),
    ];
    let ids = sorted_ids("orderby:dateasc orderby:creatorasc", waves.clone());
    assert_eq!(ids, vec!["w2", "w3", "w1", "w4"]);

    let ids = sorted_ids("orderby:creatordesc orderby:dateasc", waves);
    assert_eq!(ids, vec!["w1", "w4", "w2", "w3"]);
}

#[test]
fn test_default_order_is_newest_first() {
    let waves = vec![
        wave("a", "bob@example.com", 0, 100),
        wave("b", "bob@example.com", 0, 300),
        wave("c", "bob@example.com", 0, 200),
    ];
    assert_eq!(sorted_ids("in:inbox", waves), vec!["b", "c", "a"]);
}

#[test]
fn test_invalid_tokens_are_rejected_with_offending_text() {
    let err = parse_query("in:inbox bogus:value").unwrap_err();
    assert_eq!(err.to_string(), "Invalid query param: bogus:value");
    assert_eq!(err.offending(), "bogus:value");

    let err = parse_query("orderby:sideways").unwrap_err();
    assert_eq!(err.to_string(), "Invalid orderby query value: sideways");

    let err = parse_query("from:20230230").unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
}

#[test]
fn test_search_pipeline_over_json_records() {
    let json = r#"[
        {"id": "example.com/w+1", "wavelets": [
            {"id": "conv+root", "creator": "alice@example.com",
             "creation_time": 1672531200000, "last_modified_time": 1672617600000,
             "participants": ["bob@example.com"]}
        ]},
        {"id": "example.com/w+2", "wavelets": [
            {"id": "conv+root", "creator": "carol@example.com",
             "creation_time": 1672531200000, "last_modified_time": 1675209600000}
        ]},
        {"id": "example.com/w+3", "wavelets": [
            {"id": "conv+root", "creator": "alice@example.com",
             "creation_time": 1672531200000, "last_modified_time": 1672704000000,
             "participants": ["bob@example.com"]},
            {"id": "user+alice@example.com", "creator": "alice@example.com",
             "creation_time": 0, "last_modified_time": 1700000000000}
        ]}
    ]"#;
    let mut waves: Vec<WaveSummary> = serde_json::from_str(json).unwrap();

    let compiler = QueryCompiler::new(EvalZone::Utc);
    let parsed = compiler.parse("with:bob from:20230101 to:20230131 orderby:dateasc").unwrap();
    let filter = SearchFilter::from_parsed(&parsed, "example.com", EvalZone::Utc).unwrap();
    waves.retain(|w| filter.matches(w));
    waves.sort_by(build_comparator(&parsed).comparator());

    let ids: Vec<String> = waves.iter().map(|w| w.id.to_string()).collect();
    assert_eq!(ids, vec!["example.com/w+1", "example.com/w+3"]);
}

#[test]
fn test_to_bound_covers_the_whole_day() {
    let parsed = parse_query("to:20230101").unwrap();
    let filter = SearchFilter::from_parsed(&parsed, "example.com", EvalZone::Utc).unwrap();
    assert!(filter.matches(&wave("late", "bob@example.com", 0, JAN_1_2023 + DAY - 1)));
    assert!(!filter.matches(&wave("next", "bob@example.com", 0, JAN_1_2023 + DAY)));
}

#[test]
fn test_built_query_round_trips_through_compiler() {
    let query = QueryBuilder::new()
        .scope(SearchScope::All)
        .creators("alice, bob@other.org")
        .order_by(OrderSpec::CREATED_DESC)
        .order_by(OrderSpec::CREATOR_ASC)
        .build()
        .unwrap();
    let parsed = parse_query(&query).unwrap();
    let keys = build_comparator(&parsed).keys().to_vec();
    assert_eq!(keys, vec![OrderSpec::CREATED_DESC, OrderSpec::CREATOR_ASC]);
    assert_eq!(QueryCompiler::default().render(&parsed), query);
}

fn arb_wave() -> impl Strategy<Value = WaveSummary> {
    let wavelet = (
        prop::sample::select(vec!["conv+root", "conv+b1", "user+x@example.com"]),
        prop::sample::select(vec!["alice@example.com", "bob@example.com", "zed@other.org"]),
        0i64..4,
        0i64..4,
    )
        .prop_map(|(id, creator, created, modified)| {
            WaveletSummary::new(id, participant(creator), created, modified)
        });
    (0u32..50, prop::collection::vec(wavelet, 0..4))
        .prop_map(|(n, wavelets)| WaveSummary::new(format!("w{}", n), wavelets))
}

fn arb_order_query() -> impl Strategy<Value = String> {
    let tokens: Vec<&'static str> = OrderSpec::ALL.iter().map(|spec| spec.token()).collect();
    prop::collection::vec(prop::sample::select(tokens), 0..4).prop_map(|keys| {
        keys.iter().map(|k| format!("orderby:{}", k)).collect::<Vec<_>>().join(" ")
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        prop::sample::select(vec!["inbox", "shared", "all"]).prop_map(|v| format!("in:{}", v)),
        "[a-z]{1,8}".prop_map(|v| format!("with:{}", v)),
        "[a-z]{1,8}@example\\.com".prop_map(|v| format!("creator:{}", v)),
        "[a-z0-9]{1,6}".prop_map(|v| format!("tag:{}", v)),
        (2000i32..2030, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("from:{:04}{:02}{:02}", y, m, d)),
        (2000i32..2030, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("to:{:04}{:02}{:02}", y, m, d)),
        prop::sample::select(OrderSpec::ALL.to_vec())
            .prop_map(|spec| format!("orderby:{}", spec.token())),
    ];
    prop::collection::vec(token, 0..8).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn test_comparator_is_a_total_order(
        query in arb_order_query(),
        a in arb_wave(),
        b in arb_wave(),
    ) {
        let parsed = parse_query(&query).unwrap();
        let ordering = build_comparator(&parsed);
        prop_assert_eq!(ordering.compare(&a, &b), ordering.compare(&b, &a).reverse());
        prop_assert_eq!(ordering.compare(&a, &a), Ordering::Equal);
        if a.id != b.id {
            prop_assert_ne!(ordering.compare(&a, &b), Ordering::Equal);
        }
    }

    #[test]
    fn test_sorting_is_deterministic(
        query in arb_order_query(),
        waves in prop::collection::vec(arb_wave(), 0..20),
    ) {
        let mut reversed = waves.clone();
        reversed.reverse();
        prop_assert_eq!(sorted_ids(&query, waves), sorted_ids(&query, reversed));
    }

    #[test]
    fn test_render_then_parse_is_identity(query in arb_query()) {
        let compiler = QueryCompiler::new(EvalZone::Utc);
        let parsed = compiler.parse(&query).unwrap();
        let reparsed = compiler.parse(&compiler.render(&parsed)).unwrap();
        prop_assert_eq!(reparsed, parsed);
    }
}
