//! End-to-end tests for the itinerary pipeline: aggregation, scheduling, and
//! assembly driven through `TripPlanner` with fake search sources.

use std::collections::HashMap;
use std::sync::Arc;

use tabi_core::itinerary::{AssemblerOptions, SLOTS_PER_DAY};
use tabi_core::schedule::fallback_titles;
use tabi_core::search::{CandidateAggregator, QuerySet};
use tabi_core::style;
use tabi_core::trip::{MAX_DAYS, PlannerOptions, TripPlanner, TripRequest};
use tabi_test_utils::{FailingSearch, ScriptedSearch, seeded_rng};

const SLOT_TIMES: [&str; SLOTS_PER_DAY] = ["09:00", "11:00", "12:30", "15:00", "18:00"];

fn kyoto_search() -> ScriptedSearch {
    ScriptedSearch::new()
        .with_results("京都 観光", ["清水寺", "金閣寺", "嵐山"])
        .with_results("京都 名所", ["金閣寺", "伏見稲荷大社", "二条城"])
        .with_results("京都 寺", ["清水寺", "銀閣寺", "東寺"])
        .with_results("京都 神社", ["伏見稲荷大社", "八坂神社", "下鴨神社"])
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn aggregator_merges_in_query_order_without_duplicates() {
    let aggregator = CandidateAggregator::new(Arc::new(kyoto_search()));
    let pool = aggregator.collect("京都").await;
    assert_eq!(
        pool.titles(),
        [
            "清水寺",
            "金閣寺",
            "嵐山",
            "伏見稲荷大社",
            "二条城",
            "銀閣寺",
            "東寺",
            "八坂神社",
            "下鴨神社",
        ]
    );
}

#[tokio::test]
async fn aggregator_issues_each_query_with_the_limit() {
    let search = Arc::new(ScriptedSearch::new());
    let aggregator = CandidateAggregator::new(search.clone()).with_query_set(QuerySet::Rich);
    aggregator.collect("奈良").await;

    let calls = search.calls();
    let queries: Vec<&str> = calls.iter().map(|(q, _)| q.as_str()).collect();
    assert_eq!(queries, QuerySet::Rich.queries("奈良"));
    assert!(calls.iter().all(|(_, limit)| *limit == 10));
}

#[tokio::test]
async fn aggregator_caps_results_per_query() {
    let many: Vec<String> = (0..25).map(|i| format!("spot-{i}")).collect();
    let search = ScriptedSearch::new().with_results("大阪 観光", many);
    let pool = CandidateAggregator::new(Arc::new(search))
        .with_query_set(QuerySet::Basic)
        .with_limit(4)
        .collect("大阪")
        .await;
    assert_eq!(pool.titles(), ["spot-0", "spot-1", "spot-2", "spot-3"]);
}

#[tokio::test]
async fn aggregator_swallows_individual_failures() {
    let search = kyoto_search().failing_on("京都 名所");
    let pool = CandidateAggregator::new(Arc::new(search)).collect("京都").await;
    assert!(!pool.contains("二条城"), "failed query must contribute nothing");
    assert!(pool.contains("清水寺"));
    assert!(pool.contains("八坂神社"));
}

#[tokio::test]
async fn aggregator_returns_empty_pool_when_everything_fails() {
    let search = Arc::new(FailingSearch::new());
    let pool = CandidateAggregator::new(search.clone()).collect("京都").await;
    assert!(pool.is_empty());
    assert_eq!(search.attempts(), QuerySet::Standard.queries("京都").len());
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn itinerary_shape_holds_for_every_trip_length() {
    let planner = TripPlanner::new(Arc::new(kyoto_search()), PlannerOptions::default());
    for days in 1..=MAX_DAYS {
        let request = TripRequest::new("京都", days, "王道観光").unwrap();
        let it = planner.generate(&request, &mut seeded_rng(days as u64)).await;

        assert_eq!(it.days.len(), days);
        assert_eq!(it.slot_count(), days * SLOTS_PER_DAY);
        for (i, day) in it.days.iter().enumerate() {
            assert_eq!(day.day, i + 1);
            let times: Vec<&str> = day.schedule.iter().map(|s| s.time.as_str()).collect();
            assert_eq!(times, SLOT_TIMES);
        }
    }
}

#[tokio::test]
async fn titles_come_from_search_or_fallbacks() {
    let planner = TripPlanner::new(Arc::new(kyoto_search()), PlannerOptions::default());
    let request = TripRequest::new("京都", 3, "王道観光").unwrap();
    let it = planner.generate(&request, &mut seeded_rng(11)).await;

    let pool = CandidateAggregator::new(Arc::new(kyoto_search()))
        .collect("京都")
        .await;
    let fallbacks = fallback_titles("京都");
    for title in it.titles() {
        assert!(
            pool.contains(title) || fallbacks.iter().any(|f| f == title),
            "unexpected title {title}"
        );
    }

    // 9 found + 6 fallbacks = 15 unique titles for 15 slots.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for title in it.titles() {
        *counts.entry(title).or_default() += 1;
    }
    assert_eq!(counts.len(), 15);
}

#[tokio::test]
async fn zero_search_results_still_yield_a_full_itinerary() {
    let planner = TripPlanner::new(Arc::new(FailingSearch::new()), PlannerOptions::default());
    let request = TripRequest::new("富良野", 4, "ゆったり").unwrap();
    let it = planner.generate(&request, &mut seeded_rng(3)).await;

    assert_eq!(it.destination, "富良野");
    assert_eq!(it.slot_count(), 20);
    let fallbacks = fallback_titles("富良野");
    assert!(it.titles().all(|t| fallbacks.iter().any(|f| f == t)));
    for day in &it.days {
        assert!(day.schedule.iter().all(|s| !s.title.is_empty()));
    }
}

#[tokio::test]
async fn style_profile_drives_tips() {
    let planner = TripPlanner::new(Arc::new(kyoto_search()), PlannerOptions::default());
    let request = TripRequest::new("京都", 2, "食べ歩き多め").unwrap();
    let it = planner.generate(&request, &mut seeded_rng(1)).await;

    let profile = style::resolve("食べ歩き多め");
    for day in &it.days {
        assert!(day.theme.is_none());
        assert!(day.schedule.iter().all(|s| s.tips == profile.tips_base));
    }
}

#[tokio::test]
async fn rich_options_theme_every_day() {
    let options = PlannerOptions {
        query_set: QuerySet::Rich,
        assembler: AssemblerOptions {
            themed_days: true,
            randomized_tips: true,
        },
    };
    let planner = TripPlanner::new(Arc::new(kyoto_search()), options);
    let request = TripRequest::new("京都", 3, "落ち着いた旅").unwrap();
    let it = planner.generate(&request, &mut seeded_rng(8)).await;

    let profile = style::resolve("落ち着いた旅");
    for day in &it.days {
        let theme = day.theme.as_deref().expect("theme expected");
        assert!(profile.theme_pool.iter().any(|t| t == theme));
        assert!(day.schedule.iter().all(|s| profile.tip_pool.contains(&s.tips)));
    }
}

#[tokio::test]
async fn same_seed_same_itinerary() {
    let planner = TripPlanner::new(Arc::new(kyoto_search()), PlannerOptions::default());
    let request = TripRequest::new("京都", 5, "写真映え").unwrap();
    let a = planner.generate(&request, &mut seeded_rng(2024)).await;
    let b = planner.generate(&request, &mut seeded_rng(2024)).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn itinerary_serializes_for_the_presentation_layer() {
    let planner = TripPlanner::new(Arc::new(FailingSearch::new()), PlannerOptions::default());
    let request = TripRequest::new("松本", 1, "").unwrap();
    let it = planner.generate(&request, &mut seeded_rng(0)).await;

    let json = serde_json::to_value(&it).unwrap();
    assert_eq!(json["destination"], "松本");
    assert_eq!(json["days"][0]["day"], 1);
    assert!(json["days"][0].get("theme").is_none());
    assert_eq!(json["days"][0]["schedule"][2]["time"], "12:30");
    assert_eq!(json["days"][0]["schedule"][2]["label"], "昼");
}
