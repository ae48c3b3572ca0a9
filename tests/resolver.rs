use catalog_match::model::{CandidateQuery, ReferenceEntry, Resolution};
use catalog_match::{MatchConfig, Resolver};
use indexmap::IndexMap;
use serde_json::json;

/// Taxonomy file shape: display name -> platform record with extra fields.
fn reference_set() -> Vec<ReferenceEntry> {
    let taxonomy = r#"{
        "Nintendo Wii": {"id": 5, "name": "Wii", "abbreviation": "wii", "generation": 7},
        "Wii U": {"id": 41, "name": "Wii U"},
        "Sega Dreamcast": {"id": 23, "name": "Dreamcast"},
        "PlayStation 2": {"id": 8, "name": "PlayStation 2"},
        "PlayStation": {"id": 7, "name": "PlayStation"}
    }"#;
    let map: IndexMap<String, ReferenceEntry> = serde_json::from_str(taxonomy).unwrap();
    map.into_values().collect()
}

#[test]
fn platform_batch_over_taxonomy_file_shape() {
    let resolver = Resolver::with_defaults();
    let reference = reference_set();
    let labels: Vec<String> = [
        "Nintendo Wii",
        "sega dreamcast.",
        "Completely Unrelated Text",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let results = resolver.resolve_platform_batch(&labels, &reference);
    assert_eq!(results[0].matched_id, Resolution::Matched(5));
    assert_eq!(results[1].matched_id, Resolution::Matched(23));
    assert_eq!(results[2].matched_id, Resolution::NoMatch);
    assert_eq!(results[0].matched_id.id(), Some(5));
    assert_eq!(results[2].matched_id.id(), None);
}

#[test]
fn resolver_exposes_its_normalizer() {
    let resolver = Resolver::with_defaults();
    assert_eq!(resolver.normalizer().normalize("SEGA Dreamcast"), "dreamcast");
}

#[test]
fn match_results_serialize_with_sentinel() {
    let resolver = Resolver::with_defaults();
    let reference = reference_set();

    let hit = resolver.resolve_platform("Nintendo Wii", &reference);
    let value = serde_json::to_value(&hit).unwrap();
    assert_eq!(value["matched_id"], json!(5));
    assert_eq!(value["evaluated_against"], json!("Wii"));

    let miss = resolver.resolve_platform("Completely Unrelated Text", &reference);
    let value = serde_json::to_value(&miss).unwrap();
    assert_eq!(value["matched_id"], json!("no-match"));
}

#[test]
fn candidate_flow_from_query_file_shape() {
    let queries: Vec<CandidateQuery> = serde_json::from_value(json!([
        {
            "title": "Metal Gear Solid: Snake Eater / developed by Konami.",
            "alternate_titles": ["mgs 3"],
            "candidates": [
                {
                    "id": 999,
                    "name": "Metal Gear Solid 3: Snake Eater Extended Ultimate Edition Bundle"
                },
                {
                    "id": 375,
                    "name": "Metal Gear Solid 3: Snake Eater",
                    "summary": "stealth action",
                    "platforms": [8]
                }
            ]
        },
        {
            "title": "Sifu",
            "candidates": []
        }
    ]))
    .unwrap();

    let resolver = Resolver::with_defaults();
    let matches = resolver.resolve_candidate_batch(&queries);

    let found = matches[0].as_ref().unwrap();
    assert_eq!(found.record.id, 375);
    assert_eq!(found.record.attributes["summary"], json!("stealth action"));
    let result = found.to_result();
    assert_eq!(result.matched_id, Resolution::Matched(375));
    assert!(result.score > 50.0);

    assert!(matches[1].is_none());
}

#[test]
fn config_overrides_apply_to_both_paths() {
    let mut config = MatchConfig::default();
    config.platform_threshold = 99.0;
    config.candidate_threshold = Some(99.0);
    let resolver = Resolver::new(config);
    assert_eq!(resolver.config().candidate_threshold, Some(99.0));

    let reference = reference_set();
    let near = resolver.resolve_platform("Dremcast", &reference);
    assert_eq!(near.matched_id, Resolution::NoMatch);
    assert!(near.score > 50.0);

    let queries: Vec<CandidateQuery> = serde_json::from_value(json!([
        {
            "title": "Dark Souls",
            "candidates": [{"id": 1, "name": "Dark Souls II"}]
        }
    ]))
    .unwrap();
    assert!(resolver.resolve_candidate_batch(&queries)[0].is_none());
}
