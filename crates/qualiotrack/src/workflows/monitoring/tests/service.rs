use super::common::*;
use crate::catalog::IndicatorId;
use crate::workflows::monitoring::bootstrap::{FeedBootstrapConfig, FeedSeed};
use crate::workflows::monitoring::domain::ItemId;
use crate::workflows::monitoring::service::ValidationRefused;

fn bootstrap_config() -> FeedBootstrapConfig {
    FeedBootstrapConfig {
        feeds: vec![
            FeedSeed {
                name: "Journal officiel".to_string(),
                url: "https://jo.example/rss".to_string(),
                default_indicator_code: Some("23".to_string()),
                comment: None,
            },
            FeedSeed {
                name: "Observatoire des métiers".to_string(),
                url: "https://metiers.example/rss".to_string(),
                default_indicator_code: Some("24".to_string()),
                comment: Some("ajouté à la demande de la direction".to_string()),
            },
        ],
    }
}

#[test]
fn bootstrap_registers_each_url_once() {
    let harness = build_service(ScriptedFetcher::default());
    let config = bootstrap_config();

    let first = harness
        .service
        .bootstrap_feeds(&site(), &config)
        .expect("bootstrap succeeds");
    assert_eq!(first, 2);

    let second = harness
        .service
        .bootstrap_feeds(&site(), &config)
        .expect("re-running bootstrap is safe");
    assert_eq!(second, 0);
    assert_eq!(harness.feeds.all().len(), 2);
}

#[test]
fn bootstrap_resolves_default_indicator_codes() {
    let harness = build_service(ScriptedFetcher::default());
    harness
        .service
        .bootstrap_feeds(&site(), &bootstrap_config())
        .expect("bootstrap succeeds");

    let feeds = harness.feeds.all();
    let jo = feeds
        .iter()
        .find(|f| f.url == "https://jo.example/rss")
        .expect("feed registered");
    let indicator = jo.default_indicator.expect("default resolved");
    let definition = catalog().get(indicator).expect("indicator exists").clone();
    assert_eq!(definition.code, "23");
}

#[test]
fn bootstrap_ignores_blank_urls_and_unknown_codes() {
    let harness = build_service(ScriptedFetcher::default());
    let config = FeedBootstrapConfig {
        feeds: vec![
            FeedSeed {
                name: "Sans adresse".to_string(),
                url: "   ".to_string(),
                default_indicator_code: None,
                comment: None,
            },
            FeedSeed {
                name: "Code hors critère".to_string(),
                url: "https://autre.example/rss".to_string(),
                // code 1 exists but is outside the monitoring criterion
                default_indicator_code: Some("1".to_string()),
                comment: None,
            },
        ],
    };

    let added = harness
        .service
        .bootstrap_feeds(&site(), &config)
        .expect("bootstrap succeeds");
    assert_eq!(added, 1);
    let feeds = harness.feeds.all();
    assert_eq!(feeds.len(), 1);
    assert!(feeds[0].default_indicator.is_none());
}

#[test]
fn validation_requires_an_existing_item() {
    let harness = build_service(ScriptedFetcher::default());
    match harness
        .service
        .create_validation(ItemId(99), IndicatorId(23), "auditrice", &site())
    {
        Err(ValidationRefused::ItemNotFound) => {}
        other => panic!("expected item-not-found refusal, got {other:?}"),
    }
}

#[test]
fn validation_rejects_unknown_indicators() {
    let harness = build_service(ScriptedFetcher::default());
    let feed = register_feed(&harness, "Flux", "https://a.example/rss");
    let item = seed_item(&harness, feed.id, "jo-1");

    match harness
        .service
        .create_validation(item.id, IndicatorId(999), "auditrice", &site())
    {
        Err(ValidationRefused::IndicatorNotFound) => {}
        other => panic!("expected indicator-not-found refusal, got {other:?}"),
    }
}

#[test]
fn validation_rejects_indicators_outside_the_monitoring_criterion() {
    let harness = build_service(ScriptedFetcher::default());
    let feed = register_feed(&harness, "Flux", "https://a.example/rss");
    let item = seed_item(&harness, feed.id, "jo-1");

    // IndicatorId(1) is "Information du public", criterion 1.
    match harness
        .service
        .create_validation(item.id, IndicatorId(1), "auditrice", &site())
    {
        Err(ValidationRefused::NotMonitoringIndicator) => {}
        other => panic!("expected criterion refusal, got {other:?}"),
    }
}

#[test]
fn validation_records_site_and_clips_the_validator() {
    let harness = build_service(ScriptedFetcher::default());
    let feed = register_feed(&harness, "Flux", "https://a.example/rss");
    let item = seed_item(&harness, feed.id, "jo-1");

    let long_name = "a".repeat(300);
    let validation = harness
        .service
        .create_validation(item.id, IndicatorId(23), &long_name, &site())
        .expect("validation accepted");
    assert_eq!(validation.validated_by.chars().count(), 200);
    assert_eq!(validation.site, site());
}

#[test]
fn duplicate_validations_are_kept_as_audit_entries() {
    let harness = build_service(ScriptedFetcher::default());
    let feed = register_feed(&harness, "Flux", "https://a.example/rss");
    let item = seed_item(&harness, feed.id, "jo-1");

    for _ in 0..2 {
        harness
            .service
            .create_validation(item.id, IndicatorId(23), "auditrice", &site())
            .expect("validation accepted");
    }
    assert_eq!(harness.validations.all().len(), 2);
}
