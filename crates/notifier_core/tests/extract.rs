use std::sync::Once;

use chrono::{TimeZone, Utc};
use notifier_core::{MalformedPayloadError, Offer, OfferExtractor};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notifier_logging::initialize_for_tests);
}

fn catalog(elements: Value) -> Value {
    json!({ "data": { "Catalog": { "searchStore": { "elements": elements } } } })
}

fn element(title: &str, slug: &str, percentage: Value, end_date: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{title} description"),
        "productSlug": slug,
        "keyImages": [
            { "type": "OfferImageWide", "url": format!("https://cdn.example.com/{slug}-wide.jpg") },
            { "type": "Thumbnail", "url": format!("https://cdn.example.com/{slug}-thumb.jpg") }
        ],
        "promotions": {
            "promotionalOffers": [
                { "promotionalOffers": [
                    { "startDate": "2026-10-15T15:00:00.000Z", "endDate": end_date,
                      "discountSetting": { "discountType": "PERCENTAGE", "discountPercentage": percentage } }
                ] }
            ],
            "upcomingPromotionalOffers": []
        }
    })
}

#[test]
fn single_free_offer_is_normalized() {
    init_logging();
    let raw = catalog(json!([element("Hades", "hades", json!(0), "2026-10-22T15:00:00.000Z")]));

    let offers = OfferExtractor::default().extract(&raw).unwrap();

    assert_eq!(
        offers.as_slice(),
        &[Offer {
            title: "Hades".to_string(),
            description: "Hades description".to_string(),
            image_url: Some("https://cdn.example.com/hades-wide.jpg".to_string()),
            link_url: "https://store.epicgames.com/p/hades".to_string(),
            expiry: Some(Utc.with_ymd_and_hms(2026, 10, 22, 15, 0, 0).unwrap()),
        }]
    );
}

#[test]
fn discounted_but_not_free_is_excluded() {
    init_logging();
    let raw = catalog(json!([
        element("Half Off", "half-off", json!(50), "2026-10-22T15:00:00.000Z"),
        element("Free", "free", json!(0), "2026-10-22T15:00:00.000Z"),
        element("Full Price", "full", json!(100), "2026-10-22T15:00:00.000Z"),
    ]));

    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.titles(), vec!["Free"]);
}

#[test]
fn multiple_free_windows_produce_duplicates() {
    init_logging();
    let mut game = element("Twice", "twice", json!(0), "2026-10-22T15:00:00.000Z");
    let window = game["promotions"]["promotionalOffers"][0].clone();
    game["promotions"]["promotionalOffers"]
        .as_array_mut()
        .unwrap()
        .push(window);

    let offers = OfferExtractor::default().extract(&catalog(json!([game]))).unwrap();
    assert_eq!(offers.len(), 2);
    assert_eq!(offers.as_slice()[0], offers.as_slice()[1]);
}

#[test]
fn elements_without_promotions_are_skipped() {
    init_logging();
    let raw = catalog(json!([
        { "title": "No promos", "promotions": null },
        { "title": "Missing promos" },
        { "title": "Upcoming only", "promotions": { "promotionalOffers": [],
          "upcomingPromotionalOffers": [ { "promotionalOffers": [
              { "discountSetting": { "discountPercentage": 0 } } ] } ] } },
    ]));

    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert!(offers.is_empty());
}

#[test]
fn order_follows_payload() {
    init_logging();
    let raw = catalog(json!([
        element("B", "b", json!(0), "2026-10-22T15:00:00.000Z"),
        element("A", "a", json!(0), "2026-10-22T15:00:00.000Z"),
    ]));
    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.titles(), vec!["B", "A"]);
}

#[test]
fn bad_end_date_leaves_expiry_absent() {
    init_logging();
    let raw = catalog(json!([element("Odd", "odd", json!(0), "next thursday")]));
    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.as_slice()[0].expiry, None);
}

#[test]
fn optional_fields_fall_back() {
    init_logging();
    let raw = catalog(json!([{
        "title": "Bare",
        "productSlug": null,
        "catalogNs": { "mappings": [ { "pageSlug": "bare-game", "pageType": "productHome" } ] },
        "urlSlug": "bare-url-slug",
        "keyImages": [],
        "promotions": { "promotionalOffers": [ { "promotionalOffers": [
            { "discountSetting": { "discountPercentage": 0 } } ] } ] }
    }]));

    let offers = OfferExtractor::new("https://store.example.com/de/p/").extract(&raw).unwrap();
    let offer = &offers.as_slice()[0];
    assert_eq!(offer.description, "");
    assert_eq!(offer.image_url, None);
    assert_eq!(offer.expiry, None);
    assert_eq!(offer.link_url, "https://store.example.com/de/p/bare-game");
}

#[test]
fn url_slug_is_last_resort() {
    init_logging();
    let raw = catalog(json!([{
        "title": "Slugless",
        "urlSlug": "slugless",
        "promotions": { "promotionalOffers": [ { "promotionalOffers": [
            { "discountSetting": { "discountPercentage": 0 } } ] } ] }
    }]));
    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.as_slice()[0].link_url, "https://store.epicgames.com/p/slugless");
}

#[test]
fn missing_nested_structure_is_malformed() {
    init_logging();
    for raw in [
        json!({}),
        json!({ "data": {} }),
        json!({ "data": { "Catalog": { "searchStore": {} } } }),
        json!({ "data": { "Catalog": { "searchStore": { "elements": "nope" } } } }),
    ] {
        let err = OfferExtractor::default().extract(&raw).unwrap_err();
        assert!(matches!(err, MalformedPayloadError::Structure(_)), "{raw}");
    }
}

#[test]
fn free_offer_without_title_is_malformed() {
    init_logging();
    let raw = catalog(json!([
        { "title": "Priced", "promotions": null },
        { "productSlug": "ghost", "promotions": { "promotionalOffers": [ { "promotionalOffers": [
            { "discountSetting": { "discountPercentage": 0 } } ] } ] } }
    ]));
    let err = OfferExtractor::default().extract(&raw).unwrap_err();
    assert!(matches!(err, MalformedPayloadError::MissingTitle { index: 1 }));
}

#[test]
fn odd_fields_on_non_free_elements_are_ignored() {
    init_logging();
    let raw = catalog(json!([
        { "title": 42, "promotions": null },
        { "title": ["bundle"], "keyImages": "none",
          "promotions": { "promotionalOffers": [ { "promotionalOffers": [
              { "discountSetting": { "discountPercentage": 25 } } ] } ] } },
        { "title": "Weird promos", "promotions": "coming soon" },
        element("Hades", "hades", json!(0), "2026-10-22T15:00:00.000Z"),
    ]));

    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.titles(), vec!["Hades"]);
}

#[test]
fn free_element_with_unreadable_fields_is_malformed() {
    init_logging();
    let raw = catalog(json!([
        element("Hades", "hades", json!(0), "2026-10-22T15:00:00.000Z"),
        { "title": 42, "promotions": { "promotionalOffers": [ { "promotionalOffers": [
            { "discountSetting": { "discountPercentage": 0 } } ] } ] } }
    ]));
    let err = OfferExtractor::default().extract(&raw).unwrap_err();
    assert!(matches!(err, MalformedPayloadError::InvalidElement { index: 1, .. }));
}

#[test]
fn non_string_end_date_leaves_expiry_absent() {
    init_logging();
    let mut raw = catalog(json!([element("Odd", "odd", json!(0), "x")]));
    raw["data"]["Catalog"]["searchStore"]["elements"][0]["promotions"]["promotionalOffers"][0]
        ["promotionalOffers"][0]["endDate"] = json!(1_766_000_000);
    let offers = OfferExtractor::default().extract(&raw).unwrap();
    assert_eq!(offers.as_slice()[0].expiry, None);
}
