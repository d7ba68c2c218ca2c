//! Fingerprint Widget WASM Integration Tests
//!
//! Run with: wasm-pack test --headless --chrome
//! (or --firefox, --safari)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use js_sys::{Array, Object, Reflect};

use fingerprint_wasm::env::browser::BrowserEnv;
use fingerprint_wasm::{collect_digest, Environment, WidgetProfile};

wasm_bindgen_test_configure!(run_in_browser);

fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

// ===== BrowserEnv Probe Tests =====

#[wasm_bindgen_test]
fn screen_metrics_present() {
    let env = BrowserEnv::new();
    let metrics = env.screen_metrics().expect("headless browsers expose screen");
    assert!(metrics.width > 0, "screen width should be positive");
    assert!(metrics.height > 0, "screen height should be positive");
}

#[wasm_bindgen_test]
fn user_agent_present() {
    let env = BrowserEnv::new();
    let ua = env.user_agent().expect("navigator.userAgent should exist");
    assert!(ua.contains("Mozilla"), "unexpected UA: {}", ua);
}

#[wasm_bindgen_test]
fn media_query_answers() {
    let env = BrowserEnv::new();
    assert!(
        env.media_query_matches("(prefers-reduced-motion: reduce)").is_some(),
        "matchMedia should be available"
    );
}

#[wasm_bindgen_test]
fn local_storage_probe_cleans_up() {
    let env = BrowserEnv::new();
    let _ = env.local_storage_writable();
    let leftover = js_sys::eval("window.localStorage.getItem('__fp_probe')").unwrap();
    assert!(leftover.is_null(), "probe key should be removed");
}

#[wasm_bindgen_test]
fn font_probe_measures_widths() {
    let env = BrowserEnv::new();
    let (base, with_candidate) = env
        .probe_font_widths("monospace", "sans-serif", "abcdefghijklmnop")
        .expect("DOM measurement should work in a browser");
    assert!(base > 0.0);
    assert!(with_candidate > 0.0);
}

// ===== Pipeline Tests =====

#[wasm_bindgen_test]
async fn extended_profile_digests_deterministically() {
    let env = BrowserEnv::new();
    let (record, first) = collect_digest(&env, WidgetProfile::Extended).await;
    let (_, second) = collect_digest(&env, WidgetProfile::Extended).await;
    assert!(is_sha256_hex(&first), "bad digest: {}", first);
    assert_eq!(first, second, "same device should digest identically");
    assert_eq!(record.len(), WidgetProfile::Extended.collectors().len());
}

#[wasm_bindgen_test]
async fn exhaustive_profile_collects_every_signal() {
    let env = BrowserEnv::new();
    let (record, hash) = collect_digest(&env, WidgetProfile::Exhaustive).await;
    assert!(is_sha256_hex(&hash));
    assert!(record.get("mathFingerprint").is_some());
    assert!(record.get("audioFingerprint").is_some());
    assert!(record.get("mediaDevicesCount").is_some());
}

// ===== JS Entry Point Tests =====

#[wasm_bindgen_test]
async fn collect_fingerprint_returns_structured_result() {
    let result = fingerprint_wasm::collect_fingerprint(JsValue::UNDEFINED)
        .await
        .expect("collectFingerprint should succeed");

    let digest = Reflect::get(&result, &JsValue::from_str("digest"))
        .unwrap()
        .as_string()
        .unwrap();
    assert!(is_sha256_hex(&digest), "bad digest: {}", digest);

    let profile = Reflect::get(&result, &JsValue::from_str("profile"))
        .unwrap()
        .as_string()
        .unwrap();
    assert_eq!(profile, "extended");

    let signals = Reflect::get(&result, &JsValue::from_str("signals")).unwrap();
    let arr: &Array = signals.unchecked_ref();
    assert_eq!(
        arr.length() as usize,
        WidgetProfile::Extended.collectors().len()
    );

    let first = arr.get(0);
    let label = Reflect::get(&first, &JsValue::from_str("label"))
        .unwrap()
        .as_string()
        .unwrap();
    assert_eq!(label, "Screen Resolution");
}

#[wasm_bindgen_test]
async fn collect_fingerprint_honors_the_profile_option() {
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("profile"),
        &JsValue::from_str("baseline"),
    )
    .unwrap();

    let result = fingerprint_wasm::collect_fingerprint(options.into())
        .await
        .expect("collectFingerprint should succeed");
    let profile = Reflect::get(&result, &JsValue::from_str("profile"))
        .unwrap()
        .as_string()
        .unwrap();
    assert_eq!(profile, "baseline");
}

#[wasm_bindgen_test]
async fn render_fingerprint_fills_the_mount_points() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();

    let hash = document.create_element("div").unwrap();
    hash.set_id("fingerprintHash");
    body.append_child(&hash).unwrap();
    let table = document.create_element("table").unwrap();
    table.set_id("fingerprintTable");
    body.append_child(&table).unwrap();

    fingerprint_wasm::render_fingerprint(JsValue::UNDEFINED)
        .await
        .expect("renderFingerprint should succeed");

    let digest = hash.text_content().unwrap();
    assert!(is_sha256_hex(&digest), "bad digest in DOM: {}", digest);

    let rows = document.query_selector_all("#fingerprintTable tr").unwrap();
    assert_eq!(
        rows.length() as usize,
        WidgetProfile::Extended.collectors().len()
    );

    body.remove_child(&hash).unwrap();
    body.remove_child(&table).unwrap();
}

#[wasm_bindgen_test]
fn relay_report_renders_raw_keys_and_appends_analysis_rows() {
    use fingerprint_wasm::relay::RelayReport;
    use fingerprint_wasm::sink::DomSink;

    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();

    let hash = document.create_element("div").unwrap();
    hash.set_id("relayHash");
    body.append_child(&hash).unwrap();
    let table = document.create_element("table").unwrap();
    table.set_id("relayTable");
    body.append_child(&table).unwrap();

    let sink = DomSink::new("relayHash", "relayTable");
    let report = RelayReport {
        fingerprint: "abc123".to_string(),
        fields: vec![(
            "trustScore".to_string(),
            serde_json::Value::String("99%".to_string()),
        )],
    };
    sink.render_report(&report).unwrap();
    sink.append_fields(&[(
        "crowdBlendingScore".to_string(),
        serde_json::Value::String("A".to_string()),
    )])
    .unwrap();

    assert_eq!(hash.text_content().unwrap(), "abc123");

    let rows = document.query_selector_all("#relayTable tr").unwrap();
    assert_eq!(rows.length(), 2, "analysis rows should append, not replace");
    let first_key = document
        .query_selector("#relayTable tr td")
        .unwrap()
        .unwrap()
        .text_content()
        .unwrap();
    // Relay keys stay in the service's vocabulary.
    assert_eq!(first_key, "trustScore");

    body.remove_child(&hash).unwrap();
    body.remove_child(&table).unwrap();
}

#[wasm_bindgen_test]
async fn render_fingerprint_rejects_missing_mount_points() {
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("hashElement"),
        &JsValue::from_str("noSuchElement"),
    )
    .unwrap();

    let err = fingerprint_wasm::render_fingerprint(options.into())
        .await
        .expect_err("missing element should be reported");
    let msg = err.as_string().unwrap();
    assert!(msg.contains("noSuchElement"), "unexpected error: {}", msg);
}
