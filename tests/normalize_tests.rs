// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pocketclip::assistant::normalize::{
    BUSY_REPLY, CandidateError, DEFAULT_MOOD, coerce_amount, parse_candidate, strip_code_fence,
};
use pocketclip::assistant::{PayloadShape, normalize};
use rust_decimal::Decimal;
use serde_json::json;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

#[test]
fn fenced_json_string_is_unwrapped() {
    let payload = json!("```json\n{\"ai_output\":\"hi\",\"transactions\":[]}\n```");
    let turn = normalize(&payload);
    assert_eq!(turn.shape, PayloadShape::Structured);
    assert_eq!(turn.reply_text, "hi");
    assert!(turn.candidates.is_empty());
    assert!(!turn.is_unusable());
}

#[test]
fn strip_code_fence_leaves_bare_text() {
    assert_eq!(strip_code_fence("  plain  "), "plain");
    assert_eq!(strip_code_fence("```json{}```"), "{}");
}

#[test]
fn reply_falls_back_through_legacy_paths() {
    assert_eq!(normalize(&json!({"content": {"en": "hola"}})).reply_text, "hola");
    assert_eq!(
        normalize(&json!({"content": {"ai_output": "nested"}})).reply_text,
        "nested"
    );
    assert_eq!(
        normalize(&json!({"en": {"ai_output": "under en"}})).reply_text,
        "under en"
    );
    assert_eq!(normalize(&json!({"en": "bare en"})).reply_text, "bare en");
}

#[test]
fn top_level_reply_wins_over_nested() {
    let turn = normalize(&json!({
        "ai_output": "top",
        "content": {"ai_output": "nested", "en": "english"}
    }));
    assert_eq!(turn.reply_text, "top");
}

#[test]
fn missing_reply_uses_busy_text() {
    let turn = normalize(&json!({"transactions": []}));
    assert_eq!(turn.reply_text, BUSY_REPLY);
    assert!(!turn.is_unusable());
}

#[test]
fn transactions_found_at_nested_depths() {
    let one = normalize(&json!({"content": {"transactions": [{"amount": 1}]}}));
    assert_eq!(one.candidates.len(), 1);

    let two = normalize(&json!({"content": {"content": {"transactions": [{}, {}]}}}));
    assert_eq!(two.candidates.len(), 2);

    // A non-array value does not count as a transaction list.
    let bad = normalize(&json!({"transactions": "none", "content": {"transactions": [{}]}}));
    assert_eq!(bad.candidates.len(), 1);
}

#[test]
fn mood_and_seed_are_probed() {
    let turn = normalize(&json!({"ai_output": "x", "content": {"emoji": "happy", "random": 7}}));
    assert_eq!(turn.mood, "happy");
    assert_eq!(turn.seed, 7);

    let turn = normalize(&json!({"ai_output": "x", "random": "12"}));
    assert_eq!(turn.mood, DEFAULT_MOOD);
    assert_eq!(turn.seed, 12);
}

#[test]
fn plain_text_is_accepted_as_reply() {
    let turn = normalize(&json!("Sure, noted."));
    assert_eq!(turn.shape, PayloadShape::PlainText);
    assert_eq!(turn.reply_text, "Sure, noted.");
    assert!(turn.candidates.is_empty());
    assert!(!turn.is_unusable());
}

#[test]
fn broken_json_and_empty_payloads_are_unusable() {
    assert!(normalize(&json!("{\"ai_output\": \"unterminated")).is_unusable());
    assert!(normalize(&json!("```json\n[1, 2\n```")).is_unusable());
    assert!(normalize(&json!("   ")).is_unusable());
    assert!(normalize(&serde_json::Value::Null).is_unusable());
}

#[test]
fn candidate_fields_are_read_with_aliases() {
    let c = parse_candidate(
        &json!({
            "type": "expense",
            "amount": "12.5",
            "category_name": "Food",
            "notes": "lunch",
            "date": "2025-06-01 13:45:00"
        }),
        now(),
    )
    .unwrap();
    assert!(c.is_expense);
    assert_eq!(c.amount, "12.5".parse::<Decimal>().unwrap());
    assert_eq!(c.category_name, "Food");
    assert_eq!(c.note, "lunch");
    assert_eq!(
        c.transaction_date,
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap()
    );
}

#[test]
fn anything_but_expense_is_income() {
    let c = parse_candidate(&json!({"type": "income", "amount": 3}), now()).unwrap();
    assert!(!c.is_expense);
    let c = parse_candidate(&json!({"amount": 3}), now()).unwrap();
    assert!(!c.is_expense);
}

#[test]
fn candidate_dates() {
    let day = parse_candidate(&json!({"date": "2025-01-02"}), now()).unwrap();
    assert_eq!(
        day.transaction_date,
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );

    let absent = parse_candidate(&json!({}), now()).unwrap();
    assert_eq!(absent.transaction_date, now());
    let blank = parse_candidate(&json!({"date": ""}), now()).unwrap();
    assert_eq!(blank.transaction_date, now());

    assert_eq!(
        parse_candidate(&json!({"date": "yesterday"}), now()).unwrap_err(),
        CandidateError::BadDate("yesterday".into())
    );
    assert_eq!(
        parse_candidate(&json!("not an object"), now()).unwrap_err(),
        CandidateError::NotAnObject
    );
}

#[test]
fn amounts_coerce_to_zero_when_unreadable() {
    assert_eq!(coerce_amount(None), Decimal::ZERO);
    assert_eq!(coerce_amount(Some(&json!("abc"))), Decimal::ZERO);
    assert_eq!(coerce_amount(Some(&json!(null))), Decimal::ZERO);
    assert_eq!(
        coerce_amount(Some(&json!(19.99))),
        "19.99".parse::<Decimal>().unwrap()
    );
    assert_eq!(
        coerce_amount(Some(&json!(" 7 "))),
        Decimal::from(7)
    );
}

#[test]
fn envelope_content_is_extracted() {
    use pocketclip::assistant::client::extract_content;
    let body = json!({"code": 0, "data": {"content": "```json\n{\"ai_output\":\"ok\"}\n```"}});
    let content = extract_content(body).unwrap();
    assert_eq!(normalize(&content).reply_text, "ok");

    assert!(extract_content(json!({"data": {"content": null}})).is_err());
    assert!(extract_content(json!({"data": {}})).is_err());
}

#[test]
fn session_models_map_to_service_models() {
    use pocketclip::assistant::model_name_for;
    assert_eq!(model_name_for("ChatGPT"), "gpt-3.5-turbo");
    assert_eq!(model_name_for("DeepSeek"), "deepseek-chat");
    assert_eq!(model_name_for("Qwen"), "qwen-max");
}
