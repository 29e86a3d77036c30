use chrono::NaiveDate;
use nippou_core::answers::Answers;
use nippou_core::defaults;
use nippou_core::normalize::normalize;
use nippou_core::report::{DateStyle, generate};
use nippou_core::session::EditSession;
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn full_default_day() {
    let cfg = defaults::config();
    let answers = Answers::from_specs([
        "work/bo-e",
        "social/x-posts=3",
        "study/duo=120",
        "exercise/radio",
        "house/housework",
    ])
    .expect("parse");

    let text = generate(&cfg, Some(date(2024, 1, 15)), "雪でした", &answers, DateStyle::Weekday);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "1月15日（月）");
    assert!(text.contains("\n🗂️ "));
    assert!(text.contains("◯X投稿3ポスト"));
    assert!(text.contains("（120日目）"));
    assert!(text.contains("\n🏃 "));
    assert!(text.contains("\n🏠 "));
    assert!(!text.contains("🎓"), "courses had no checked items");
    assert!(text.ends_with("今日の一言：雪でした\n\n今日もお疲れ様でした🍻"));
}

#[test]
fn categories_render_in_configuration_order_after_edits() {
    let mut session = EditSession::new(defaults::config());
    session.drop_category_at_end("work").expect("drop");
    let answers = Answers::from_specs(["work/bo-a", "house/housework"]).expect("parse");

    let text = generate(session.config(), None, "", &answers, DateStyle::Weekday);
    let house = text.find("🏠").expect("house header");
    let work = text.find("🗂️").expect("work header");
    assert!(house < work);
}

#[test]
fn rendering_shape_input_reports_the_same() {
    let editable = normalize(&json!({ "categories": [
        { "id": "study", "name": "勉強", "items": [ { "id": "duo", "name": "Duolingo", "type": "streak" } ] }
    ] }));
    let rendering = normalize(&json!({ "categories": [
        { "id": "study", "title": "勉強", "items": [ { "id": "duo", "label": "Duolingo", "type": "streak" } ] }
    ] }));
    let answers = Answers::from_specs(["study/duo=5"]).expect("parse");

    assert_eq!(
        generate(&editable, None, "", &answers, DateStyle::Slash),
        generate(&rendering, None, "", &answers, DateStyle::Slash)
    );
}

#[test]
fn answers_for_unknown_items_are_ignored() {
    let cfg = defaults::config();
    let answers = Answers::from_specs(["nowhere/ghost", "work/ghost"]).expect("parse");
    assert_eq!(answers.unknown_keys(&cfg).len(), 2);
    let text = generate(&cfg, None, "", &answers, DateStyle::Weekday);
    assert_eq!(text, "\n今日もお疲れ様でした🍻");
}

#[test]
fn json_answers_document_drives_report() {
    let cfg = defaults::config();
    let answers = Answers::from_json(&json!({
        "social": { "x-posts": { "checked": true, "value": 1 }, "note": true },
        "exercise": { "aerobike": false }
    }))
    .expect("parse");

    let text = generate(&cfg, Some(date(2025, 2, 1)), "", &answers, DateStyle::Slash);
    assert!(text.starts_with("2025/02/01\n\n📣 "));
    assert!(text.contains("◯X投稿1ポスト\n◯note"));
    assert!(!text.contains("🏃"));
}
