use chrono::NaiveDate;
use questlog_xp::import::{events_from_reader, EventFormat, ImportError};
use questlog_xp::xp::{EventKind, XpConfig, XpEngine, XpError};

const TRACKER_EXPORT: &str = "date,kind,sp,assignees,pr_closes,title,number\n\
2025-09-24T10:00:00Z,issue_closed,3,1,,Quest progress chart,42\n\
2025-09-25T02:30:00Z,pr_merged,5,2,true,Burndown script,43\n\
2025-09-25,docs,,,,Roadmap refresh,\n";

fn chicago_config() -> XpConfig {
    XpConfig {
        timezone: "America/Chicago".to_string(),
        ..XpConfig::standard()
    }
}

#[test]
fn csv_export_runs_through_pipeline() {
    let raw = events_from_reader(TRACKER_EXPORT.as_bytes(), EventFormat::Csv)
        .expect("export parses");
    assert_eq!(raw.len(), 3);

    let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
    let report = engine.run(&raw).expect("pipeline runs");

    let sept_24 = NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date");
    let sept_25 = NaiveDate::from_ymd_opt(2025, 9, 25).expect("valid date");
    assert_eq!(report.daily[&sept_24].events, 1);
    assert_eq!(report.daily[&sept_25].events, 2);

    let view = report.ledger_view();
    assert_eq!(view[0].title.as_deref(), Some("Quest progress chart"));
    assert_eq!(view[0].number, Some(42));
    assert_eq!(view[1].kind, EventKind::PrMerged);
    assert!(view[1].pr_closes);
}

#[test]
fn timezone_moves_late_night_merges_to_previous_day() {
    let raw = events_from_reader(TRACKER_EXPORT.as_bytes(), EventFormat::Csv)
        .expect("export parses");
    let engine = XpEngine::new(chicago_config()).expect("valid config");
    let report = engine.run(&raw).expect("pipeline runs");

    let sept_24 = NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date");
    // 02:30Z is 21:30 CDT on the 24th.
    assert_eq!(report.daily[&sept_24].events, 2);
    assert_eq!(report.daily.len(), 2);
}

#[test]
fn json_export_matches_csv_export() {
    let json = r#"[
        {"date": "2025-09-24T10:00:00Z", "kind": "issue_closed", "sp": 3, "assignees": 1, "title": "Quest progress chart", "number": 42},
        {"date": "2025-09-25T02:30:00Z", "kind": "pr_merged", "sp": 5, "assignees": 2, "pr_closes": true, "title": "Burndown script", "number": 43},
        {"date": "2025-09-25", "kind": "docs", "title": "Roadmap refresh"}
    ]"#;
    let from_json = events_from_reader(json.as_bytes(), EventFormat::Json).expect("json parses");
    let from_csv =
        events_from_reader(TRACKER_EXPORT.as_bytes(), EventFormat::Csv).expect("csv parses");
    assert_eq!(from_json, from_csv);
}

#[test]
fn malformed_rows_surface_as_typed_errors() {
    let broken_json = events_from_reader("{not json".as_bytes(), EventFormat::Json);
    assert!(matches!(broken_json, Err(ImportError::Json(_))));

    let raw = events_from_reader(
        "date,kind,sp\n2025-09-24,issue_closed,many\n".as_bytes(),
        EventFormat::Csv,
    )
    .expect("rows parse");
    let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
    assert!(matches!(
        engine.run(&raw),
        Err(XpError::InvalidStoryPoints { index: 0, .. })
    ));
}

#[test]
fn sprint_fixture_scores_expected_totals() {
    let data = include_bytes!("fixtures/sprint_events.csv");
    let raw = events_from_reader(&data[..], EventFormat::Csv).expect("fixture parses");
    let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
    let report = engine.run(&raw).expect("pipeline runs");

    let daily_xp: Vec<(u32, u64, u32)> = report
        .daily
        .iter()
        .map(|(day, summary)| (chrono::Datelike::day(day), summary.xp, summary.streak))
        .collect();
    // Six docs on the 23rd hit the 60 XP micro cap.
    assert_eq!(
        daily_xp,
        vec![(22, 84, 1), (23, 177, 2), (25, 174, 3), (27, 36, 4)]
    );

    assert_eq!(report.totals.total_xp, 471);
    assert_eq!(report.totals.level.level, 3);
    assert_eq!(report.totals.level.into_level_xp, 149);
    assert_eq!(report.totals.level.level_need, 354);
}
