use chrono::NaiveDate;
use marathon_dash::error::PlanError;
use marathon_dash::pipeline::plan::{load_plan, parse_start_date, read_plan_rows, PlanCatalog};
use marathon_dash::types::plan::PlanRow;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn three_row_plan_lands_on_consecutive_days() {
    let rows = vec![PlanRow::new("LR8"), PlanRow::new("Rec4"), PlanRow::new("MP6")];
    let entries = load_plan(&rows, Some(date(2024, 1, 1))).expect("plan");

    let dates: Vec<_> = entries.iter().map(|e| e.calendar_date).collect();
    let weekdays: Vec<_> = entries.iter().map(|e| e.weekday_abbrev).collect();
    let distances: Vec<_> = entries.iter().map(|e| e.planned_distance).collect();
    let labels: Vec<_> = entries.iter().map(|e| e.activity_label.as_str()).collect();

    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    assert_eq!(weekdays, vec!["M", "Tu", "W"]);
    assert_eq!(distances, vec![8.0, 4.0, 6.0]);
    assert_eq!(labels, vec!["Long Run", "Recovery", "Marathon Pace"]);
    assert_eq!(entries[0].raw_code, "LR8");
}

#[test]
fn rows_without_code_are_dropped_before_numbering_days() {
    let rows = vec![
        PlanRow::new("GA8"),
        PlanRow { code: None },
        PlanRow::new("   "),
        PlanRow::new("Rest"),
    ];
    let entries = load_plan(&rows, Some(date(2024, 1, 6))).expect("plan");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].calendar_date, date(2024, 1, 7));
    assert_eq!(entries[1].weekday_abbrev, "Su");
    assert_eq!(entries[1].planned_distance, 0.0);
    assert_eq!(entries[1].activity_label, "Rest");
}

#[test]
fn missing_start_date_is_an_error() {
    let rows = vec![PlanRow::new("LR8")];
    assert!(matches!(load_plan(&rows, None), Err(PlanError::MissingStartDate)));
}

#[test]
fn start_date_must_be_iso() {
    assert_eq!(parse_start_date(Some("2024-03-04")).expect("date"), date(2024, 3, 4));
    assert_eq!(parse_start_date(Some(" 2024-03-04 ")).expect("date"), date(2024, 3, 4));
    for raw in [None, Some(""), Some("03/04/2024"), Some("2024-02-30")] {
        assert!(matches!(parse_start_date(raw), Err(PlanError::MissingStartDate)), "{raw:?}");
    }
}

#[test]
fn csv_weekday_column_is_ignored() {
    let csv = "Day,Weekday,Plan\n0,Su,LR8\n1,Su,\n2,Su,\"GA8 w/ 10x100 Sp\"\n";
    let rows = read_plan_rows(csv.as_bytes()).expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].code, None);

    let entries = load_plan(&rows, Some(date(2024, 1, 1))).expect("plan");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].weekday_abbrev, "M");
    assert_eq!(entries[1].weekday_abbrev, "Tu");
    assert_eq!(entries[1].activity_label, "General Aerobic w/ 10x100 Sprints");
    assert_eq!(entries[1].planned_distance, 8.0);
}

#[test]
fn plan_column_match_is_case_insensitive() {
    let rows = read_plan_rows("day,plan\n0,MLR11\n".as_bytes()).expect("rows");
    assert_eq!(rows, vec![PlanRow::new("MLR11")]);
}

#[test]
fn missing_plan_column_names_available_columns() {
    let err = read_plan_rows("Day,Weekday,Workout\n0,M,LR8\n".as_bytes()).expect_err("no plan column");
    match &err {
        PlanError::MissingRequiredColumn { column, available } => {
            assert_eq!(*column, "Plan");
            assert_eq!(available, &vec!["Day".to_string(), "Weekday".to_string(), "Workout".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Day, Weekday, Workout"));
}

#[test]
fn catalog_lists_csv_files_by_stem() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("b-plan.csv"), "Plan\nLR8\n").expect("write");
    std::fs::write(dir.path().join("a-plan.csv"), "Plan\nGA5\nRec4\n").expect("write");
    std::fs::write(dir.path().join("notes.txt"), "not a plan").expect("write");

    let catalog = PlanCatalog::new(dir.path());
    assert_eq!(catalog.list().expect("list"), vec!["a-plan", "b-plan"]);
    assert_eq!(catalog.resolve(None).expect("default"), "a-plan");
    assert_eq!(catalog.resolve(Some("b-plan")).expect("selected"), "b-plan");
    assert_eq!(catalog.read("a-plan").expect("rows").len(), 2);
}

#[test]
fn catalog_rejects_unlisted_ids() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("plan.csv"), "Plan\nLR8\n").expect("write");
    let catalog = PlanCatalog::new(dir.path());

    assert!(matches!(catalog.read("../plan"), Err(PlanError::UnknownPlan(_))));
    assert!(matches!(catalog.resolve(Some("other")), Err(PlanError::UnknownPlan(_))));
}

#[test]
fn bundled_plan_is_a_contiguous_schedule() {
    let catalog = PlanCatalog::new(concat!(env!("CARGO_MANIFEST_DIR"), "/plans"));
    let plan_id = catalog.resolve(None).expect("bundled plan");
    let rows = catalog.read(&plan_id).expect("rows");
    let start = date(2024, 1, 1);
    let entries = load_plan(&rows, Some(start)).expect("plan");

    assert_eq!(entries.len(), 126);
    for (offset, entry) in entries.iter().enumerate() {
        assert_eq!(entry.calendar_date, start + chrono::Days::new(offset as u64));
    }
    assert_eq!(entries.last().map(|e| e.planned_distance), Some(26.2));
}
