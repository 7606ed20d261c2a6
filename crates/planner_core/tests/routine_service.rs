use chrono::NaiveDate;
use planner_core::db::open_db_in_memory;
use planner_core::{
    HourLabel, RoutineAction, RoutineRepository, RoutineService, RoutineServiceError,
    RoutineSettings, RoutineStore, SqliteRoutineRepository,
};
use uuid::Uuid;

fn edited_store() -> RoutineStore {
    let mut store = RoutineStore::new(RoutineSettings::default());
    store.dispatch(RoutineAction::SelectDuration(2)).unwrap();
    store
        .dispatch(RoutineAction::SelectStartDate(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ))
        .unwrap();
    store.dispatch(RoutineAction::BeginHourEdit(0)).unwrap();
    store.dispatch(RoutineAction::SaveHourEdit).unwrap();
    store
        .dispatch(RoutineAction::CommitCell {
            row: 0,
            column: 0,
            markup: "Gym <script>x</script>".to_string(),
        })
        .unwrap();
    store
}

#[test]
fn save_current_persists_weeks_and_metadata() {
    let conn = open_db_in_memory().unwrap();
    let service = RoutineService::new(SqliteRoutineRepository::try_new(&conn).unwrap());
    let mut store = edited_store();

    let saved = service.save_current(&mut store, "  Winter plan ").unwrap();

    assert_eq!(saved.name, "Winter plan");
    assert_eq!(saved.duration_label, "2 weeks");
    assert_eq!(saved.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(saved.end_date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    assert_eq!(saved.weeks[0].cell(0, 0), Some("Gym "));
    assert_eq!(store.state().loaded.as_ref().map(|l| l.id), Some(saved.id));

    let listed = service.list().unwrap();
    assert_eq!(listed, vec![saved]);
}

#[test]
fn saving_a_loaded_routine_overwrites_it() {
    let conn = open_db_in_memory().unwrap();
    let service = RoutineService::new(SqliteRoutineRepository::try_new(&conn).unwrap());
    let mut store = edited_store();
    let first = service.save_current(&mut store, "Plan").unwrap();

    store.dispatch(RoutineAction::AppendRow).unwrap();
    let second = service.save_current(&mut store, "Plan v2").unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    let listed = service.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Plan v2");
    assert_eq!(listed[0].weeks[0].row_count(), 3);
}

#[test]
fn load_restores_grid_into_fresh_store() {
    let conn = open_db_in_memory().unwrap();
    let service = RoutineService::new(SqliteRoutineRepository::try_new(&conn).unwrap());
    let saved = service.save_current(&mut edited_store(), "Plan").unwrap();

    let mut store = RoutineStore::new(RoutineSettings::default());
    service.load(&mut store, saved.id).unwrap();

    let state = store.state();
    assert_eq!(state.duration_weeks, Some(2));
    assert_eq!(state.current_week, 0);
    assert_eq!(state.editing_weeks, saved.weeks);
    assert!(matches!(
        store.current_table().unwrap().hour_labels()[0],
        HourLabel::At(_)
    ));
}

#[test]
fn deleting_loaded_routine_resets_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    let service = RoutineService::new(repo);
    let mut store = edited_store();
    let saved = service.save_current(&mut store, "Plan").unwrap();

    service.delete(&mut store, saved.id).unwrap();

    assert!(store.state().editing_weeks.is_empty());
    assert!(store.state().loaded.is_none());
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn service_rejects_blank_names_and_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = RoutineService::new(SqliteRoutineRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.save_current(&mut edited_store(), "   "),
        Err(RoutineServiceError::InvalidName)
    ));
    assert!(matches!(
        service.save_current(&mut RoutineStore::new(RoutineSettings::default()), "Plan"),
        Err(RoutineServiceError::NothingToSave)
    ));

    let missing = Uuid::new_v4();
    let mut store = RoutineStore::new(RoutineSettings::default());
    assert!(matches!(
        service.load(&mut store, missing),
        Err(RoutineServiceError::RoutineNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete(&mut store, missing),
        Err(RoutineServiceError::RoutineNotFound(id)) if id == missing
    ));
}

#[test]
fn saved_routine_json_uses_camel_case_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    let service = RoutineService::new(repo);
    let saved = service.save_current(&mut edited_store(), "Plan").unwrap();

    let json = serde_json::to_value(&saved).unwrap();
    assert!(json.get("durationLabel").is_some());
    let week = &json["weeks"][0];
    assert_eq!(week["weekIndex"], 0);
    assert_eq!(week["startDate"], "1/1");
    assert_eq!(week["fullStartDate"], "2024-01-01");
    assert_eq!(week["hourLabels"][0], "08:00");
    assert_eq!(week["hourLabels"][1], "--:--");

    let repo = SqliteRoutineRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get_routine(saved.id).unwrap(), Some(saved));
}
