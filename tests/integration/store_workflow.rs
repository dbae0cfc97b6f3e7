/// Store and check-off workflow against a real database file
use chrono::NaiveDate;
use habit_streaks::tools::*;
use habit_streaks::*;
use tempfile::{tempdir, TempDir};

fn open_storage() -> (TempDir, SqliteStorage) {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let storage = SqliteStorage::new(temp_dir.path().join("habits.db"))
        .expect("Failed to create storage");
    (temp_dir, storage)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn create(storage: &SqliteStorage, name: &str, cadence: &str) {
    create_habit(
        storage,
        CreateHabitParams {
            name: name.to_string(),
            description: format!("{} description", name),
            cadence: cadence.to_string(),
        },
    )
    .expect("Failed to create habit");
}

#[test]
fn test_create_then_get_full_record() {
    let (_dir, storage) = open_storage();
    let habit = Habit::new("Meditate".to_string(), "Ten quiet minutes".to_string(), Cadence::Daily).unwrap();
    storage.create_habit(&habit).unwrap();

    let loaded = storage.get_habit("Meditate").unwrap();
    assert_eq!(loaded.name, "Meditate");
    assert_eq!(loaded.description, "Ten quiet minutes");
    assert_eq!(loaded.cadence, Cadence::Daily);
    assert_eq!(loaded.created_at, habit.created_at);
    assert!(loaded.completed_dates.is_empty());

    let duplicate = storage.create_habit(&habit);
    assert!(matches!(duplicate, Err(StorageError::DuplicateName { .. })));
}

#[test]
fn test_daily_check_off_sequence_with_gap() {
    let (_dir, storage) = open_storage();
    create(&storage, "Journal", "daily");
    let engine = StreakEngine::new();

    let start = date("2023-01-01");
    for offset in (0..16).chain(17..29) {
        let day = start + chrono::Duration::days(offset);
        engine.check_off(&storage, "Journal", Some(Cadence::Daily), day).unwrap();
    }

    assert_eq!(
        storage.get_streaks("Journal", Cadence::Daily).unwrap(),
        StreakCounts::new(12, 16)
    );
    assert_eq!(storage.get_habit("Journal").unwrap().completed_dates.len(), 28);
}

#[test]
fn test_weekly_check_off_sequence_with_gap() {
    let (_dir, storage) = open_storage();
    create(&storage, "Long Run", "weekly");
    let engine = StreakEngine::new();

    for day in ["2023-01-01", "2023-01-08", "2023-01-15", "2023-01-22", "2023-02-04", "2023-02-11"] {
        engine.check_off(&storage, "Long Run", Some(Cadence::Weekly), date(day)).unwrap();
    }

    let streaks = storage.get_streaks("Long Run", Cadence::Weekly).unwrap();
    assert_eq!(streaks, StreakCounts::new(2, 4));
}

#[test]
fn test_append_completion_twice_keeps_one_entry() {
    let (_dir, storage) = open_storage();
    create(&storage, "Stretch", "daily");

    storage.append_completion("Stretch", date("2023-04-01")).unwrap();
    storage.append_completion("Stretch", date("2023-04-01")).unwrap();

    let dates = storage.get_summary("Stretch").unwrap().completed_dates;
    assert_eq!(dates.to_strings(), vec!["2023-04-01"]);
}

#[test]
fn test_delete_then_get() {
    let (_dir, storage) = open_storage();
    create(&storage, "Stretch", "daily");

    storage.delete_habit("Stretch").unwrap();
    assert!(matches!(storage.get_habit("Stretch"), Err(StorageError::HabitNotFound { .. })));
}

#[test]
fn test_rename_collision_leaves_record_unchanged() {
    let (_dir, storage) = open_storage();
    create(&storage, "Read", "daily");
    create(&storage, "Write", "weekly");
    storage.append_completion("Read", date("2023-01-01")).unwrap();

    let err = update_habit(
        &storage,
        UpdateHabitParams {
            name: "read".to_string(),
            new_name: "write".to_string(),
            description: "Overwritten".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    let read = storage.get_habit("Read").unwrap();
    assert_eq!(read.description, "Read description");
    assert_eq!(read.completed_dates.len(), 1);
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("habits.db");

    {
        let storage = SqliteStorage::new(db_path.clone()).unwrap();
        create(&storage, "Floss", "daily");
        StreakEngine::new()
            .check_off(&storage, "Floss", None, date("2023-06-01"))
            .unwrap();
    }

    let storage = SqliteStorage::new(db_path).unwrap();
    let habit = storage.get_habit("Floss").unwrap();
    assert_eq!(habit.completed_dates.to_strings(), vec!["2023-06-01"]);
    assert_eq!(habit.streaks(), StreakCounts::new(1, 1));

    let best = storage.longest_streak_record().unwrap().unwrap();
    assert_eq!(best.name, "Floss");
}

#[test]
fn test_listing_filters_and_renders() {
    let (_dir, storage) = open_storage();
    create(&storage, "Walk", "daily");
    create(&storage, "Call Family", "weekly");
    create(&storage, "Floss", "daily");

    let all = list_habits(&storage, ListHabitsParams { cadence: None }).unwrap();
    assert_eq!(all.listing.rows.len(), 3);

    let daily = list_habits(&storage, ListHabitsParams { cadence: Some("Daily".to_string()) }).unwrap();
    let names: Vec<_> = daily.listing.rows.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["Walk", "Floss"]);
    assert!(daily.message.starts_with("Table: Habits"));
}
