/// Drives the MCP server over in-memory streams
use habit_streaks::*;
use serde_json::{json, Value};

async fn run_session(requests: &[Value]) -> Vec<Value> {
    let storage = SqliteStorage::open_in_memory().expect("Failed to create storage");
    let mut server = McpServer::new(HabitTrackerServer::with_storage(storage));

    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();

    server
        .serve(input.as_bytes(), &mut output)
        .await
        .expect("Session failed");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": "tools/call",
           "params": {"name": name, "arguments": arguments}})
}

#[tokio::test]
async fn test_full_session() {
    let responses = run_session(&[
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        tool_call(2, "habit_create", json!({"name": "read", "description": "Ten pages", "cadence": "daily"})),
        tool_call(3, "habit_check_off", json!({"name": "read", "cadence": "daily", "date": "2023-01-01"})),
        tool_call(4, "habit_check_off", json!({"name": "read", "cadence": "daily", "date": "2023-01-02"})),
        tool_call(5, "habit_longest_streak", json!({})),
        tool_call(6, "habit_delete", json!({"name": "read"})),
        tool_call(7, "habit_view", json!({"name": "read"})),
    ])
    .await;

    // The notification produces no response line
    assert_eq!(responses.len(), 7);
    assert_eq!(responses[0]["id"], 1);

    let longest = &responses[4]["result"]["content"][0]["text"];
    assert_eq!(longest, "Your longest all-time streak is '2' for the habit 'Read'");

    assert_eq!(responses[6]["result"]["isError"], true);
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut server = McpServer::new(HabitTrackerServer::with_storage(storage));
    let mut output = Vec::new();

    server.serve(&b"\n\n"[..], &mut output).await.unwrap();
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_server_starts_over_corrupt_row() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("habits.db");

    {
        let storage = SqliteStorage::new(db_path.clone()).unwrap();
        let habit = Habit::new("Read".to_string(), "Ten pages".to_string(), Cadence::Daily).unwrap();
        storage.create_habit(&habit).unwrap();
    }
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "INSERT INTO habit (name, description, period, completed_dates)
             VALUES ('Bad', 'Broken', 'Daily', '[\"2023-13-45\"]')",
            [],
        )
        .unwrap();
    }

    let tracker = HabitTrackerServer::new(db_path).await.unwrap();
    assert_eq!(tracker.check_database().unwrap(), 2);

    let mut server = McpServer::new(tracker);
    let input: String = [
        tool_call(1, "habit_list", json!({})),
        tool_call(2, "habit_delete", json!({"name": "bad"})),
        tool_call(3, "habit_list", json!({})),
    ]
    .iter()
    .map(|r| format!("{}\n", r))
    .collect();
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses[0]["result"]["isError"], false);
    let listing = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(listing.contains("Read"));
    assert!(listing.contains("2023-13-45"));

    assert_eq!(responses[1]["result"]["isError"], false);

    let listing = responses[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(!listing.contains("Bad"));
}
