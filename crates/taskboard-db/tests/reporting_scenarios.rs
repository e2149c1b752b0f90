//! End-to-end reporting over a SQLite-backed graph source.

use taskboard_core::{EntityGraph, GraphSnapshot, GraphSource, ReportKind, ReportOutput, Reports};
use taskboard_db::Database;

async fn seeded(json: &str) -> Database {
    let db = Database::in_memory().await.unwrap();
    db.init_schema().await.unwrap();

    let snapshot = GraphSnapshot::from_json(json).unwrap();
    let graph = EntityGraph::from_snapshot(snapshot).unwrap();
    db.import_snapshot(&graph).await.unwrap();

    db
}

async fn load(source: &dyn GraphSource) -> EntityGraph {
    source.load_graph().await.unwrap()
}

#[tokio::test]
async fn test_empty_database_yields_empty_reports() {
    let db = seeded("{}").await;
    let graph = load(&db).await;

    let outputs = Reports::new(&graph).run_all();

    assert_eq!(outputs.len(), ReportKind::ALL.len());
    for output in outputs {
        assert!(output.is_empty(), "{} returned rows", output.kind());
    }
}

#[tokio::test]
async fn test_self_assigned_bug_task_with_three_comments() {
    let db = seeded(
        r#"{
            "projects": [{ "id": 1, "name": "Apollo" }],
            "users": [{ "id": 7, "name": "Ursula", "email": "ursula@example.com" }],
            "tags": [{ "id": 1, "name": "BUG" }],
            "tasks": [{
                "id": 1, "title": "Crash on launch",
                "project_id": 1, "creator_id": 7, "assignee_id": 7
            }],
            "comments": [
                { "id": 1, "text": "seen", "created_at": "2024-03-01T09:00:00Z", "task_id": 1, "author_id": 7 },
                { "id": 2, "text": "again", "created_at": "2024-03-01T10:00:00Z", "task_id": 1, "author_id": 7 },
                { "id": 3, "text": "fixed", "created_at": "2024-03-01T11:00:00Z", "task_id": 1, "author_id": 7 }
            ],
            "task_tags": [{ "task_id": 1, "tag_id": 1 }]
        }"#,
    )
    .await;
    let graph = load(&db).await;
    let reports = Reports::new(&graph);

    let commented = reports.heavily_commented_tasks();
    assert_eq!(commented.len(), 1);
    assert_eq!(commented[0].comment_count, 3);

    let self_assigned = reports.self_assigned_tasks();
    assert_eq!(self_assigned.len(), 1);
    assert_eq!(self_assigned[0].creator, "Ursula");

    let top = reports.top_bug_creator().unwrap();
    assert_eq!((top.user_id, top.task_count), (7, 1));

    let top_tags = reports.most_used_tag_per_user();
    assert_eq!(top_tags.len(), 1);
    assert_eq!(top_tags[0].user, "Ursula");
    assert_eq!(top_tags[0].tag, "BUG");

    let latest = reports.latest_comments();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].comment.comment_id, 3);
    assert_eq!(latest[0].comment.text, "fixed");
}

#[tokio::test]
async fn test_project_without_tasks_averages_zero() {
    let db = seeded(
        r#"{
            "projects": [
                { "id": 1, "name": "Apollo" },
                { "id": 2, "name": "Mercury" }
            ],
            "users": [{ "id": 1, "name": "Ada", "email": "ada@example.com" }],
            "tasks": [{ "id": 1, "title": "Fuel", "project_id": 1, "creator_id": 1 }],
            "comments": [
                { "id": 1, "text": "ok", "created_at": "2024-03-01T09:00:00Z", "task_id": 1, "author_id": 1 }
            ]
        }"#,
    )
    .await;
    let graph = load(&db).await;

    let output = Reports::new(&graph).run(ReportKind::ProjectsByAverageComments);
    let ReportOutput::ProjectsByAverageComments(rows) = output else {
        panic!("unexpected report output");
    };

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Apollo");
    assert_eq!(rows[0].average_comments, 1.0);
    assert_eq!(rows[1].name, "Mercury");
    assert_eq!(rows[1].task_count, 0);
    assert_eq!(rows[1].average_comments, 0.0);
}

#[tokio::test]
async fn test_reports_match_in_memory_graph() {
    let json = r#"{
        "projects": [{ "id": 1, "name": "Apollo", "description": "Moon" }],
        "teams": [{ "id": 1, "name": "Rocket", "project_id": 1 }],
        "users": [
            { "id": 1, "name": "Ada", "email": "ada@example.com" },
            { "id": 2, "name": "Bob", "email": "bob@example.com" }
        ],
        "tags": [{ "id": 1, "name": "STORY" }, { "id": 2, "name": "UI" }],
        "tasks": [
            { "id": 1, "title": "Landing page", "project_id": 1, "creator_id": 1, "assignee_id": 2 },
            { "id": 2, "title": "Login", "project_id": 1, "creator_id": 2 }
        ],
        "comments": [
            { "id": 1, "text": "draft", "created_at": "2024-03-01T09:00:00Z", "task_id": 1, "author_id": 2 },
            { "id": 2, "text": "lgtm", "created_at": "2024-03-02T09:00:00Z", "task_id": 2, "author_id": 1 }
        ],
        "task_tags": [
            { "task_id": 1, "tag_id": 1 },
            { "task_id": 1, "tag_id": 2 },
            { "task_id": 2, "tag_id": 1 }
        ],
        "project_members": [{ "project_id": 1, "user_id": 1 }],
        "team_members": [{ "team_id": 1, "user_id": 2 }]
    }"#;

    let expected = EntityGraph::from_snapshot(GraphSnapshot::from_json(json).unwrap()).unwrap();
    let db = seeded(json).await;
    let loaded = load(&db).await;

    assert_eq!(
        Reports::new(&loaded).run_all(),
        Reports::new(&expected).run_all()
    );
}
