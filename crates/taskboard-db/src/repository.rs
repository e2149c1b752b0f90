use crate::{
    models::{
        CommentRecord, ProjectMemberRecord, ProjectRecord, TableCounts, TagRecord, TaskRecord,
        TaskTagRecord, TeamMemberRecord, TeamRecord, UserRecord,
    },
    Error, Result,
};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use taskboard_core::{EntityGraph, GraphSnapshot, GraphSource};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        project_id INTEGER NOT NULL,
        FOREIGN KEY (project_id) REFERENCES projects(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        project_id INTEGER NOT NULL,
        creator_id INTEGER NOT NULL,
        assignee_id INTEGER,
        FOREIGN KEY (project_id) REFERENCES projects(id),
        FOREIGN KEY (creator_id) REFERENCES users(id),
        FOREIGN KEY (assignee_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        task_id INTEGER NOT NULL,
        author_id INTEGER NOT NULL,
        FOREIGN KEY (task_id) REFERENCES tasks(id),
        FOREIGN KEY (author_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS task_tags (
        task_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,
        PRIMARY KEY (task_id, tag_id),
        FOREIGN KEY (task_id) REFERENCES tasks(id),
        FOREIGN KEY (tag_id) REFERENCES tags(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS project_members (
        project_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        PRIMARY KEY (project_id, user_id),
        FOREIGN KEY (project_id) REFERENCES projects(id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_members (
        team_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        PRIMARY KEY (team_id, user_id),
        FOREIGN KEY (team_id) REFERENCES teams(id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_teams_project_id ON teams(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_creator_id ON tasks(creator_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_assignee_id ON tasks(assignee_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_task_id ON comments(task_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_author_id ON comments(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_task_tags_tag_id ON task_tags(tag_id)",
    "CREATE INDEX IF NOT EXISTS idx_team_members_user_id ON team_members(user_id)",
];

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create new database connection
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Create new database connection with a bounded pool
    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to {}", database_url);

        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Every connection to `:memory:` opens a fresh database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!("Database schema ready");

        Ok(())
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Write every entity and relation of the graph in one transaction.
    ///
    /// Existing rows with the same id are updated; join rows already present
    /// are left alone.
    pub async fn import_snapshot(&self, graph: &EntityGraph) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for project in graph.projects() {
            sqlx::query(
                r#"
                INSERT INTO projects (id, name, description) VALUES (?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description
                "#,
            )
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .execute(&mut *tx)
            .await?;
        }

        for user in graph.users() {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, email) VALUES (?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email
                "#,
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .execute(&mut *tx)
            .await?;
        }

        for team in graph.teams() {
            sqlx::query(
                r#"
                INSERT INTO teams (id, name, project_id) VALUES (?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    project_id = excluded.project_id
                "#,
            )
            .bind(team.id)
            .bind(&team.name)
            .bind(team.project_id)
            .execute(&mut *tx)
            .await?;
        }

        for tag in graph.tags() {
            sqlx::query(
                r#"
                INSERT INTO tags (id, name) VALUES (?, ?)
                ON CONFLICT (id) DO UPDATE SET name = excluded.name
                "#,
            )
            .bind(tag.id)
            .bind(&tag.name)
            .execute(&mut *tx)
            .await?;
        }

        for task in graph.tasks() {
            sqlx::query(
                r#"
                INSERT INTO tasks (
                    id, title, description, project_id, creator_id, assignee_id
                ) VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    project_id = excluded.project_id,
                    creator_id = excluded.creator_id,
                    assignee_id = excluded.assignee_id
                "#,
            )
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.project_id)
            .bind(task.creator_id)
            .bind(task.assignee_id)
            .execute(&mut *tx)
            .await?;
        }

        for comment in graph.comments() {
            sqlx::query(
                r#"
                INSERT INTO comments (id, text, created_at, task_id, author_id)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (id) DO UPDATE SET
                    text = excluded.text,
                    created_at = excluded.created_at,
                    task_id = excluded.task_id,
                    author_id = excluded.author_id
                "#,
            )
            .bind(comment.id)
            .bind(&comment.text)
            .bind(comment.created_at)
            .bind(comment.task_id)
            .bind(comment.author_id)
            .execute(&mut *tx)
            .await?;
        }

        for link in graph.task_tags() {
            sqlx::query("INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES (?, ?)")
                .bind(link.task_id)
                .bind(link.tag_id)
                .execute(&mut *tx)
                .await?;
        }

        for link in graph.project_members() {
            sqlx::query("INSERT OR IGNORE INTO project_members (project_id, user_id) VALUES (?, ?)")
                .bind(link.project_id)
                .bind(link.user_id)
                .execute(&mut *tx)
                .await?;
        }

        for link in graph.team_members() {
            sqlx::query("INSERT OR IGNORE INTO team_members (team_id, user_id) VALUES (?, ?)")
                .bind(link.team_id)
                .bind(link.user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Imported {} projects, {} users, {} tasks, {} comments",
            graph.projects().len(),
            graph.users().len(),
            graph.tasks().len(),
            graph.comments().len()
        );

        Ok(())
    }

    // ========================================================================
    // Graph Loading
    // ========================================================================

    /// Read every table inside one transaction and build the entity graph.
    pub async fn fetch_graph(&self) -> Result<EntityGraph> {
        let mut tx = self.pool.begin().await?;

        let projects = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, name, description FROM projects ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let teams = sqlx::query_as::<_, TeamRecord>(
            "SELECT id, name, project_id FROM teams ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let users = sqlx::query_as::<_, UserRecord>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        let tasks = sqlx::query_as::<_, TaskRecord>(
            r#"
            SELECT id, title, description, project_id, creator_id, assignee_id
            FROM tasks ORDER BY id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let tags = sqlx::query_as::<_, TagRecord>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;

        let comments = sqlx::query_as::<_, CommentRecord>(
            "SELECT id, text, created_at, task_id, author_id FROM comments ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let task_tags = sqlx::query_as::<_, TaskTagRecord>("SELECT task_id, tag_id FROM task_tags")
            .fetch_all(&mut *tx)
            .await?;

        let project_members = sqlx::query_as::<_, ProjectMemberRecord>(
            "SELECT project_id, user_id FROM project_members",
        )
        .fetch_all(&mut *tx)
        .await?;

        let team_members =
            sqlx::query_as::<_, TeamMemberRecord>("SELECT team_id, user_id FROM team_members")
                .fetch_all(&mut *tx)
                .await?;

        tx.commit().await?;

        let snapshot = GraphSnapshot {
            projects: projects.into_iter().map(Into::into).collect(),
            teams: teams.into_iter().map(Into::into).collect(),
            users: users.into_iter().map(Into::into).collect(),
            tasks: tasks.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            comments: comments.into_iter().map(Into::into).collect(),
            task_tags: task_tags.into_iter().map(Into::into).collect(),
            project_members: project_members.into_iter().map(Into::into).collect(),
            team_members: team_members.into_iter().map(Into::into).collect(),
        };

        Ok(EntityGraph::from_snapshot(snapshot)?)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Get row counts of every table
    pub async fn get_table_counts(&self) -> Result<TableCounts> {
        let counts = sqlx::query_as::<_, TableCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects) AS projects,
                (SELECT COUNT(*) FROM teams) AS teams,
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM tasks) AS tasks,
                (SELECT COUNT(*) FROM tags) AS tags,
                (SELECT COUNT(*) FROM comments) AS comments,
                (SELECT COUNT(*) FROM task_tags) AS task_tags,
                (SELECT COUNT(*) FROM project_members) AS project_members,
                (SELECT COUNT(*) FROM team_members) AS team_members
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}

#[async_trait]
impl GraphSource for Database {
    async fn load_graph(&self) -> taskboard_core::Result<EntityGraph> {
        self.fetch_graph().await.map_err(|e| match e {
            Error::Graph(inner) => inner,
            other => taskboard_core::Error::Source(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taskboard_core::{Comment, Project, Tag, Task, Team, User};

    fn sample_graph() -> EntityGraph {
        let mut snapshot = GraphSnapshot {
            projects: vec![Project {
                id: 1,
                name: "Apollo".to_string(),
                description: "Launch".to_string(),
            }],
            teams: vec![Team {
                id: 1,
                name: "Rocket".to_string(),
                project_id: 1,
            }],
            users: vec![
                User {
                    id: 1,
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                },
                User {
                    id: 2,
                    name: "Bob".to_string(),
                    email: "bob@example.com".to_string(),
                },
            ],
            tasks: vec![
                Task::new(1, "Crash on launch", 1, 1).with_assignee(2),
                Task::new(2, "Write docs", 1, 2),
            ],
            tags: vec![Tag {
                id: 1,
                name: "BUG".to_string(),
            }],
            comments: vec![Comment {
                id: 1,
                text: "Reproduced".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
                task_id: 1,
                author_id: 2,
            }],
            ..GraphSnapshot::default()
        };
        snapshot
            .tag_task(1, 1)
            .add_team_member(1, 1)
            .add_team_member(1, 2)
            .add_project_member(1, 1);

        EntityGraph::from_snapshot(snapshot).unwrap()
    }

    async fn database() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let db = database().await;
        db.init_schema().await.unwrap();

        let counts = db.get_table_counts().await.unwrap();
        assert_eq!(counts.projects, 0);
        assert_eq!(counts.team_members, 0);
    }

    #[tokio::test]
    async fn test_import_then_fetch_preserves_graph() {
        let db = database().await;
        let graph = sample_graph();

        db.import_snapshot(&graph).await.unwrap();
        let loaded = db.fetch_graph().await.unwrap();

        assert_eq!(loaded.snapshot(), graph.snapshot());
        assert_eq!(loaded.tasks_assigned_to(2), &[1]);
    }

    #[tokio::test]
    async fn test_reimport_updates_in_place() {
        let db = database().await;
        db.import_snapshot(&sample_graph()).await.unwrap();

        let mut snapshot = sample_graph().snapshot();
        snapshot.users[0].name = "Ada L.".to_string();
        let renamed = EntityGraph::from_snapshot(snapshot).unwrap();
        db.import_snapshot(&renamed).await.unwrap();

        let counts = db.get_table_counts().await.unwrap();
        assert_eq!(
            counts,
            TableCounts {
                projects: 1,
                teams: 1,
                users: 2,
                tasks: 2,
                tags: 1,
                comments: 1,
                task_tags: 1,
                project_members: 1,
                team_members: 2,
            }
        );

        let loaded = db.fetch_graph().await.unwrap();
        assert_eq!(loaded.user(1).map(|u| u.name.as_str()), Some("Ada L."));
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = database().await;

        let result = sqlx::query(
            "INSERT INTO comments (id, text, created_at, task_id, author_id) VALUES (1, 'x', '2024-01-01T00:00:00Z', 99, 99)",
        )
        .execute(&db.pool)
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_graph_source_loads_empty_database() {
        let db = database().await;
        let source: &dyn GraphSource = &db;

        let graph = source.load_graph().await.unwrap();
        assert!(graph.is_empty());
    }
}
