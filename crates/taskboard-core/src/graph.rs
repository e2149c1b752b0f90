//! Read-only entity graph with id-keyed adjacency indices.
//!
//! Canonical storage belongs to the data-access layer. A [`GraphSnapshot`]
//! carries the raw rows; [`EntityGraph::from_snapshot`] validates them and
//! builds the lookups the reports navigate in both directions.

use crate::models::{Comment, EntityId, Project, Tag, Task, Team, User};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const NONE: &[EntityId] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskTag {
    pub task_id: EntityId,
    pub tag_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectMember {
    pub project_id: EntityId,
    pub user_id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: EntityId,
    pub user_id: EntityId,
}

/// Raw rows of every table, as exchanged with the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub task_tags: Vec<TaskTag>,
    #[serde(default)]
    pub project_members: Vec<ProjectMember>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn tag_task(&mut self, task_id: EntityId, tag_id: EntityId) -> &mut Self {
        self.task_tags.push(TaskTag { task_id, tag_id });
        self
    }

    pub fn add_project_member(&mut self, project_id: EntityId, user_id: EntityId) -> &mut Self {
        self.project_members.push(ProjectMember { project_id, user_id });
        self
    }

    pub fn add_team_member(&mut self, team_id: EntityId, user_id: EntityId) -> &mut Self {
        self.team_members.push(TeamMember { team_id, user_id });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    projects: Vec<Project>,
    teams: Vec<Team>,
    users: Vec<User>,
    tasks: Vec<Task>,
    tags: Vec<Tag>,
    comments: Vec<Comment>,

    project_pos: HashMap<EntityId, usize>,
    team_pos: HashMap<EntityId, usize>,
    user_pos: HashMap<EntityId, usize>,
    task_pos: HashMap<EntityId, usize>,
    tag_pos: HashMap<EntityId, usize>,
    comment_pos: HashMap<EntityId, usize>,

    task_tags: Vec<TaskTag>,
    project_members: Vec<ProjectMember>,
    team_members: Vec<TeamMember>,

    tasks_by_project: HashMap<EntityId, Vec<EntityId>>,
    teams_by_project: HashMap<EntityId, Vec<EntityId>>,
    members_by_project: HashMap<EntityId, Vec<EntityId>>,
    members_by_team: HashMap<EntityId, Vec<EntityId>>,
    teams_by_user: HashMap<EntityId, Vec<EntityId>>,
    tags_by_task: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_tag: HashMap<EntityId, Vec<EntityId>>,
    comments_by_task: HashMap<EntityId, Vec<EntityId>>,
    comments_by_author: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_creator: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_assignee: HashMap<EntityId, Vec<EntityId>>,
}

impl EntityGraph {
    /// Validate a snapshot and build the graph.
    ///
    /// Every entity list is ordered by ascending id, and so is every
    /// adjacency list. Duplicate ids and references to missing rows are
    /// rejected; repeated join rows collapse into one association.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let GraphSnapshot {
            mut projects,
            mut teams,
            mut users,
            mut tasks,
            mut tags,
            mut comments,
            mut task_tags,
            mut project_members,
            mut team_members,
        } = snapshot;

        let project_pos = index_by_id(&mut projects, "Project", |p| p.id)?;
        let team_pos = index_by_id(&mut teams, "Team", |t| t.id)?;
        let user_pos = index_by_id(&mut users, "User", |u| u.id)?;
        let task_pos = index_by_id(&mut tasks, "Task", |t| t.id)?;
        let tag_pos = index_by_id(&mut tags, "Tag", |t| t.id)?;
        let comment_pos = index_by_id(&mut comments, "Comment", |c| c.id)?;

        for team in &teams {
            require(&project_pos, "Team", team.id, "Project", team.project_id)?;
        }

        for task in &tasks {
            require(&project_pos, "Task", task.id, "Project", task.project_id)?;
            require(&user_pos, "Task", task.id, "User", task.creator_id)?;
            if let Some(assignee_id) = task.assignee_id {
                require(&user_pos, "Task", task.id, "User", assignee_id)?;
            }
        }

        for comment in &comments {
            require(&task_pos, "Comment", comment.id, "Task", comment.task_id)?;
            require(&user_pos, "Comment", comment.id, "User", comment.author_id)?;
        }

        task_tags.sort_unstable();
        task_tags.dedup();
        for link in &task_tags {
            let (left, right) = (link.task_id, link.tag_id);
            require_link(&task_pos, "TaskTag", (left, right), "Task", left)?;
            require_link(&tag_pos, "TaskTag", (left, right), "Tag", right)?;
        }

        project_members.sort_unstable();
        project_members.dedup();
        for link in &project_members {
            let (left, right) = (link.project_id, link.user_id);
            require_link(&project_pos, "ProjectMember", (left, right), "Project", left)?;
            require_link(&user_pos, "ProjectMember", (left, right), "User", right)?;
        }

        team_members.sort_unstable();
        team_members.dedup();
        for link in &team_members {
            let (left, right) = (link.team_id, link.user_id);
            require_link(&team_pos, "TeamMember", (left, right), "Team", left)?;
            require_link(&user_pos, "TeamMember", (left, right), "User", right)?;
        }

        let mut graph = Self {
            project_pos,
            team_pos,
            user_pos,
            task_pos,
            tag_pos,
            comment_pos,
            ..Self::default()
        };

        for team in &teams {
            push(&mut graph.teams_by_project, team.project_id, team.id);
        }

        for task in &tasks {
            push(&mut graph.tasks_by_project, task.project_id, task.id);
            push(&mut graph.tasks_by_creator, task.creator_id, task.id);
            if let Some(assignee_id) = task.assignee_id {
                push(&mut graph.tasks_by_assignee, assignee_id, task.id);
            }
        }

        for comment in &comments {
            push(&mut graph.comments_by_task, comment.task_id, comment.id);
            push(&mut graph.comments_by_author, comment.author_id, comment.id);
        }

        for link in &task_tags {
            push(&mut graph.tags_by_task, link.task_id, link.tag_id);
            push(&mut graph.tasks_by_tag, link.tag_id, link.task_id);
        }

        for link in &project_members {
            push(&mut graph.members_by_project, link.project_id, link.user_id);
        }

        for link in &team_members {
            push(&mut graph.members_by_team, link.team_id, link.user_id);
            push(&mut graph.teams_by_user, link.user_id, link.team_id);
        }

        graph.projects = projects;
        graph.teams = teams;
        graph.users = users;
        graph.tasks = tasks;
        graph.tags = tags;
        graph.comments = comments;
        graph.task_tags = task_tags;
        graph.project_members = project_members;
        graph.team_members = team_members;

        tracing::debug!(
            "Built entity graph: {} projects, {} teams, {} users, {} tasks, {} tags, {} comments",
            graph.projects.len(),
            graph.teams.len(),
            graph.users.len(),
            graph.tasks.len(),
            graph.tags.len(),
            graph.comments.len()
        );

        Ok(graph)
    }

    /// Canonical rows of the graph, ordered by id.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            projects: self.projects.clone(),
            teams: self.teams.clone(),
            users: self.users.clone(),
            tasks: self.tasks.clone(),
            tags: self.tags.clone(),
            comments: self.comments.clone(),
            task_tags: self.task_tags.clone(),
            project_members: self.project_members.clone(),
            team_members: self.team_members.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.teams.is_empty()
            && self.users.is_empty()
            && self.tasks.is_empty()
            && self.tags.is_empty()
            && self.comments.is_empty()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn task_tags(&self) -> &[TaskTag] {
        &self.task_tags
    }

    pub fn project_members(&self) -> &[ProjectMember] {
        &self.project_members
    }

    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    pub fn project(&self, id: EntityId) -> Option<&Project> {
        self.project_pos.get(&id).map(|&i| &self.projects[i])
    }

    pub fn team(&self, id: EntityId) -> Option<&Team> {
        self.team_pos.get(&id).map(|&i| &self.teams[i])
    }

    pub fn user(&self, id: EntityId) -> Option<&User> {
        self.user_pos.get(&id).map(|&i| &self.users[i])
    }

    pub fn task(&self, id: EntityId) -> Option<&Task> {
        self.task_pos.get(&id).map(|&i| &self.tasks[i])
    }

    pub fn tag(&self, id: EntityId) -> Option<&Tag> {
        self.tag_pos.get(&id).map(|&i| &self.tags[i])
    }

    pub fn comment(&self, id: EntityId) -> Option<&Comment> {
        self.comment_pos.get(&id).map(|&i| &self.comments[i])
    }

    pub fn tasks_of_project(&self, project_id: EntityId) -> &[EntityId] {
        lookup(&self.tasks_by_project, project_id)
    }

    pub fn teams_of_project(&self, project_id: EntityId) -> &[EntityId] {
        lookup(&self.teams_by_project, project_id)
    }

    /// Users attached directly to the project, not through a team.
    pub fn members_of_project(&self, project_id: EntityId) -> &[EntityId] {
        lookup(&self.members_by_project, project_id)
    }

    pub fn members_of_team(&self, team_id: EntityId) -> &[EntityId] {
        lookup(&self.members_by_team, team_id)
    }

    pub fn teams_of_user(&self, user_id: EntityId) -> &[EntityId] {
        lookup(&self.teams_by_user, user_id)
    }

    pub fn tags_of_task(&self, task_id: EntityId) -> &[EntityId] {
        lookup(&self.tags_by_task, task_id)
    }

    pub fn tasks_with_tag(&self, tag_id: EntityId) -> &[EntityId] {
        lookup(&self.tasks_by_tag, tag_id)
    }

    pub fn comments_on_task(&self, task_id: EntityId) -> &[EntityId] {
        lookup(&self.comments_by_task, task_id)
    }

    pub fn comments_by_author(&self, user_id: EntityId) -> &[EntityId] {
        lookup(&self.comments_by_author, user_id)
    }

    pub fn tasks_created_by(&self, user_id: EntityId) -> &[EntityId] {
        lookup(&self.tasks_by_creator, user_id)
    }

    pub fn tasks_assigned_to(&self, user_id: EntityId) -> &[EntityId] {
        lookup(&self.tasks_by_assignee, user_id)
    }

    /// Whether the task carries a tag with exactly this name.
    pub fn task_has_tag_named(&self, task_id: EntityId, name: &str) -> bool {
        self.tags_of_task(task_id)
            .iter()
            .filter_map(|&tag_id| self.tag(tag_id))
            .any(|tag| tag.name == name)
    }
}

fn index_by_id<T>(
    items: &mut [T],
    entity: &'static str,
    id_of: impl Fn(&T) -> EntityId,
) -> Result<HashMap<EntityId, usize>> {
    items.sort_by_key(|item| id_of(item));

    let mut positions = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
        let id = id_of(item);
        if positions.insert(id, pos).is_some() {
            return Err(Error::DuplicateId { entity, id });
        }
    }

    Ok(positions)
}

fn require(
    known: &HashMap<EntityId, usize>,
    entity: &'static str,
    id: EntityId,
    target: &'static str,
    target_id: EntityId,
) -> Result<()> {
    if known.contains_key(&target_id) {
        Ok(())
    } else {
        Err(Error::DanglingReference {
            entity,
            id,
            target,
            target_id,
        })
    }
}

fn require_link(
    known: &HashMap<EntityId, usize>,
    relation: &'static str,
    (left, right): (EntityId, EntityId),
    target: &'static str,
    target_id: EntityId,
) -> Result<()> {
    if known.contains_key(&target_id) {
        Ok(())
    } else {
        Err(Error::DanglingLink {
            relation,
            left,
            right,
            target,
            target_id,
        })
    }
}

fn push(index: &mut HashMap<EntityId, Vec<EntityId>>, key: EntityId, value: EntityId) {
    index.entry(key).or_default().push(value);
}

fn lookup(index: &HashMap<EntityId, Vec<EntityId>>, key: EntityId) -> &[EntityId] {
    index.get(&key).map(Vec::as_slice).unwrap_or(NONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> GraphSnapshot {
        let mut snapshot = GraphSnapshot {
            projects: vec![
                Project { id: 2, name: "Mobile".into(), description: String::new() },
                Project { id: 1, name: "Web".into(), description: "Site".into() },
            ],
            teams: vec![Team { id: 1, name: "Core".into(), project_id: 1 }],
            users: vec![
                User { id: 1, name: "Ada".into(), email: "ada@example.com".into() },
                User { id: 2, name: "Linus".into(), email: "linus@example.com".into() },
            ],
            tasks: vec![
                Task::new(11, "Login form", 1, 1).with_assignee(2),
                Task::new(10, "Landing page", 1, 2),
            ],
            tags: vec![Tag { id: 1, name: "BUG".into() }, Tag { id: 2, name: "UI".into() }],
            comments: vec![Comment {
                id: 1,
                text: "Looks good".into(),
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
                task_id: 11,
                author_id: 2,
            }],
            ..GraphSnapshot::default()
        };
        snapshot
            .tag_task(11, 2)
            .tag_task(11, 1)
            .tag_task(10, 2)
            .add_team_member(1, 2)
            .add_team_member(1, 1)
            .add_project_member(1, 1);
        snapshot
    }

    #[test]
    fn test_graph_indices() {
        let graph = EntityGraph::from_snapshot(sample()).unwrap();

        assert_eq!(graph.projects()[0].name, "Web");
        assert_eq!(graph.tasks_of_project(1), &[10, 11]);
        assert!(graph.tasks_of_project(2).is_empty());
        assert_eq!(graph.tags_of_task(11), &[1, 2]);
        assert_eq!(graph.tasks_with_tag(2), &[10, 11]);
        assert_eq!(graph.tasks_created_by(1), &[11]);
        assert_eq!(graph.tasks_assigned_to(2), &[11]);
        assert_eq!(graph.members_of_team(1), &[1, 2]);
        assert_eq!(graph.teams_of_user(2), &[1]);
        assert_eq!(graph.comments_on_task(11), &[1]);
        assert_eq!(graph.comments_by_author(2), &[1]);
        assert!(graph.task_has_tag_named(11, "BUG"));
        assert!(!graph.task_has_tag_named(10, "BUG"));
        assert_eq!(graph.user(2).map(|u| u.name.as_str()), Some("Linus"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut snapshot = sample();
        snapshot.users.push(User { id: 1, name: "Clone".into(), email: "c@example.com".into() });

        let err = EntityGraph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, Error::DuplicateId { entity: "User", id: 1 }));
    }

    #[test]
    fn test_dangling_creator_rejected() {
        let mut snapshot = sample();
        snapshot.tasks.push(Task::new(12, "Orphan", 1, 99));

        let err = EntityGraph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingReference { entity: "Task", id: 12, target: "User", target_id: 99 }
        ));
    }

    #[test]
    fn test_dangling_join_rejected() {
        let mut snapshot = sample();
        snapshot.tag_task(10, 42);

        let err = EntityGraph::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingLink { relation: "TaskTag", left: 10, right: 42, target: "Tag", target_id: 42 }
        ));
        assert_eq!(err.to_string(), "TaskTag link 10-42 references missing Tag 42");
    }

    #[test]
    fn test_dangling_team_member_names_the_link() {
        let mut snapshot = sample();
        snapshot.add_team_member(7, 1);

        let err = EntityGraph::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.to_string(), "TeamMember link 7-1 references missing Team 7");
    }

    #[test]
    fn test_repeated_join_rows_collapse() {
        let mut snapshot = sample();
        snapshot.tag_task(10, 2).add_team_member(1, 2);

        let graph = EntityGraph::from_snapshot(snapshot).unwrap();
        assert_eq!(graph.tasks_with_tag(2), &[10, 11]);
        assert_eq!(graph.members_of_team(1), &[1, 2]);
        assert_eq!(graph.task_tags().len(), 3);
        assert_eq!(
            graph.team_members(),
            &[TeamMember { team_id: 1, user_id: 1 }, TeamMember { team_id: 1, user_id: 2 }]
        );
        assert_eq!(graph.project_members(), &[ProjectMember { project_id: 1, user_id: 1 }]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = EntityGraph::from_snapshot(GraphSnapshot::default()).unwrap();
        assert!(graph.is_empty());
        assert!(graph.tasks_created_by(1).is_empty());
        assert!(graph.project(1).is_none());
    }

    #[test]
    fn test_snapshot_is_canonical() {
        let graph = EntityGraph::from_snapshot(sample()).unwrap();
        let snapshot = graph.snapshot();

        assert_eq!(snapshot.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(
            snapshot.task_tags,
            vec![
                TaskTag { task_id: 10, tag_id: 2 },
                TaskTag { task_id: 11, tag_id: 1 },
                TaskTag { task_id: 11, tag_id: 2 },
            ]
        );

        let rebuilt = EntityGraph::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(rebuilt.snapshot(), snapshot);
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = GraphSnapshot::from_json(
            r#"{
                "users": [{"id": 1, "name": "Ada", "email": "ada@example.com"}],
                "projects": [{"id": 1, "name": "Web"}]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.users.len(), 1);
        assert!(snapshot.tasks.is_empty());
        assert!(GraphSnapshot::from_json("{\"users\": 3}").is_err());
    }
}
