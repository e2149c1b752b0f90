//! The report catalogue.
//!
//! Every report is a pure read of an [`EntityGraph`]: the same graph always
//! yields the same rows, and an empty graph yields empty results. Rows come
//! out in ascending id order unless a report ranks them; rankings use stable
//! sorts, so equal keys keep id order.

mod kind;
pub mod types;


pub use kind::{ReportKind, ReportOutput};
pub use types::*;

use crate::graph::EntityGraph;
use crate::models::{Comment, EntityId};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const BUG_TAG: &str = "BUG";
pub const STORY_TAG: &str = "STORY";

/// A task needs strictly more comments than this to count as heavily commented.
pub const COMMENT_THRESHOLD: usize = 2;

/// How many commented tasks the latest-comment report covers.
pub const LATEST_COMMENT_TASKS: usize = 15;

#[derive(Debug, Clone, Copy)]
pub struct Reports<'g> {
    graph: &'g EntityGraph,
}

impl<'g> Reports<'g> {
    pub fn new(graph: &'g EntityGraph) -> Self {
        Self { graph }
    }

    pub fn run(&self, kind: ReportKind) -> ReportOutput {
        let output = match kind {
            ReportKind::ProjectSummary => ReportOutput::ProjectSummary(self.project_summaries()),
            ReportKind::HeavilyCommentedTasks => {
                ReportOutput::HeavilyCommentedTasks(self.heavily_commented_tasks())
            }
            ReportKind::TopBugCreator => ReportOutput::TopBugCreator(self.top_bug_creator()),
            ReportKind::TaskCountPerTag => ReportOutput::TaskCountPerTag(self.task_count_per_tag()),
            ReportKind::SelfAssignedTasks => {
                ReportOutput::SelfAssignedTasks(self.self_assigned_tasks())
            }
            ReportKind::LatestComments => ReportOutput::LatestComments(self.latest_comments()),
            ReportKind::MultiTagTasks => ReportOutput::MultiTagTasks(self.multi_tag_tasks()),
            ReportKind::CommentsPerUser => ReportOutput::CommentsPerUser(self.comments_per_user()),
            ReportKind::TeamTaskRanking => ReportOutput::TeamTaskRanking(self.team_task_ranking()),
            ReportKind::StoryCommenters => ReportOutput::StoryCommenters(self.story_commenters()),
            ReportKind::MostUsedTagPerUser => {
                ReportOutput::MostUsedTagPerUser(self.most_used_tag_per_user())
            }
            ReportKind::ProjectsByAverageComments => {
                ReportOutput::ProjectsByAverageComments(self.projects_by_average_comments())
            }
            ReportKind::ForeignTaskCommenters => {
                ReportOutput::ForeignTaskCommenters(self.foreign_task_commenters())
            }
        };

        tracing::debug!("Report {} ({}): {} rows", kind.number(), kind, output.len());

        output
    }

    /// Every report, in catalogue order.
    pub fn run_all(&self) -> Vec<ReportOutput> {
        ReportKind::ALL.iter().map(|&kind| self.run(kind)).collect()
    }

    pub fn project_summaries(&self) -> Vec<ProjectSummary> {
        self.graph
            .projects()
            .iter()
            .map(|project| {
                let mut members: BTreeSet<EntityId> = self
                    .graph
                    .members_of_project(project.id)
                    .iter()
                    .copied()
                    .collect();
                for &team_id in self.graph.teams_of_project(project.id) {
                    members.extend(self.graph.members_of_team(team_id));
                }

                ProjectSummary {
                    project_id: project.id,
                    name: project.name.clone(),
                    description: project.description.clone(),
                    task_count: self.graph.tasks_of_project(project.id).len(),
                    member_count: members.len(),
                }
            })
            .collect()
    }

    /// Tasks with more than [`COMMENT_THRESHOLD`] comments, most discussed first.
    pub fn heavily_commented_tasks(&self) -> Vec<CommentedTask> {
        let mut rows: Vec<CommentedTask> = self
            .graph
            .tasks()
            .iter()
            .filter_map(|task| {
                let comment_count = self.graph.comments_on_task(task.id).len();
                (comment_count > COMMENT_THRESHOLD).then(|| CommentedTask {
                    task_id: task.id,
                    title: task.title.clone(),
                    comment_count,
                })
            })
            .collect();

        rows.sort_by_key(|row| Reverse(row.comment_count));
        rows
    }

    /// The user who created the most tasks tagged [`BUG_TAG`].
    ///
    /// Ties go to the lowest user id. `None` when nobody created such a task.
    pub fn top_bug_creator(&self) -> Option<TagCreator> {
        let mut best: Option<TagCreator> = None;

        for user in self.graph.users() {
            let task_count = self
                .graph
                .tasks_created_by(user.id)
                .iter()
                .filter(|&&task_id| self.graph.task_has_tag_named(task_id, BUG_TAG))
                .count();

            let leads = best
                .as_ref()
                .map_or(task_count > 0, |current| task_count > current.task_count);
            if leads {
                best = Some(TagCreator {
                    user_id: user.id,
                    name: user.name.clone(),
                    task_count,
                });
            }
        }

        best
    }

    /// Every tag with its task count, busiest first; unused tags report 0.
    pub fn task_count_per_tag(&self) -> Vec<TagUsage> {
        let mut rows: Vec<TagUsage> = self
            .graph
            .tags()
            .iter()
            .map(|tag| TagUsage {
                tag_id: tag.id,
                tag: tag.name.clone(),
                task_count: self.graph.tasks_with_tag(tag.id).len(),
            })
            .collect();

        rows.sort_by_key(|row| Reverse(row.task_count));
        rows
    }

    pub fn self_assigned_tasks(&self) -> Vec<SelfAssignedTask> {
        self.graph
            .tasks()
            .iter()
            .filter(|task| task.is_self_assigned())
            .map(|task| SelfAssignedTask {
                task_id: task.id,
                title: task.title.clone(),
                creator: self.user_name(task.creator_id),
            })
            .collect()
    }

    /// Newest comment for each of the first [`LATEST_COMMENT_TASKS`]
    /// commented tasks. Comments sharing the newest timestamp resolve to the
    /// lowest comment id.
    pub fn latest_comments(&self) -> Vec<LatestComment> {
        self.graph
            .tasks()
            .iter()
            .filter_map(|task| {
                let latest = self
                    .graph
                    .comments_on_task(task.id)
                    .iter()
                    .filter_map(|&comment_id| self.graph.comment(comment_id))
                    .reduce(|newest, comment| {
                        if comment.created_at > newest.created_at {
                            comment
                        } else {
                            newest
                        }
                    })?;

                Some(LatestComment {
                    task_id: task.id,
                    task_title: task.title.clone(),
                    comment: self.digest(latest),
                })
            })
            .take(LATEST_COMMENT_TASKS)
            .collect()
    }

    pub fn multi_tag_tasks(&self) -> Vec<TaggedTask> {
        self.graph
            .tasks()
            .iter()
            .filter(|task| self.graph.tags_of_task(task.id).len() > 1)
            .map(|task| TaggedTask {
                task_id: task.id,
                title: task.title.clone(),
                tags: self
                    .graph
                    .tags_of_task(task.id)
                    .iter()
                    .filter_map(|&tag_id| self.graph.tag(tag_id))
                    .map(|tag| tag.name.clone())
                    .collect(),
            })
            .collect()
    }

    /// Comment totals grouped by author, highest first. Users who never
    /// commented do not appear.
    pub fn comments_per_user(&self) -> Vec<UserCommentCount> {
        let mut rows: Vec<UserCommentCount> = self
            .graph
            .users()
            .iter()
            .filter_map(|user| {
                let comment_count = self.graph.comments_by_author(user.id).len();
                (comment_count > 0).then(|| UserCommentCount {
                    user_id: user.id,
                    name: user.name.clone(),
                    comment_count,
                })
            })
            .collect();

        rows.sort_by_key(|row| Reverse(row.comment_count));
        rows
    }

    /// Teams ranked by the tasks their members created plus the tasks
    /// assigned to them.
    pub fn team_task_ranking(&self) -> Vec<TeamTaskRank> {
        let mut rows: Vec<TeamTaskRank> = self
            .graph
            .teams()
            .iter()
            .map(|team| {
                let members = self.graph.members_of_team(team.id);
                TeamTaskRank {
                    team_id: team.id,
                    name: team.name.clone(),
                    created_tasks: members
                        .iter()
                        .map(|&user_id| self.graph.tasks_created_by(user_id).len())
                        .sum(),
                    assigned_tasks: members
                        .iter()
                        .map(|&user_id| self.graph.tasks_assigned_to(user_id).len())
                        .sum(),
                }
            })
            .collect();

        rows.sort_by_key(|row| Reverse(row.total()));
        rows
    }

    /// Who commented on tasks tagged [`STORY_TAG`], with the task's project
    /// and the commenter's own teams. Identical rows are reported once.
    pub fn story_commenters(&self) -> Vec<StoryCommenter> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for comment in self.graph.comments() {
            if !self.graph.task_has_tag_named(comment.task_id, STORY_TAG) {
                continue;
            }
            let (Some(task), Some(author)) = (
                self.graph.task(comment.task_id),
                self.graph.user(comment.author_id),
            ) else {
                continue;
            };
            let Some(project) = self.graph.project(task.project_id) else {
                continue;
            };

            let row = StoryCommenter {
                user_name: author.name.clone(),
                user_email: author.email.clone(),
                task_title: task.title.clone(),
                project_name: project.name.clone(),
                team_names: self
                    .graph
                    .teams_of_user(author.id)
                    .iter()
                    .filter_map(|&team_id| self.graph.team(team_id))
                    .map(|team| team.name.clone())
                    .collect(),
            };

            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }

        rows
    }

    /// Most frequent tag name across each user's created tasks.
    ///
    /// Ties go to the alphabetically first tag name. Users whose created
    /// tasks carry no tags at all, including users who created nothing, are
    /// left out.
    pub fn most_used_tag_per_user(&self) -> Vec<UserTopTag> {
        self.graph
            .users()
            .iter()
            .filter_map(|user| {
                let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
                for &task_id in self.graph.tasks_created_by(user.id) {
                    for &tag_id in self.graph.tags_of_task(task_id) {
                        if let Some(tag) = self.graph.tag(tag_id) {
                            *occurrences.entry(tag.name.as_str()).or_default() += 1;
                        }
                    }
                }

                let (tag, count) = occurrences
                    .into_iter()
                    .reduce(|top, entry| if entry.1 > top.1 { entry } else { top })?;

                Some(UserTopTag {
                    user_id: user.id,
                    user: user.name.clone(),
                    tag: tag.to_string(),
                    occurrences: count,
                })
            })
            .collect()
    }

    /// Projects ranked by mean comments per task. A project without tasks
    /// averages exactly 0.
    pub fn projects_by_average_comments(&self) -> Vec<ProjectCommentAverage> {
        let mut rows: Vec<ProjectCommentAverage> = self
            .graph
            .projects()
            .iter()
            .map(|project| {
                let tasks = self.graph.tasks_of_project(project.id);
                let comments: usize = tasks
                    .iter()
                    .map(|&task_id| self.graph.comments_on_task(task_id).len())
                    .sum();
                let average_comments = if tasks.is_empty() {
                    0.0
                } else {
                    comments as f64 / tasks.len() as f64
                };

                ProjectCommentAverage {
                    project_id: project.id,
                    name: project.name.clone(),
                    task_count: tasks.len(),
                    average_comments,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.average_comments.total_cmp(&a.average_comments));
        rows
    }

    /// Distinct users who commented on a task someone else created, by name.
    pub fn foreign_task_commenters(&self) -> Vec<ForeignCommenter> {
        let authors: BTreeSet<EntityId> = self
            .graph
            .comments()
            .iter()
            .filter(|comment| {
                self.graph
                    .task(comment.task_id)
                    .is_some_and(|task| task.creator_id != comment.author_id)
            })
            .map(|comment| comment.author_id)
            .collect();

        let mut rows: Vec<ForeignCommenter> = authors
            .into_iter()
            .map(|user_id| ForeignCommenter {
                user_id,
                name: self.user_name(user_id),
            })
            .collect();

        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.user_id.cmp(&b.user_id)));
        rows
    }

    fn user_name(&self, user_id: EntityId) -> String {
        self.graph
            .user(user_id)
            .map(|user| user.name.clone())
            .unwrap_or_default()
    }

    fn digest(&self, comment: &Comment) -> CommentDigest {
        CommentDigest {
            comment_id: comment.id,
            text: comment.text.clone(),
            author: self.user_name(comment.author_id),
            created_at: comment.created_at,
        }
    }
}
