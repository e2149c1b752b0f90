use super::types::{
    CommentedTask, ForeignCommenter, LatestComment, ProjectCommentAverage, ProjectSummary,
    SelfAssignedTask, StoryCommenter, TagCreator, TagUsage, TaggedTask, TeamTaskRank,
    UserCommentCount, UserTopTag,
};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    ProjectSummary,
    HeavilyCommentedTasks,
    TopBugCreator,
    TaskCountPerTag,
    SelfAssignedTasks,
    LatestComments,
    MultiTagTasks,
    CommentsPerUser,
    TeamTaskRanking,
    StoryCommenters,
    MostUsedTagPerUser,
    ProjectsByAverageComments,
    ForeignTaskCommenters,
}

impl ReportKind {
    pub const ALL: [ReportKind; 13] = [
        ReportKind::ProjectSummary,
        ReportKind::HeavilyCommentedTasks,
        ReportKind::TopBugCreator,
        ReportKind::TaskCountPerTag,
        ReportKind::SelfAssignedTasks,
        ReportKind::LatestComments,
        ReportKind::MultiTagTasks,
        ReportKind::CommentsPerUser,
        ReportKind::TeamTaskRanking,
        ReportKind::StoryCommenters,
        ReportKind::MostUsedTagPerUser,
        ReportKind::ProjectsByAverageComments,
        ReportKind::ForeignTaskCommenters,
    ];

    /// Position in the catalogue, starting at 1.
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|&kind| kind == self)
            .map_or(0, |pos| pos + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::ProjectSummary => "project-summary",
            ReportKind::HeavilyCommentedTasks => "heavily-commented-tasks",
            ReportKind::TopBugCreator => "top-bug-creator",
            ReportKind::TaskCountPerTag => "task-count-per-tag",
            ReportKind::SelfAssignedTasks => "self-assigned-tasks",
            ReportKind::LatestComments => "latest-comments",
            ReportKind::MultiTagTasks => "multi-tag-tasks",
            ReportKind::CommentsPerUser => "comments-per-user",
            ReportKind::TeamTaskRanking => "team-task-ranking",
            ReportKind::StoryCommenters => "story-commenters",
            ReportKind::MostUsedTagPerUser => "most-used-tag-per-user",
            ReportKind::ProjectsByAverageComments => "projects-by-average-comments",
            ReportKind::ForeignTaskCommenters => "foreign-task-commenters",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::ProjectSummary => "Project summary",
            ReportKind::HeavilyCommentedTasks => "Tasks with more than 2 comments",
            ReportKind::TopBugCreator => "Top creator of BUG tasks",
            ReportKind::TaskCountPerTag => "Task count per tag",
            ReportKind::SelfAssignedTasks => "Tasks assigned to their creator",
            ReportKind::LatestComments => "Latest comment of the first 15 commented tasks",
            ReportKind::MultiTagTasks => "Tasks with more than one tag",
            ReportKind::CommentsPerUser => "Comments per user",
            ReportKind::TeamTaskRanking => "Teams ranked by created and assigned tasks",
            ReportKind::StoryCommenters => "Commenters on STORY tasks",
            ReportKind::MostUsedTagPerUser => "Most used tag per user",
            ReportKind::ProjectsByAverageComments => "Projects by average comments per task",
            ReportKind::ForeignTaskCommenters => "Users commenting on tasks they did not create",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    /// Accepts the catalogue number ("3") or the kebab-case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = match s.parse::<usize>() {
            Ok(number) => number
                .checked_sub(1)
                .and_then(|pos| Self::ALL.get(pos))
                .copied(),
            Err(_) => Self::ALL
                .iter()
                .copied()
                .find(|kind| kind.name().eq_ignore_ascii_case(s)),
        };

        found.ok_or_else(|| Error::UnknownReport(s.to_string()))
    }
}

/// Result of one report, tagged with the report it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", content = "rows", rename_all = "kebab-case")]
pub enum ReportOutput {
    ProjectSummary(Vec<ProjectSummary>),
    HeavilyCommentedTasks(Vec<CommentedTask>),
    TopBugCreator(Option<TagCreator>),
    TaskCountPerTag(Vec<TagUsage>),
    SelfAssignedTasks(Vec<SelfAssignedTask>),
    LatestComments(Vec<LatestComment>),
    MultiTagTasks(Vec<TaggedTask>),
    CommentsPerUser(Vec<UserCommentCount>),
    TeamTaskRanking(Vec<TeamTaskRank>),
    StoryCommenters(Vec<StoryCommenter>),
    MostUsedTagPerUser(Vec<UserTopTag>),
    ProjectsByAverageComments(Vec<ProjectCommentAverage>),
    ForeignTaskCommenters(Vec<ForeignCommenter>),
}

impl ReportOutput {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportOutput::ProjectSummary(_) => ReportKind::ProjectSummary,
            ReportOutput::HeavilyCommentedTasks(_) => ReportKind::HeavilyCommentedTasks,
            ReportOutput::TopBugCreator(_) => ReportKind::TopBugCreator,
            ReportOutput::TaskCountPerTag(_) => ReportKind::TaskCountPerTag,
            ReportOutput::SelfAssignedTasks(_) => ReportKind::SelfAssignedTasks,
            ReportOutput::LatestComments(_) => ReportKind::LatestComments,
            ReportOutput::MultiTagTasks(_) => ReportKind::MultiTagTasks,
            ReportOutput::CommentsPerUser(_) => ReportKind::CommentsPerUser,
            ReportOutput::TeamTaskRanking(_) => ReportKind::TeamTaskRanking,
            ReportOutput::StoryCommenters(_) => ReportKind::StoryCommenters,
            ReportOutput::MostUsedTagPerUser(_) => ReportKind::MostUsedTagPerUser,
            ReportOutput::ProjectsByAverageComments(_) => ReportKind::ProjectsByAverageComments,
            ReportOutput::ForeignTaskCommenters(_) => ReportKind::ForeignTaskCommenters,
        }
    }

    /// Number of rows; the single-result report counts 0 or 1.
    pub fn len(&self) -> usize {
        match self {
            ReportOutput::ProjectSummary(rows) => rows.len(),
            ReportOutput::HeavilyCommentedTasks(rows) => rows.len(),
            ReportOutput::TopBugCreator(row) => usize::from(row.is_some()),
            ReportOutput::TaskCountPerTag(rows) => rows.len(),
            ReportOutput::SelfAssignedTasks(rows) => rows.len(),
            ReportOutput::LatestComments(rows) => rows.len(),
            ReportOutput::MultiTagTasks(rows) => rows.len(),
            ReportOutput::CommentsPerUser(rows) => rows.len(),
            ReportOutput::TeamTaskRanking(rows) => rows.len(),
            ReportOutput::StoryCommenters(rows) => rows.len(),
            ReportOutput::MostUsedTagPerUser(rows) => rows.len(),
            ReportOutput::ProjectsByAverageComments(rows) => rows.len(),
            ReportOutput::ForeignTaskCommenters(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep at most `limit` rows, preserving report order.
    pub fn truncated(mut self, limit: usize) -> Self {
        match &mut self {
            ReportOutput::ProjectSummary(rows) => rows.truncate(limit),
            ReportOutput::HeavilyCommentedTasks(rows) => rows.truncate(limit),
            ReportOutput::TopBugCreator(row) => {
                if limit == 0 {
                    *row = None;
                }
            }
            ReportOutput::TaskCountPerTag(rows) => rows.truncate(limit),
            ReportOutput::SelfAssignedTasks(rows) => rows.truncate(limit),
            ReportOutput::LatestComments(rows) => rows.truncate(limit),
            ReportOutput::MultiTagTasks(rows) => rows.truncate(limit),
            ReportOutput::CommentsPerUser(rows) => rows.truncate(limit),
            ReportOutput::TeamTaskRanking(rows) => rows.truncate(limit),
            ReportOutput::StoryCommenters(rows) => rows.truncate(limit),
            ReportOutput::MostUsedTagPerUser(rows) => rows.truncate(limit),
            ReportOutput::ProjectsByAverageComments(rows) => rows.truncate(limit),
            ReportOutput::ForeignTaskCommenters(rows) => rows.truncate(limit),
        }
        self
    }
}
