//! Group tree model: nodes, statuses, and per-group log buffers.

use std::collections::HashMap;

use uuid::Uuid;

/// Opaque identifier of a group. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(Uuid);

impl GroupId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a group. Exactly one holds at any instant; a terminal
/// status (`Done`/`Failed`/`ChildFailed`) is entered at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Running,
    Done,
    Failed,
    ChildFailed,
}

impl GroupStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GroupStatus::Running)
    }
}

/// One node in the task tree: the unit of log attribution and status.
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    name: String,
    children: Vec<GroupId>,
    lines: Vec<String>,
    finished_lines: Vec<String>,
    status: GroupStatus,
    error_text: Option<String>,
}

impl Group {
    fn new(id: GroupId, name: String) -> Self {
        Self {
            id,
            name,
            children: Vec::new(),
            lines: Vec::new(),
            finished_lines: Vec::new(),
            status: GroupStatus::Running,
            error_text: None,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child ids in creation order.
    pub fn children(&self) -> &[GroupId] {
        &self.children
    }

    /// Every line logged by this group's own code, in call order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Curated summary lines, shown instead of `lines` once the group is done
    /// and truncation is on.
    pub fn finished_lines(&self) -> &[String] {
        &self.finished_lines
    }

    pub fn status(&self) -> GroupStatus {
        self.status
    }

    /// Captured failure detail. Present exactly when `status` is `Failed`.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }
}

/// Split a message into display lines.
///
/// Tabs are expanded to two spaces so box alignment never depends on terminal
/// tab stops.
fn split_lines(message: &str) -> impl Iterator<Item = String> + '_ {
    message.split('\n').map(|line| line.replace('\t', "  "))
}

/// The rooted forest of groups for one session.
///
/// Groups are attached synchronously at creation and never deleted; they stay
/// visible to the renderer for the remainder of the session.
#[derive(Debug, Default)]
pub struct GroupTree {
    roots: Vec<GroupId>,
    groups: HashMap<GroupId, Group>,
}

impl GroupTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group under `parent`, or as a new root when `parent` is
    /// `None`, and return its id.
    pub fn begin_group(&mut self, name: impl Into<String>, parent: Option<GroupId>) -> GroupId {
        let id = GroupId::new();
        self.groups.insert(id, Group::new(id, name.into()));
        match parent.and_then(|pid| self.groups.get_mut(&pid)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Append `message` (split into display lines) to the group's log.
    pub fn append_line(&mut self, id: GroupId, message: &str) {
        if let Some(group) = self.groups.get_mut(&id) {
            group.lines.extend(split_lines(message));
        }
    }

    /// Append `message` to both the log and the finished-summary buffer.
    pub fn append_finished_line(&mut self, id: GroupId, message: &str) {
        if let Some(group) = self.groups.get_mut(&id) {
            for line in split_lines(message) {
                group.lines.push(line.clone());
                group.finished_lines.push(line);
            }
        }
    }

    /// Mark the group `Done`. No-op if the group is already terminal.
    pub fn complete_group(&mut self, id: GroupId) {
        if let Some(group) = self.groups.get_mut(&id) {
            if !group.status.is_terminal() {
                group.status = GroupStatus::Done;
            }
        }
    }

    /// Mark the group `Failed` and capture the failure detail.
    ///
    /// This records an origin failure: the error surfaced for the first time
    /// in this group's own work.
    pub fn fail_group(&mut self, id: GroupId, detail: String) {
        if let Some(group) = self.groups.get_mut(&id) {
            if !group.status.is_terminal() {
                group.status = GroupStatus::Failed;
                group.error_text = Some(detail);
            }
        }
    }

    /// Mark the group `ChildFailed`: a descendant's error passed through this
    /// scope. No detail is captured here; the origin group already holds it.
    pub fn mark_child_failed(&mut self, id: GroupId) {
        if let Some(group) = self.groups.get_mut(&id) {
            if !group.status.is_terminal() {
                group.status = GroupStatus::ChildFailed;
            }
        }
    }

    /// Root group ids in creation order.
    pub fn roots(&self) -> &[GroupId] {
        &self.roots
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupStatus, GroupTree};

    #[test]
    fn groups_without_parent_become_roots() {
        let mut tree = GroupTree::new();
        let a = tree.begin_group("a", None);
        let b = tree.begin_group("b", None);
        assert_eq!(tree.roots(), &[a, b]);
    }

    #[test]
    fn children_preserve_creation_order() {
        let mut tree = GroupTree::new();
        let root = tree.begin_group("root", None);
        let first = tree.begin_group("first", Some(root));
        let second = tree.begin_group("second", Some(root));
        assert_eq!(tree.group(root).unwrap().children(), &[first, second]);
        assert_eq!(tree.roots(), &[root]);
    }

    #[test]
    fn append_splits_on_newlines_and_expands_tabs() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.append_line(id, "one\ntwo\tend");
        assert_eq!(tree.group(id).unwrap().lines(), &["one", "two  end"]);
    }

    #[test]
    fn finished_lines_append_to_both_buffers() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.append_line(id, "progress");
        tree.append_finished_line(id, "summary");
        let group = tree.group(id).unwrap();
        assert_eq!(group.lines(), &["progress", "summary"]);
        assert_eq!(group.finished_lines(), &["summary"]);
    }

    #[test]
    fn complete_is_idempotent() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.append_line(id, "line");
        tree.complete_group(id);
        tree.complete_group(id);
        let group = tree.group(id).unwrap();
        assert_eq!(group.status(), GroupStatus::Done);
        assert_eq!(group.lines(), &["line"]);
    }

    #[test]
    fn terminal_status_is_entered_at_most_once() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.fail_group(id, "boom".to_string());
        tree.complete_group(id);
        tree.mark_child_failed(id);
        let group = tree.group(id).unwrap();
        assert_eq!(group.status(), GroupStatus::Failed);
        assert_eq!(group.error_text(), Some("boom"));
    }

    #[test]
    fn child_failed_captures_no_detail() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.mark_child_failed(id);
        let group = tree.group(id).unwrap();
        assert_eq!(group.status(), GroupStatus::ChildFailed);
        assert!(group.error_text().is_none());
    }

    #[test]
    fn appends_after_termination_remain_safe() {
        let mut tree = GroupTree::new();
        let id = tree.begin_group("g", None);
        tree.complete_group(id);
        tree.append_line(id, "post-hoc");
        assert_eq!(tree.group(id).unwrap().lines(), &["post-hoc"]);
    }
}
