//! Scoped context resolver: maps the executing task to its owning group.
//!
//! The "current group" is a task-local value, inherited by value at every
//! suspension and fork point. Sequential awaits and nested calls see the
//! enclosing scope automatically; sibling branches of `join!`/`join_all` each
//! poll under their own scope and can never observe one another's context,
//! and a parent's scope is never disturbed while children run.
//!
//! `tokio::spawn` does not carry task-locals across; a detached task must
//! open its own [`scope`] from within the session or it hits the misuse
//! panic below.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::core::error::GroupError;
use crate::core::group::GroupId;
use crate::runtime::session::SessionInner;

tokio::task_local! {
    pub(crate) static SCOPE: ScopeCtx;
}

/// Context carried by every task inside a session: the session itself plus
/// the group owning the current dynamic extent (none at the session's top
/// level).
#[derive(Clone)]
pub(crate) struct ScopeCtx {
    pub(crate) session: Arc<SessionInner>,
    pub(crate) group: Option<GroupId>,
}

fn current_ctx(op: &str) -> ScopeCtx {
    SCOPE.try_with(ScopeCtx::clone).unwrap_or_else(|_| {
        panic!("grove_tui::{op} called outside of a running session (wrap the call in run_session)")
    })
}

fn current_group_ctx(op: &str) -> (Arc<SessionInner>, GroupId) {
    let ctx = current_ctx(op);
    let Some(group) = ctx.group else {
        panic!("grove_tui::{op} called outside of any group (wrap the call in scope(..))")
    };
    (ctx.session, group)
}

/// The group id owning the calling task's current dynamic extent.
///
/// # Panics
///
/// Calling this with no enclosing [`scope`] or outside a session is a
/// programming error and panics rather than silently resolving to nothing.
pub fn current_group() -> GroupId {
    current_group_ctx("current_group").1
}

/// Run `work` inside a new group named `name`.
///
/// The group is attached under the caller's current group (or as a root at
/// the session's top level) the moment the returned future is first polled,
/// before `work` produces any output. For the entire execution of `work` —
/// across awaits and nested calls, but not into concurrently started sibling
/// scopes — [`log`] and friends attribute to this group.
///
/// On success the group is marked done. On failure the error protocol of the
/// tree model applies: a fresh error is captured here (message plus cause
/// chain) and the group marked failed; an error already owned by a descendant
/// marks this group child-failed and is re-raised unchanged.
///
/// # Panics
///
/// Panics when called outside a session (see [`current_group`]).
pub async fn scope<T, F>(name: impl Into<String>, work: F) -> Result<T, GroupError>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let ctx = current_ctx("scope");
    let session = ctx.session.clone();
    let id = session.with_tree(|tree| tree.begin_group(name, ctx.group));
    session.request_render();

    let child_ctx = ScopeCtx {
        session: session.clone(),
        group: Some(id),
    };
    let result = SCOPE.scope(child_ctx, work).await;

    let outcome = match result {
        Ok(value) => {
            session.with_tree(|tree| tree.complete_group(id));
            Ok(value)
        }
        Err(err) => match err.downcast::<GroupError>() {
            Ok(marked) => {
                session.with_tree(|tree| tree.mark_child_failed(id));
                Err(marked)
            }
            Err(origin) => {
                let detail = format!("{origin:?}");
                session.with_tree(|tree| tree.fail_group(id, detail));
                Err(GroupError::new(id, origin))
            }
        },
    };
    session.request_render();
    outcome
}

/// Append a message to the current group's log.
///
/// Multi-line messages are split into individual display lines.
///
/// # Panics
///
/// Panics when called with no enclosing [`scope`] (see [`current_group`]) —
/// a dropped log line would hide a caller bug.
pub fn log(message: impl std::fmt::Display) {
    let (session, id) = current_group_ctx("log");
    session.with_tree(|tree| tree.append_line(id, &message.to_string()));
    session.request_render();
}

/// Append a message to the current group's log and to its finished-summary
/// buffer, shown instead of the full log once the group is done and the view
/// truncates.
///
/// # Panics
///
/// Same contract as [`log`].
pub fn log_finished(message: impl std::fmt::Display) {
    let (session, id) = current_group_ctx("log_finished");
    session.with_tree(|tree| tree.append_finished_line(id, &message.to_string()));
    session.request_render();
}

/// Append a non-text value to the current group's log as pretty-printed JSON.
///
/// Values that cannot be serialized log the serialization error instead of
/// being dropped.
///
/// # Panics
///
/// Same contract as [`log`].
pub fn log_value<T: Serialize>(value: &T) {
    let (session, id) = current_group_ctx("log_value");
    let text = serde_json::to_string_pretty(value)
        .unwrap_or_else(|err| format!("<unserializable value: {err}>"));
    session.with_tree(|tree| tree.append_line(id, &text));
    session.request_render();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::{current_group, log, log_finished, log_value, scope, ScopeCtx, SCOPE};
    use crate::config::SessionConfig;
    use crate::core::group::{GroupId, GroupStatus};
    use crate::core::terminal::CaptureTerminal;
    use crate::runtime::session::SessionInner;

    fn test_session() -> Arc<SessionInner> {
        let (terminal, _buffer) = CaptureTerminal::new(100, 30);
        let config = SessionConfig {
            output_to_console: false,
            ..SessionConfig::default()
        };
        Arc::new(SessionInner::new(config, Box::new(terminal)))
    }

    async fn in_session<T, F>(session: &Arc<SessionInner>, work: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let ctx = ScopeCtx {
            session: session.clone(),
            group: None,
        };
        SCOPE.scope(ctx, work).await
    }

    fn lines_of(session: &Arc<SessionInner>, id: GroupId) -> Vec<String> {
        session.with_tree(|tree| tree.group(id).unwrap().lines().to_vec())
    }

    fn status_of(session: &Arc<SessionInner>, id: GroupId) -> GroupStatus {
        session.with_tree(|tree| tree.group(id).unwrap().status())
    }

    #[tokio::test]
    async fn lines_attribute_to_the_active_group() {
        let session = test_session();
        let (outer, inner) = in_session(&session, async {
            scope("outer", async {
                log("outer line");
                let inner = scope("inner", async {
                    log("inner line");
                    Ok(current_group())
                })
                .await?;
                log("outer again");
                Ok((current_group(), inner))
            })
            .await
            .expect("scopes succeed")
        })
        .await;

        assert_eq!(lines_of(&session, outer), vec!["outer line", "outer again"]);
        assert_eq!(lines_of(&session, inner), vec!["inner line"]);
        assert_eq!(status_of(&session, outer), GroupStatus::Done);
        assert_eq!(status_of(&session, inner), GroupStatus::Done);
        let children =
            session.with_tree(|tree| tree.group(outer).unwrap().children().to_vec());
        assert_eq!(children, vec![inner]);
    }

    #[tokio::test(start_paused = true)]
    async fn sibling_scopes_stay_isolated_under_interleaving() {
        let session = test_session();
        let (parent, left, right) = in_session(&session, async {
            scope("parent", async {
                log("start");
                let left = scope("left", async {
                    log("left 1");
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    log("left 2");
                    Ok(current_group())
                });
                let right = scope("right", async {
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    log("right 1");
                    tokio::time::sleep(Duration::from_millis(6)).await;
                    log("right 2");
                    Ok(current_group())
                });
                let (left_id, right_id) = tokio::try_join!(left, right)?;
                log("end");
                Ok((current_group(), left_id, right_id))
            })
            .await
            .expect("scopes succeed")
        })
        .await;

        assert_eq!(lines_of(&session, parent), vec!["start", "end"]);
        assert_eq!(lines_of(&session, left), vec!["left 1", "left 2"]);
        assert_eq!(lines_of(&session, right), vec!["right 1", "right 2"]);
        let children =
            session.with_tree(|tree| tree.group(parent).unwrap().children().to_vec());
        assert_eq!(children, vec![left, right]);
    }

    #[tokio::test]
    async fn failure_marks_origin_once_and_ancestors_child_failed() {
        let session = test_session();
        let err = in_session(&session, async {
            scope("a", async {
                scope("b", async {
                    scope("c", async { Err::<(), _>(anyhow::anyhow!("boom")) }).await?;
                    Ok(())
                })
                .await?;
                Ok(())
            })
            .await
            .expect_err("failure must propagate")
        })
        .await;

        assert_eq!(err.to_string(), "boom");
        let origin = err.origin();
        assert_eq!(status_of(&session, origin), GroupStatus::Failed);

        session.with_tree(|tree| {
            let mut failed_details = 0;
            for root in tree.roots() {
                let mut stack = vec![*root];
                while let Some(id) = stack.pop() {
                    let group = tree.group(id).unwrap();
                    match group.status() {
                        GroupStatus::Failed => {
                            failed_details += 1;
                            assert!(group.error_text().unwrap().contains("boom"));
                        }
                        GroupStatus::ChildFailed => assert!(group.error_text().is_none()),
                        status => panic!("unexpected status {status:?}"),
                    }
                    stack.extend_from_slice(group.children());
                }
            }
            assert_eq!(failed_details, 1, "detail captured exactly once");
        });
    }

    #[tokio::test]
    async fn finished_lines_and_values_land_in_the_right_buffers() {
        #[derive(serde::Serialize)]
        struct Payload {
            name: &'static str,
            count: u32,
        }

        let session = test_session();
        let id = in_session(&session, async {
            scope("g", async {
                log_value(&Payload {
                    name: "x",
                    count: 2,
                });
                log_finished("all set");
                Ok(current_group())
            })
            .await
            .expect("scope succeeds")
        })
        .await;

        let lines = lines_of(&session, id);
        assert_eq!(lines[0], "{");
        assert!(lines.iter().any(|line| line.contains("\"name\": \"x\"")));
        assert_eq!(lines.last().map(String::as_str), Some("all set"));
        let finished =
            session.with_tree(|tree| tree.group(id).unwrap().finished_lines().to_vec());
        assert_eq!(finished, vec!["all set"]);
    }

    #[tokio::test]
    #[should_panic(expected = "outside of a running session")]
    async fn log_outside_session_panics() {
        log("nope");
    }

    #[tokio::test]
    #[should_panic(expected = "outside of any group")]
    async fn log_at_session_top_level_panics() {
        let session = test_session();
        in_session(&session, async {
            log("top level has no group");
        })
        .await;
    }
}
