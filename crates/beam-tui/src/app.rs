//! Application state and update handling for the TUI.

use std::process::{Command, Stdio};

use ratatui::widgets::ListState;
use tracing::{debug, warn};

use beam_rpc::{ClientError, ContextAction, IndexStatus, ResponseTag, SearchResult};

use crate::menu::ContextMenu;
use crate::notify::NotificationLog;
use crate::render::HitMap;
use crate::search::SearchCoordinator;
use crate::toast::Toast;

/// Result id of the inline calculator row; its value is copied locally
/// instead of being sent to the backend.
pub const CALC_RESULT_ID: &str = "calc-result";

/// Results whose ids carry this prefix are system commands; an "ok" outcome
/// echoes their own title and subtitle rather than a launch message.
pub const SYSTEM_ID_PREFIX: &str = "sys-";

/// Context action that copies the target's path. Feedback is shown even when
/// the backend reply carries no recognized tag.
pub const COPY_PATH_ACTION: &str = "copy-path";

/// Context action that reveals the target in the file manager. Always silent.
pub const EXPLORER_ACTION: &str = "explorer";

/// Copy text to clipboard using wl-copy or xclip fallback
pub fn copy_to_clipboard(text: &str) {
    let result = Command::new("wl-copy")
        .arg(text)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if result.is_err() {
        let _ = Command::new("xclip")
            .args(["-selection", "clipboard"])
            .stdin(Stdio::piped())
            .spawn()
            .and_then(|mut child| {
                use std::io::Write;
                if let Some(stdin) = child.stdin.as_mut() {
                    stdin.write_all(text.as_bytes())?;
                }
                Ok(())
            });
    }
}

/// Completed backend work arriving back on the event loop.
#[derive(Debug)]
pub enum BackendReply {
    Search {
        generation: u64,
        results: Result<Vec<SearchResult>, ClientError>,
    },
    Executed {
        result: SearchResult,
        outcome: Result<ResponseTag, ClientError>,
    },
    ContextActions {
        target_id: String,
        anchor: (u16, u16),
        actions: Result<Vec<ContextAction>, ClientError>,
    },
    ContextActionDone {
        target_id: String,
        action_id: String,
        outcome: Result<ResponseTag, ClientError>,
    },
}

/// What pressing Enter (or clicking a result) should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutePlan {
    /// Calculator rows never round-trip; the value is copied right here.
    CopyLocal { text: String },
    /// Everything else is executed by the backend.
    Backend { result: SearchResult },
}

/// Main application state
pub struct App {
    pub input: String,
    pub cursor_position: usize,
    pub results: Vec<SearchResult>,
    pub selected: usize,
    pub list_state: ListState,
    pub search: SearchCoordinator,
    pub toast: Toast,
    pub notifications: NotificationLog,
    pub menu: ContextMenu,
    pub hit: HitMap,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            input: String::new(),
            cursor_position: 0,
            results: Vec::new(),
            selected: 0,
            list_state,
            search: SearchCoordinator::default(),
            toast: Toast::default(),
            notifications: NotificationLog::default(),
            menu: ContextMenu::default(),
            hit: HitMap::default(),
            should_quit: false,
        }
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }

    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }

    /// Byte offset of the char-based cursor into the input string.
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }

    pub fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let current_index = self.cursor_position;
            let before_char_to_delete = self.input.chars().take(current_index - 1);
            let after_char_to_delete = self.input.chars().skip(current_index);
            self.input = before_char_to_delete.chain(after_char_to_delete).collect();
            self.move_cursor_left();
        }
    }

    /// The cursor counts chars, not bytes, so clamp against the char count.
    pub fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input.chars().count())
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Replace the result list and reset the selection to the top.
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
            self.list_state.select(Some(self.selected));
        }
    }

    pub fn select_previous(&mut self) {
        if !self.results.is_empty() {
            self.selected = if self.selected == 0 {
                self.results.len() - 1
            } else {
                self.selected - 1
            };
            self.list_state.select(Some(self.selected));
        }
    }

    /// Move the selection directly, e.g. from a pointer hit. Passing an
    /// out-of-range index is a caller bug.
    pub fn select(&mut self, index: usize) {
        debug_assert!(index < self.results.len(), "selection index out of range");
        if index < self.results.len() {
            self.selected = index;
            self.list_state.select(Some(index));
        }
    }

    /// Decide how the current selection should execute. `None` when there is
    /// nothing to act on.
    pub fn execute_plan(&self) -> Option<ExecutePlan> {
        let result = self.selected_result()?;
        if result.id == CALC_RESULT_ID {
            return Some(ExecutePlan::CopyLocal {
                text: result.title.clone(),
            });
        }
        Some(ExecutePlan::Backend {
            result: result.clone(),
        })
    }

    /// Apply a completed backend reply to the UI state.
    pub fn handle_reply(&mut self, reply: BackendReply) {
        match reply {
            BackendReply::Search {
                generation,
                results,
            } => {
                if !self.search.accepts(generation) {
                    debug!("discarding stale search response (generation {generation})");
                    return;
                }
                match results {
                    Ok(results) => self.set_results(results),
                    Err(e) => warn!("search failed: {e}"),
                }
            }
            BackendReply::Executed { result, outcome } => match outcome {
                Ok(tag) => {
                    if let Some((message, detail)) = execute_toast(&result, &tag) {
                        self.toast.show(message, detail);
                    }
                }
                Err(e) => warn!("execute failed for {}: {e}", result.id),
            },
            BackendReply::ContextActions {
                target_id,
                anchor,
                actions,
            } => match actions {
                Ok(actions) if actions.is_empty() => {
                    debug!("no context actions for {target_id}");
                }
                Ok(actions) => {
                    self.menu.open(target_id, actions, anchor, self.hit.viewport);
                }
                Err(e) => warn!("context actions failed for {target_id}: {e}"),
            },
            BackendReply::ContextActionDone {
                target_id,
                action_id,
                outcome,
            } => match outcome {
                Ok(tag) => {
                    if let Some((message, detail)) =
                        context_action_toast(&target_id, &action_id, &tag)
                    {
                        self.toast.show(message, detail);
                    }
                }
                Err(e) => warn!("context action {action_id} failed for {target_id}: {e}"),
            },
        }
    }

    /// Copy a calculator value to the clipboard and confirm with a toast.
    /// The one execute path that never touches the backend.
    pub fn copy_result_value(&mut self, text: &str) {
        copy_to_clipboard(text);
        self.toast.show("Copied result", text);
    }

    /// Record an index status push in the notification history.
    pub fn handle_index_status(&mut self, status: &IndexStatus) {
        self.notifications.record(&status.message, status.state.clone());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Feedback for an executed result.
///
/// "copied" means the backend placed something on the clipboard. A plain "ok"
/// is a launch, except for system commands, which describe themselves.
/// Anything else stays silent.
pub fn execute_toast(result: &SearchResult, tag: &ResponseTag) -> Option<(String, String)> {
    match tag {
        ResponseTag::Copied => Some(("Copied to clipboard".to_string(), result.title.clone())),
        ResponseTag::Ok if result.id.starts_with(SYSTEM_ID_PREFIX) => {
            Some((result.title.clone(), result.subtitle.clone()))
        }
        ResponseTag::Ok => Some((
            format!("Launched {}", result.title),
            result.path.clone().unwrap_or_default(),
        )),
        ResponseTag::Other(_) => None,
    }
}

/// Feedback for a completed context action.
///
/// Copy-path confirms whatever the backend said, explorer is always silent,
/// and any other action only announces a plain "ok".
pub fn context_action_toast(
    target_id: &str,
    action_id: &str,
    tag: &ResponseTag,
) -> Option<(String, String)> {
    if action_id == COPY_PATH_ACTION {
        return Some(("Path copied".to_string(), "Copied to clipboard".to_string()));
    }
    if action_id == EXPLORER_ACTION {
        return None;
    }
    if *tag == ResponseTag::Ok {
        return Some(("Launched".to_string(), target_id.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, title: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: "Application".to_string(),
            icon: None,
            category: "Applications".to_string(),
            path: Some(format!("/usr/bin/{title}")),
        }
    }

    fn app_with_results(n: usize) -> App {
        let mut app = App::new();
        let results = (0..n)
            .map(|i| result(&format!("app:{i}"), &format!("App {i}")))
            .collect();
        app.set_results(results);
        app
    }

    #[test]
    fn test_selection_wraps_both_directions() {
        let mut app = app_with_results(3);

        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 2);
        app.select_next();
        assert_eq!(app.selected, 0, "down from last wraps to first");

        app.select_previous();
        assert_eq!(app.selected, 2, "up from first wraps to last");
    }

    #[test]
    fn test_selection_noop_on_empty_list() {
        let mut app = App::new();
        app.select_next();
        app.select_previous();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_select_absolute() {
        let mut app = app_with_results(2);
        app.select(1);
        assert_eq!(app.selected, 1);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    #[should_panic(expected = "selection index out of range")]
    fn test_select_out_of_range_panics() {
        let mut app = app_with_results(2);
        app.select(5);
    }

    #[test]
    fn test_new_results_reset_selection() {
        let mut app = app_with_results(4);
        app.select(3);

        app.set_results(vec![result("app:x", "X")]);
        assert_eq!(app.selected, 0);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_stale_search_reply_discarded() {
        let mut app = app_with_results(1);

        let old = app.search.issue_default();
        let new = app.search.issue_default();

        app.handle_reply(BackendReply::Search {
            generation: old.generation,
            results: Ok(vec![result("stale:1", "Stale")]),
        });
        assert_eq!(app.results[0].title, "App 0", "stale response ignored");

        app.handle_reply(BackendReply::Search {
            generation: new.generation,
            results: Ok(vec![result("fresh:1", "Fresh")]),
        });
        assert_eq!(app.results[0].title, "Fresh");
    }

    #[test]
    fn test_search_error_keeps_current_results() {
        let mut app = app_with_results(2);
        let issued = app.search.issue_default();

        app.handle_reply(BackendReply::Search {
            generation: issued.generation,
            results: Err(ClientError::ConnectionClosed),
        });
        assert_eq!(app.results.len(), 2);
    }

    #[test]
    fn test_execute_plan_calc_copies_locally() {
        let mut app = App::new();
        let mut calc = result(CALC_RESULT_ID, "42");
        calc.category = "Calculator".to_string();
        app.set_results(vec![calc]);

        assert_eq!(
            app.execute_plan(),
            Some(ExecutePlan::CopyLocal {
                text: "42".to_string()
            })
        );
    }

    #[test]
    fn test_execute_plan_empty_list() {
        let app = App::new();
        assert_eq!(app.execute_plan(), None);
    }

    #[test]
    fn test_multibyte_char_then_another_char() {
        let mut app = App::new();
        app.enter_char('é');
        app.enter_char('x');
        assert_eq!(app.input, "éx");
        assert_eq!(app.cursor_position, 2);
    }

    #[test]
    fn test_multibyte_editing_mid_string() {
        let mut app = App::new();
        for c in "héllo".chars() {
            app.enter_char(c);
        }
        app.move_cursor_left();
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "hélo");
        assert_eq!(app.cursor_position, 2);

        app.enter_char('x');
        assert_eq!(app.input, "héxlo");
    }

    #[test]
    fn test_cursor_clamps_to_char_count() {
        let mut app = App::new();
        app.enter_char('é');
        app.move_cursor_right();
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 1, "one char, cursor caps at 1");
    }

    #[test]
    fn test_copy_result_value_toasts() {
        let mut app = App::new();
        app.copy_result_value("42");
        let toast = app.toast.visible().unwrap();
        assert_eq!(toast.message, "Copied result");
        assert_eq!(toast.detail, "42");
    }

    #[test]
    fn test_execute_toast_launch() {
        let notes = result("app:notes", "Notes");
        let toast = execute_toast(&notes, &ResponseTag::Ok).unwrap();
        assert_eq!(toast.0, "Launched Notes");
        assert_eq!(toast.1, "/usr/bin/Notes");
    }

    #[test]
    fn test_execute_toast_copied() {
        let snippet = result("clip:3", "some snippet");
        let toast = execute_toast(&snippet, &ResponseTag::Copied).unwrap();
        assert_eq!(toast.0, "Copied to clipboard");
        assert_eq!(toast.1, "some snippet");
    }

    #[test]
    fn test_execute_toast_system_command_echoes_itself() {
        let mut cmd = result("sys-suspend", "Suspend");
        cmd.subtitle = "Suspend the system".to_string();
        let toast = execute_toast(&cmd, &ResponseTag::Ok).unwrap();
        assert_eq!(toast.0, "Suspend");
        assert_eq!(toast.1, "Suspend the system");
    }

    #[test]
    fn test_execute_toast_unrecognized_tag_silent() {
        let notes = result("app:notes", "Notes");
        let tag = ResponseTag::Other("deferred".to_string());
        assert!(execute_toast(&notes, &tag).is_none());
    }

    #[test]
    fn test_executed_reply_shows_launch_toast() {
        let mut app = App::new();
        app.handle_reply(BackendReply::Executed {
            result: result("app:notes", "Notes"),
            outcome: Ok(ResponseTag::Ok),
        });
        assert_eq!(app.toast.visible().unwrap().message, "Launched Notes");
    }

    #[test]
    fn test_executed_reply_error_is_silent() {
        let mut app = App::new();
        app.handle_reply(BackendReply::Executed {
            result: result("app:notes", "Notes"),
            outcome: Err(ClientError::Timeout),
        });
        assert!(app.toast.visible().is_none());
    }

    #[test]
    fn test_context_action_toast_rules() {
        // copy-path toasts whatever the backend answered
        for tag in [
            ResponseTag::Ok,
            ResponseTag::Copied,
            ResponseTag::Other("weird".to_string()),
        ] {
            let toast = context_action_toast("file:doc", COPY_PATH_ACTION, &tag).unwrap();
            assert_eq!(toast.0, "Path copied");
        }

        // explorer is silent even on ok
        assert!(context_action_toast("file:doc", EXPLORER_ACTION, &ResponseTag::Ok).is_none());

        // other actions announce ok only
        let toast = context_action_toast("file:doc", "open-with", &ResponseTag::Ok).unwrap();
        assert_eq!(toast, ("Launched".to_string(), "file:doc".to_string()));
        assert!(
            context_action_toast("file:doc", "open-with", &ResponseTag::Other("x".to_string()))
                .is_none()
        );
    }

    #[test]
    fn test_context_actions_reply_opens_menu() {
        let mut app = App::new();
        app.hit.viewport = ratatui::layout::Rect::new(0, 0, 120, 40);

        app.handle_reply(BackendReply::ContextActions {
            target_id: "file:doc".to_string(),
            anchor: (12, 6),
            actions: Ok(vec![ContextAction {
                id: "open".to_string(),
                label: "Open".to_string(),
                icon: ">".to_string(),
            }]),
        });
        assert!(app.menu.is_open());
        assert_eq!(app.menu.state().unwrap().target_id, "file:doc");
    }

    #[test]
    fn test_empty_context_actions_keep_menu_closed() {
        let mut app = App::new();
        app.handle_reply(BackendReply::ContextActions {
            target_id: "file:doc".to_string(),
            anchor: (12, 6),
            actions: Ok(Vec::new()),
        });
        assert!(!app.menu.is_open());
    }

    #[test]
    fn test_index_status_recorded() {
        let mut app = App::new();
        app.handle_index_status(&IndexStatus {
            state: beam_rpc::IndexState::Ready,
            message: "Index ready".to_string(),
            count: 1234,
        });
        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.message, "Index ready");
        assert_eq!(latest.icon, "✓");
    }
}
