//! Context menu state and placement.

use beam_rpc::ContextAction;
use ratatui::layout::{Position, Rect};

/// Minimum distance kept between the menu and the viewport edges.
pub const MENU_MARGIN: u16 = 8;

const MIN_WIDTH: u16 = 14;

#[derive(Debug)]
pub struct OpenMenu {
    pub target_id: String,
    pub actions: Vec<ContextAction>,
    pub area: Rect,
}

/// Either closed or open against a single target result. Opening while open
/// retargets the menu; there is never more than one.
#[derive(Debug, Default)]
pub struct ContextMenu {
    open: Option<OpenMenu>,
}

impl ContextMenu {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn state(&self) -> Option<&OpenMenu> {
        self.open.as_ref()
    }

    /// Open at the pointer position, nudged inside the viewport margins.
    pub fn open(
        &mut self,
        target_id: String,
        actions: Vec<ContextAction>,
        anchor: (u16, u16),
        viewport: Rect,
    ) {
        let size = menu_size(&actions);
        let (x, y) = clamped_position(anchor, size, viewport);
        self.open = Some(OpenMenu {
            target_id,
            actions,
            area: Rect::new(x, y, size.0, size.1),
        });
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.open
            .as_ref()
            .is_some_and(|m| m.area.contains(Position { x: column, y: row }))
    }

    /// The action under the pointer, if it is over a menu row.
    pub fn action_at(&self, column: u16, row: u16) -> Option<&ContextAction> {
        let menu = self.open.as_ref()?;
        if !menu.area.contains(Position { x: column, y: row }) {
            return None;
        }
        // One action per row inside the border.
        let index = row.checked_sub(menu.area.y + 1)? as usize;
        menu.actions.get(index)
    }
}

/// Border plus one row per action; width fits the longest label.
fn menu_size(actions: &[ContextAction]) -> (u16, u16) {
    #[allow(clippy::cast_possible_truncation)] // Labels are short UI strings
    let label_width = actions
        .iter()
        .map(|a| (a.icon.chars().count() + a.label.chars().count() + 1) as u16)
        .max()
        .unwrap_or(0);
    let width = (label_width + 4).max(MIN_WIDTH);
    #[allow(clippy::cast_possible_truncation)] // Action lists are small
    let height = actions.len() as u16 + 2;
    (width, height)
}

/// Clamp a menu of `size` anchored at the pointer so it stays at least
/// [`MENU_MARGIN`] cells from the right and bottom viewport edges. Anchors
/// inside the margin already are left where they are.
pub fn clamped_position(anchor: (u16, u16), size: (u16, u16), viewport: Rect) -> (u16, u16) {
    let max_x = viewport
        .width
        .saturating_sub(size.0)
        .saturating_sub(MENU_MARGIN);
    let max_y = viewport
        .height
        .saturating_sub(size.1)
        .saturating_sub(MENU_MARGIN);
    (anchor.0.min(max_x), anchor.1.min(max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: &str, label: &str) -> ContextAction {
        ContextAction {
            id: id.to_string(),
            label: label.to_string(),
            icon: ">".to_string(),
        }
    }

    fn viewport() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn test_open_close_lifecycle() {
        let mut menu = ContextMenu::default();
        assert!(!menu.is_open());

        menu.open(
            "file:notes".to_string(),
            vec![action("open", "Open"), action("copy-path", "Copy Path")],
            (10, 5),
            viewport(),
        );
        assert!(menu.is_open());
        assert_eq!(menu.state().unwrap().target_id, "file:notes");

        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_reopen_retargets() {
        let mut menu = ContextMenu::default();
        menu.open("a".to_string(), vec![action("open", "Open")], (5, 5), viewport());
        menu.open("b".to_string(), vec![action("open", "Open")], (7, 7), viewport());

        assert_eq!(menu.state().unwrap().target_id, "b");
    }

    #[test]
    fn test_anchor_inside_margin_unmoved() {
        let pos = clamped_position((10, 5), (20, 6), viewport());
        assert_eq!(pos, (10, 5));
    }

    #[test]
    fn test_anchor_near_right_edge_pulled_back() {
        // Menu 20 wide at x=110 would spill past a 120-wide viewport.
        let pos = clamped_position((110, 5), (20, 6), viewport());
        assert_eq!(pos.0, 120 - 20 - MENU_MARGIN);
        assert_eq!(pos.1, 5);
    }

    #[test]
    fn test_anchor_near_bottom_edge_pulled_up() {
        let pos = clamped_position((10, 38), (20, 6), viewport());
        assert_eq!(pos.0, 10);
        assert_eq!(pos.1, 40 - 6 - MENU_MARGIN);
    }

    #[test]
    fn test_tiny_viewport_clamps_to_origin() {
        let pos = clamped_position((5, 5), (20, 6), Rect::new(0, 0, 10, 4));
        assert_eq!(pos, (0, 0));
    }

    #[test]
    fn test_action_at_maps_rows() {
        let mut menu = ContextMenu::default();
        menu.open(
            "file:notes".to_string(),
            vec![action("open", "Open"), action("explorer", "Show in Folder")],
            (10, 5),
            viewport(),
        );

        let area = menu.state().unwrap().area;
        // First inner row is the first action.
        assert_eq!(menu.action_at(area.x + 2, area.y + 1).unwrap().id, "open");
        assert_eq!(
            menu.action_at(area.x + 2, area.y + 2).unwrap().id,
            "explorer"
        );
        // Border rows and outside hits map to nothing.
        assert!(menu.action_at(area.x + 2, area.y).is_none());
        assert!(menu.action_at(area.x, area.y.saturating_sub(1)).is_none());
    }

    #[test]
    fn test_contains_tracks_area() {
        let mut menu = ContextMenu::default();
        menu.open("x".to_string(), vec![action("open", "Open")], (10, 5), viewport());

        let area = menu.state().unwrap().area;
        assert!(menu.contains(area.x, area.y));
        assert!(!menu.contains(area.x + area.width, area.y));
    }
}
