//! Row-anchored action popup.
//!
//! `Closed → Open(row, x, y) → Closed`. Opening while open replaces the
//! previous menu; there is never more than one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Fixed size of the popup plus the gap it keeps from the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
    pub padding: i32,
}

impl Footprint {
    /// Pixel footprint of the original web popup.
    pub const DEFAULT: Footprint = Footprint {
        width: 160,
        height: 120,
        padding: 8,
    };

    pub const fn new(width: i32, height: i32, padding: i32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Move `at` so the whole footprint sits inside `viewport`, `padding`
    /// away from every edge. When the viewport is too small the top-left
    /// padding wins.
    pub fn clamp(&self, at: Point, viewport: Viewport) -> Point {
        Point {
            x: clamp_axis(at.x, self.width, self.padding, viewport.width),
            y: clamp_axis(at.y, self.height, self.padding, viewport.height),
        }
    }
}

fn clamp_axis(pos: i32, size: i32, padding: i32, limit: i32) -> i32 {
    let mut pos = pos;
    if pos + size + padding > limit {
        pos = limit - size - padding;
    }
    if pos < padding {
        pos = padding;
    }
    pos
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState<R> {
    Closed,
    Open { row: R, at: Point },
}

/// What a page feeds the menu. A single input event maps to exactly one
/// interaction, so a trigger can never also count as an outside click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction<R> {
    /// The per-row action control was activated at `pointer`.
    Trigger { row: R, pointer: Point },
    /// Any other pointer interaction on the page.
    Click { pointer: Point },
    /// Keyboard dismissal.
    Dismiss,
}

/// Whether the page-level handlers should still see the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

#[derive(Debug, Clone)]
pub struct ActionMenu<R> {
    state: MenuState<R>,
    footprint: Footprint,
}

impl<R> Default for ActionMenu<R> {
    fn default() -> Self {
        Self::new(Footprint::DEFAULT)
    }
}

impl<R> ActionMenu<R> {
    pub fn new(footprint: Footprint) -> Self {
        Self {
            state: MenuState::Closed,
            footprint,
        }
    }

    pub fn state(&self) -> &MenuState<R> {
        &self.state
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open { .. })
    }

    pub fn selected(&self) -> Option<&R> {
        match &self.state {
            MenuState::Open { row, .. } => Some(row),
            MenuState::Closed => None,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match &self.state {
            MenuState::Open { at, .. } => Some(*at),
            MenuState::Closed => None,
        }
    }

    /// Open for `row` at the clamped `pointer`, replacing any open menu.
    pub fn open(&mut self, row: R, pointer: Point, viewport: Viewport) {
        let at = self.footprint.clamp(pointer, viewport);
        self.state = MenuState::Open { row, at };
    }

    pub fn close(&mut self) {
        self.state = MenuState::Closed;
    }

    /// Close after a menu action succeeded, handing back the row it was
    /// bound to.
    pub fn complete(&mut self) -> Option<R> {
        match std::mem::replace(&mut self.state, MenuState::Closed) {
            MenuState::Open { row, .. } => Some(row),
            MenuState::Closed => None,
        }
    }

    /// Whether `point` falls inside the open menu.
    pub fn contains(&self, point: Point) -> bool {
        match self.position() {
            Some(at) => {
                point.x >= at.x
                    && point.x < at.x + self.footprint.width
                    && point.y >= at.y
                    && point.y < at.y + self.footprint.height
            }
            None => false,
        }
    }

    pub fn interact(&mut self, interaction: Interaction<R>, viewport: Viewport) -> Propagation {
        match interaction {
            Interaction::Trigger { row, pointer } => {
                self.open(row, pointer, viewport);
                Propagation::Stop
            }
            Interaction::Click { pointer } => {
                if self.contains(pointer) {
                    Propagation::Stop
                } else {
                    self.close();
                    Propagation::Continue
                }
            }
            Interaction::Dismiss => {
                self.close();
                Propagation::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1280, 800);

    #[test]
    fn opening_near_bottom_right_stays_inside() {
        let mut menu: ActionMenu<u32> = ActionMenu::default();
        menu.open(1, Point::new(VIEW.width - 5, VIEW.height - 5), VIEW);

        let at = menu.position().unwrap();
        let fp = Footprint::DEFAULT;
        assert!(at.x <= VIEW.width - fp.width - fp.padding);
        assert!(at.y <= VIEW.height - fp.height - fp.padding);
        assert!(at.x >= fp.padding && at.y >= fp.padding);
    }

    #[test]
    fn opening_near_top_left_is_pushed_to_padding() {
        let fp = Footprint::DEFAULT;
        assert_eq!(fp.clamp(Point::new(-20, 2), VIEW), Point::new(8, 8));
    }

    #[test]
    fn position_inside_bounds_is_untouched() {
        let fp = Footprint::DEFAULT;
        assert_eq!(fp.clamp(Point::new(300, 200), VIEW), Point::new(300, 200));
    }

    #[test]
    fn tiny_viewport_prefers_top_left_padding() {
        let fp = Footprint::new(10, 4, 1);
        assert_eq!(fp.clamp(Point::new(5, 5), Viewport::new(6, 3)), Point::new(1, 1));
    }

    #[test]
    fn second_trigger_replaces_first_menu() {
        let mut menu = ActionMenu::default();
        menu.interact(
            Interaction::Trigger {
                row: "A",
                pointer: Point::new(100, 100),
            },
            VIEW,
        );
        menu.interact(
            Interaction::Trigger {
                row: "B",
                pointer: Point::new(400, 300),
            },
            VIEW,
        );

        assert_eq!(menu.selected(), Some(&"B"));
        assert_eq!(
            menu.state(),
            &MenuState::Open {
                row: "B",
                at: Point::new(400, 300)
            }
        );
    }

    #[test]
    fn trigger_stops_propagation_and_stays_open() {
        let mut menu = ActionMenu::default();
        let p = menu.interact(
            Interaction::Trigger {
                row: 9,
                pointer: Point::new(10, 10),
            },
            VIEW,
        );
        assert_eq!(p, Propagation::Stop);
        assert!(menu.is_open());
    }

    #[test]
    fn outside_click_closes_and_clears_selection() {
        let mut menu = ActionMenu::default();
        menu.open(3, Point::new(100, 100), VIEW);

        let p = menu.interact(Interaction::Click { pointer: Point::new(5, 5) }, VIEW);
        assert_eq!(p, Propagation::Continue);
        assert!(!menu.is_open());
        assert_eq!(menu.selected(), None);
    }

    #[test]
    fn inside_click_keeps_menu_open() {
        let mut menu = ActionMenu::default();
        menu.open(3, Point::new(100, 100), VIEW);

        let p = menu.interact(Interaction::Click { pointer: Point::new(150, 150) }, VIEW);
        assert_eq!(p, Propagation::Stop);
        assert_eq!(menu.selected(), Some(&3));
    }

    #[test]
    fn complete_returns_row_and_closes() {
        let mut menu = ActionMenu::default();
        menu.open(11, Point::new(100, 100), VIEW);
        assert_eq!(menu.complete(), Some(11));
        assert!(!menu.is_open());
        assert_eq!(menu.complete(), None);
    }

    #[test]
    fn dismiss_closes() {
        let mut menu = ActionMenu::default();
        menu.open(1, Point::new(100, 100), VIEW);
        menu.interact(Interaction::Dismiss, VIEW);
        assert!(!menu.is_open());
    }
}
