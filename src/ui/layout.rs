use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the calculator column.
const CALCULATOR_WIDTH: u16 = 44;
/// Width of the history panel when shown beside the calculator.
const HISTORY_WIDTH: u16 = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // calculator and history side by side
    Narrow, // history replaces the keypad area
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= CALCULATOR_WIDTH + HISTORY_WIDTH + 2 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub calculator: Rect,
    pub history: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect, show_history: bool) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(area);
        let body = vertical[1];

        let (calculator, history) = match (show_history, tier) {
            (true, LayoutTier::Wide) => {
                let used = CALCULATOR_WIDTH + HISTORY_WIDTH + 2;
                let margin = body.width.saturating_sub(used) / 2;
                let horizontal = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Length(margin),
                        Constraint::Length(CALCULATOR_WIDTH),
                        Constraint::Length(2),
                        Constraint::Length(HISTORY_WIDTH),
                        Constraint::Min(0),
                    ])
                    .split(body);
                (horizontal[1], Some(horizontal[3]))
            }
            (true, LayoutTier::Narrow) => (body, Some(body)),
            (false, _) => (centered_column(CALCULATOR_WIDTH, body), None),
        };

        Self {
            header: vertical[0],
            calculator,
            history,
            footer: vertical[2],
            tier,
        }
    }
}

/// Horizontally centered column of at most `width` cells.
pub fn centered_column(width: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let left = area.x.saturating_add((area.width - w) / 2);
    Rect::new(left, area.y, w, area.height)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 10;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
