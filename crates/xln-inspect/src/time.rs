//! Time-travel: pick the frame a panel should render.
//!
//! A consumer holds an optional index into the history. `None` follows the
//! live head. An index past the end clamps to the last frame so a shrinking or
//! still-loading history never blanks the panel; a negative index counts as no
//! selection and falls through to live.

use std::borrow::Borrow;

use xln_frames::Frame;

/// Returns the frame to render for `requested`, or `None` when there is no
/// data at all.
///
/// Pure; callers re-run it whenever the index, the history or the live head
/// changes.
pub fn resolve<'a, T>(requested: Option<i64>, history: &'a [T], live: Option<&'a T>) -> Option<&'a T> {
    match clamp_index(requested, history.len()) {
        Some(idx) => Some(&history[idx]),
        None => live,
    }
}

/// Same rule as [`resolve`], but reports where the frame came from.
pub fn resolve_view<'a, T>(
    requested: Option<i64>,
    history: &'a [T],
    live: Option<&'a T>,
) -> TimeView<'a, T> {
    match clamp_index(requested, history.len()) {
        Some(index) => TimeView::Historical {
            index,
            of: history.len(),
            frame: &history[index],
        },
        None => match live {
            Some(frame) => TimeView::Live(frame),
            None => TimeView::NoData,
        },
    }
}

fn clamp_index(requested: Option<i64>, len: usize) -> Option<usize> {
    let idx = requested?;
    if len == 0 || idx < 0 {
        return None;
    }
    let last = len - 1;
    Some(usize::try_from(idx).map_or(last, |idx| idx.min(last)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeView<'a, T> {
    Historical { index: usize, of: usize, frame: &'a T },
    Live(&'a T),
    NoData,
}

impl<'a, T> TimeView<'a, T> {
    pub fn frame(&self) -> Option<&'a T> {
        match *self {
            TimeView::Historical { frame, .. } => Some(frame),
            TimeView::Live(frame) => Some(frame),
            TimeView::NoData => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, TimeView::Live(_))
    }
}

impl<T: Borrow<Frame>> TimeView<'_, T> {
    pub fn label(&self) -> String {
        match self {
            TimeView::Historical { index, of, frame } => format!(
                "frame {}/{} (height {})",
                index + 1,
                of,
                Borrow::<Frame>::borrow(*frame).height
            ),
            TimeView::Live(frame) => {
                format!("live (height {})", Borrow::<Frame>::borrow(*frame).height)
            }
            TimeView::NoData => "no data".to_string(),
        }
    }
}

/// The time index a panel holds, with the scrubber moves the UI offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeCursor {
    index: Option<i64>,
}

impl TimeCursor {
    pub fn live() -> Self {
        Self { index: None }
    }

    pub fn at(index: i64) -> Self {
        Self { index: Some(index) }
    }

    pub fn index(&self) -> Option<i64> {
        self.index
    }

    /// True when the cursor is following the head, including a negative index.
    pub fn is_live(&self) -> bool {
        !matches!(self.index, Some(idx) if idx >= 0)
    }

    pub fn follow_live(&mut self) {
        self.index = None;
    }

    pub fn seek(&mut self, index: i64) {
        self.index = Some(index);
    }

    pub fn jump_to_start(&mut self, len: usize) {
        if len > 0 {
            self.index = Some(0);
        }
    }

    /// Moves one frame back. From live this lands on the last recorded frame.
    pub fn step_back(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = match clamp_index(self.index, len) {
            Some(current) => Some(current.saturating_sub(1) as i64),
            None => Some((len - 1) as i64),
        };
    }

    /// Moves one frame forward. Stepping past the last frame returns to live.
    pub fn step_forward(&mut self, len: usize) {
        if let Some(current) = clamp_index(self.index, len) {
            self.index = if current + 1 >= len {
                None
            } else {
                Some((current + 1) as i64)
            };
        }
    }

    pub fn resolve<'a, T>(&self, history: &'a [T], live: Option<&'a T>) -> Option<&'a T> {
        resolve(self.index, history, live)
    }

    pub fn view<'a, T>(&self, history: &'a [T], live: Option<&'a T>) -> TimeView<'a, T> {
        resolve_view(self.index, history, live)
    }
}
