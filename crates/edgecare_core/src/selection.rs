//! Per-session body-map selection.
//!
//! Holds at most one selected region and the view (front/back) currently on
//! screen. Marking is derived from the selection, never stored, so flipping
//! views cannot drift the two figures apart.

use crate::body::{self, BodyView};
use crate::{LogError, LogResult};

pub const PLACEHOLDER_HINT: &str = "Tap a body area to select it";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
    view: BodyView,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected: None,
            view: BodyView::Front,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle semantics: selecting the current part clears it.
    pub fn select(&mut self, part: &str) -> LogResult<()> {
        if !body::is_known(part) {
            return Err(LogError::Validation(format!("unknown body part: {part}")));
        }
        if self.selected.as_deref() == Some(part) {
            self.selected = None;
        } else {
            self.selected = Some(part.to_string());
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn view(&self) -> BodyView {
        self.view
    }

    pub fn show(&mut self, view: BodyView) {
        self.view = view;
    }

    pub fn flip_view(&mut self) {
        self.view = self.view.flipped();
    }

    /// The single marked element across both figures, if any.
    pub fn marked(&self) -> Option<(BodyView, &str)> {
        let part = self.selected.as_deref()?;
        body::view_of(part).map(|view| (view, part))
    }

    pub fn is_marked(&self, view: BodyView, part: &str) -> bool {
        self.marked() == Some((view, part))
    }

    /// Parts marked on one figure; at most one across both.
    pub fn marked_on(&self, view: BodyView) -> Vec<&'static str> {
        body::parts_on(view)
            .filter(|part| self.is_marked(view, part))
            .collect()
    }

    pub fn submit_enabled(&self) -> bool {
        self.selected.is_some()
    }

    pub fn hint(&self) -> String {
        match &self.selected {
            Some(part) => format!("Selected: {part}"),
            None => PLACEHOLDER_HINT.to_string(),
        }
    }
}
