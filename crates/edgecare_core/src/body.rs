//! Body-part catalogue and the view each region is drawn on.

use serde::{Deserialize, Serialize};

/// Sentinel body part recorded by "no pain today" submissions.
pub const NO_PAIN: &str = "No Pain";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BodyView {
    Front,
    Back,
}

impl BodyView {
    pub fn flipped(self) -> Self {
        match self {
            BodyView::Front => BodyView::Back,
            BodyView::Back => BodyView::Front,
        }
    }
}

/// Every selectable region with the single view that renders it.
pub const BODY_PARTS: [(&str, BodyView); 15] = [
    ("Head / Neck", BodyView::Front),
    ("Left Shoulder", BodyView::Front),
    ("Right Shoulder", BodyView::Front),
    ("Chest", BodyView::Front),
    ("Abdomen", BodyView::Front),
    ("Upper Back", BodyView::Back),
    ("Lower Back", BodyView::Back),
    ("Left Hip", BodyView::Front),
    ("Right Hip", BodyView::Front),
    ("Left Hamstring", BodyView::Back),
    ("Right Hamstring", BodyView::Back),
    ("Left Knee", BodyView::Front),
    ("Right Knee", BodyView::Front),
    ("Left Ankle", BodyView::Front),
    ("Right Ankle", BodyView::Front),
];

pub fn is_known(part: &str) -> bool {
    view_of(part).is_some()
}

pub fn view_of(part: &str) -> Option<BodyView> {
    BODY_PARTS
        .iter()
        .find(|(name, _)| *name == part)
        .map(|(_, view)| *view)
}

pub fn parts_on(view: BodyView) -> impl Iterator<Item = &'static str> {
    BODY_PARTS
        .iter()
        .filter(move |(_, v)| *v == view)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_not_selectable() {
        assert!(!is_known(NO_PAIN));
    }

    #[test]
    fn every_part_lives_on_exactly_one_view() {
        let front = parts_on(BodyView::Front).count();
        let back = parts_on(BodyView::Back).count();
        assert_eq!(front + back, BODY_PARTS.len());
        assert_eq!(view_of("Lower Back"), Some(BodyView::Back));
        assert_eq!(view_of("Left Knee"), Some(BodyView::Front));
    }
}
