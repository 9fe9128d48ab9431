use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, mode: &Mode) -> MineLayout;
}

/// Hands out a layout that was decided up front, for replays and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    layout: MineLayout,
}

impl FixedMinefieldGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(self, _mode: &Mode) -> MineLayout {
        self.layout
    }
}
