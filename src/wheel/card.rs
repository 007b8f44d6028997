//! Question card reveal state and the numbered status grid.

use super::Snapshot;

/// Whether the answer of the presented riddle has been peeked at.
///
/// Keyed by the riddle on show: presenting a different riddle (or none) hides
/// the answer again. There is no way to un-reveal the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuestionCard {
    riddle: Option<u32>,
    revealed: bool,
}

impl QuestionCard {
    /// Points the card at `riddle`; clears the reveal if that changes anything.
    pub fn present(&mut self, riddle: Option<u32>) {
        if self.riddle != riddle {
            self.riddle = riddle;
            self.revealed = false;
        }
    }

    /// Shows the answer. Does nothing with no riddle on the card.
    pub fn peek(&mut self) {
        if self.riddle.is_some() {
            self.revealed = true;
        }
    }

    pub fn riddle(&self) -> Option<u32> {
        self.riddle
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Current,
    Available,
    Spent,
}

impl CellStatus {
    pub fn css(self) -> &'static str {
        match self {
            CellStatus::Current => "background:#ec4899;border-color:#f472b6;color:#fff;box-shadow:0 0 10px #ec4899;transform:scale(1.1);",
            CellStatus::Available => "background:#1e293b;border-color:#164e63;color:#22d3ee;box-shadow:0 0 5px rgba(6,182,212,0.2);",
            CellStatus::Spent => "background:#0f172a;border-color:#1e293b;color:#334155;text-decoration:line-through;",
        }
    }
}

/// One `(id, status)` cell per segment in id order.
pub fn status_grid(snapshot: &Snapshot) -> Vec<(u32, CellStatus)> {
    (1..=snapshot.segments)
        .map(|id| {
            let status = if snapshot.active == Some(id) {
                CellStatus::Current
            } else if snapshot.is_available(id) {
                CellStatus::Available
            } else {
                CellStatus::Spent
            };
            (id, status)
        })
        .collect()
}
