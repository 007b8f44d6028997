//! Riddle lookup keyed by segment id.
//!
//! The table is loaded once at startup and never mutated. Every id in `1..=N`
//! must have exactly one record; [`RiddleTable::validate`] enforces that before
//! the wheel is built.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::error::RiddleTableError;

/// Built-in riddles as `(id, question, answer)`.
pub const BUILTIN_RIDDLES: &[(u32, &str, &str)] = &[
    (1, "Once in a minute, twice in a moment, never in a thousand years. What is it?", "The letter M"),
    (2, "Which month has 28 days?", "Every month"),
    (3, "I have cities but no houses, forests but no trees, water but no fish. What am I?", "A map"),
    (4, "Which English word is always spelled incorrectly?", "Incorrectly"),
    (5, "Which letter holds the most water?", "C (sea)"),
    (6, "A cowboy rode into town on Friday, stayed three days and left on Friday. How?", "His horse is named Friday"),
    (7, "You can hold it without ever touching it.", "Your breath"),
    (8, "Always hungry, it dies when given water.", "Fire"),
    (9, "Which food never spoils?", "Honey"),
    (10, "Which is the largest desert on Earth that is not the Sahara?", "Antarctica"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Riddle {
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(rename = "q"))]
    pub question: String,
    #[cfg_attr(feature = "serde", serde(rename = "a"))]
    pub answer: String,
}

/// Immutable id-ordered riddle collection.
#[derive(Clone, Debug)]
pub struct RiddleTable {
    riddles: Vec<Riddle>,
}

impl RiddleTable {
    /// Builds a table and checks that its ids are exactly `1..=len`.
    pub fn new(mut riddles: Vec<Riddle>) -> Result<Self, RiddleTableError> {
        riddles.sort_by_key(|r| r.id);
        let table = Self { riddles };
        table.validate(table.riddles.len() as u32)?;
        Ok(table)
    }

    /// The table shipped with the crate.
    pub fn builtin() -> &'static RiddleTable {
        static BUILTIN: OnceLock<RiddleTable> = OnceLock::new();
        BUILTIN.get_or_init(|| RiddleTable {
            riddles: BUILTIN_RIDDLES
                .iter()
                .map(|&(id, q, a)| Riddle {
                    id,
                    question: q.to_string(),
                    answer: a.to_string(),
                })
                .collect(),
        })
    }

    /// Parses a JSON array of `{"id", "q", "a"}` records.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, RiddleTableError> {
        let riddles: Vec<Riddle> =
            serde_json::from_str(json).map_err(|e| RiddleTableError::Parse(e.to_string()))?;
        Self::new(riddles)
    }

    /// Checks that the key set equals `1..=segments`.
    pub fn validate(&self, segments: u32) -> Result<(), RiddleTableError> {
        if self.riddles.is_empty() || segments == 0 {
            return Err(RiddleTableError::Empty);
        }
        let mut seen = BTreeSet::new();
        for r in &self.riddles {
            if r.id == 0 || r.id > segments {
                return Err(RiddleTableError::OutOfRange { id: r.id, segments });
            }
            if !seen.insert(r.id) {
                return Err(RiddleTableError::Duplicate(r.id));
            }
        }
        match (1..=segments).find(|id| !seen.contains(id)) {
            Some(missing) => Err(RiddleTableError::Missing(missing)),
            None => Ok(()),
        }
    }

    /// Number of wheel segments this table supports.
    pub fn segment_count(&self) -> u32 {
        self.riddles.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&Riddle> {
        self.riddles
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.riddles[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Riddle> {
        self.riddles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn riddle(id: u32) -> Riddle {
        Riddle {
            id,
            question: format!("q{id}"),
            answer: format!("a{id}"),
        }
    }

    #[test]
    fn builtin_table_covers_every_segment() {
        let table = RiddleTable::builtin();
        assert_eq!(table.segment_count(), 10);
        assert!(table.validate(10).is_ok());
        assert_eq!(table.get(7).map(|r| r.answer.as_str()), Some("Your breath"));
        assert!(table.get(0).is_none());
        assert!(table.get(11).is_none());
    }

    #[test]
    fn new_sorts_records_by_id() {
        let table = RiddleTable::new(vec![riddle(3), riddle(1), riddle(2)]).unwrap();
        let ids: Vec<u32> = table.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn gap_in_ids_is_rejected() {
        // ids 1, 2, 4: 4 is out of range for a three-record table
        let err = RiddleTable::new(vec![riddle(1), riddle(2), riddle(4)]).unwrap_err();
        assert!(matches!(err, RiddleTableError::OutOfRange { id: 4, segments: 3 }));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = RiddleTable::new(vec![riddle(1), riddle(1)]).unwrap_err();
        assert!(matches!(err, RiddleTableError::Duplicate(1)));
    }

    #[test]
    fn validate_reports_missing_segment() {
        let table = RiddleTable::new(vec![riddle(1), riddle(2)]).unwrap();
        assert!(matches!(table.validate(3), Err(RiddleTableError::Missing(3))));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(RiddleTable::new(Vec::new()), Err(RiddleTableError::Empty)));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_table_uses_short_field_names() {
        let json = r#"[{"id":2,"q":"Two?","a":"Yes"},{"id":1,"q":"One?","a":"No"}]"#;
        let table = RiddleTable::from_json(json).unwrap();
        assert_eq!(table.segment_count(), 2);
        assert_eq!(table.get(2).unwrap().question, "Two?");
        assert!(matches!(
            RiddleTable::from_json("{not json"),
            Err(RiddleTableError::Parse(_))
        ));
    }
}
