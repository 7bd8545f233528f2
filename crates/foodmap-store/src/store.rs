//! The per-place experience log.
//!
//! [`ExperienceStore`] owns a mapping from place id to an append-only list
//! of [`ExperienceRecord`]s and a [`PersistenceSink`] it writes through to
//! after every successful mutation. Place ids are opaque: the store never
//! checks them against a catalog, since catalogs are replaced on every
//! live reload while the experience log outlives them all.
//!
//! Mutations validate first and only then touch the map, so a rejected
//! call leaves the store exactly as it was. A failed write does not undo
//! the in-memory change; the outcome is handed back as a [`PersistOutcome`]
//! and the in-memory state stays authoritative for the session.

use std::fmt;

use chrono::{Local, NaiveDate};
use foodmap_types::{
    ExperienceDraft, ExperienceMap, ExperienceRecord, LikedFood, PlaceId, Rating, UnknownVariant,
};

use crate::codec;
use crate::error::{CodecError, CorruptStateWarning, ParseError, PersistenceError, ValidationError};
use crate::sink::PersistenceSink;

/// Result of the write-through that follows a mutation.
#[must_use]
#[derive(Debug)]
pub enum PersistOutcome {
    /// The full store was written to the sink.
    Persisted,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The write failed. The in-memory change still stands.
    NotPersisted(PersistenceError),
}

impl PersistOutcome {
    /// Whether the sink now reflects the in-memory state.
    pub const fn is_persisted(&self) -> bool {
        !matches!(self, Self::NotPersisted(_))
    }

    /// The write error, if any.
    pub const fn error(&self) -> Option<&PersistenceError> {
        match self {
            Self::NotPersisted(e) => Some(e),
            Self::Persisted | Self::Unchanged => None,
        }
    }
}

/// A successful append.
#[derive(Debug)]
pub struct AppendReceipt {
    /// The record as stored.
    pub record: ExperienceRecord,
    /// What happened on write-through.
    pub persistence: PersistOutcome,
}

/// A completed merge.
#[derive(Debug)]
pub struct MergeReport {
    /// Total records added across all places.
    pub added: usize,
    /// Number of places that received at least one record.
    pub places: usize,
    /// What happened on write-through. `Unchanged` when nothing was added.
    pub persistence: PersistOutcome,
}

/// A store fresh from its sink, plus a warning if the sink held garbage.
#[derive(Debug)]
pub struct LoadedStore {
    /// The store, empty if nothing usable was persisted.
    pub store: ExperienceStore,
    /// Set when persisted state existed but was discarded.
    pub warning: Option<CorruptStateWarning>,
}

/// Per-place append-only experience log with write-through persistence.
pub struct ExperienceStore {
    experiences: ExperienceMap,
    sink: Box<dyn PersistenceSink>,
}

impl fmt::Debug for ExperienceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperienceStore")
            .field("places", &self.experiences.len())
            .field("records", &self.total_records())
            .field("sink", &self.sink.describe())
            .finish()
    }
}

impl ExperienceStore {
    /// An empty store writing to `sink`. The sink is not read.
    pub fn new(sink: impl PersistenceSink + 'static) -> Self {
        Self::from_map(ExperienceMap::new(), sink)
    }

    /// A store seeded with `experiences`, writing to `sink`.
    ///
    /// Empty record lists are dropped so that [`place_ids`](Self::place_ids)
    /// only ever lists places with history.
    pub fn from_map(mut experiences: ExperienceMap, sink: impl PersistenceSink + 'static) -> Self {
        experiences.retain(|_, records| !records.is_empty());
        Self {
            experiences,
            sink: Box::new(sink),
        }
    }

    /// Load the store persisted in `sink`.
    ///
    /// Absent (or blank) content yields an empty store. Content that cannot
    /// be read or decoded also yields an empty store, together with a
    /// [`CorruptStateWarning`]. Loading itself never fails.
    pub fn load(sink: impl PersistenceSink + 'static) -> LoadedStore {
        let source = sink.describe();
        let outcome = match sink.read() {
            Ok(None) => Ok(ExperienceMap::new()),
            Ok(Some(text)) if text.trim().is_empty() => Ok(ExperienceMap::new()),
            Ok(Some(text)) => codec::decode(&text).map_err(|e| e.reason),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(map) => {
                let store = Self::from_map(map, sink);
                tracing::info!(
                    sink = %source,
                    places = store.experiences.len(),
                    records = store.total_records(),
                    "Experience store loaded"
                );
                LoadedStore {
                    store,
                    warning: None,
                }
            }
            Err(reason) => {
                tracing::warn!(sink = %source, reason = %reason, "Persisted experiences unreadable, starting empty");
                LoadedStore {
                    store: Self::new(sink),
                    warning: Some(CorruptStateWarning { reason }),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All records for `place_id`, oldest first. Empty if there are none.
    pub fn records_for(&self, place_id: &PlaceId) -> &[ExperienceRecord] {
        self.experiences
            .get(place_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Records for `place_id` worth resurfacing on a revisit: disliked, or
    /// carrying notes. Original order.
    pub fn reminders(&self, place_id: &PlaceId) -> Vec<&ExperienceRecord> {
        self.records_for(place_id)
            .iter()
            .filter(|r| r.is_reminder())
            .collect()
    }

    /// Every liked food across `place_ids`, in the order the ids are given
    /// and then in each place's insertion order.
    pub fn liked_food_summaries<'a, I>(&self, place_ids: I) -> Vec<LikedFood>
    where
        I: IntoIterator<Item = &'a PlaceId>,
    {
        let mut liked = Vec::new();
        for place_id in place_ids {
            liked.extend(
                self.records_for(place_id)
                    .iter()
                    .filter(|r| r.rating == Rating::Liked)
                    .map(|r| LikedFood {
                        food: r.food.clone(),
                        place_id: place_id.clone(),
                    }),
            );
        }
        liked
    }

    /// Ids of places with at least one record, sorted.
    pub fn place_ids(&self) -> impl Iterator<Item = &PlaceId> {
        self.experiences.keys()
    }

    /// Number of records across all places.
    pub fn total_records(&self) -> usize {
        self.experiences.values().map(Vec::len).sum()
    }

    /// Read-only view of the whole mapping.
    pub const fn snapshot(&self) -> &ExperienceMap {
        &self.experiences
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Validate `draft` and append it to `place_id`'s log, then write through.
    ///
    /// The food is stored trimmed; the date defaults to today's local date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty food or an unrecognized
    /// rating. The store is not modified in that case.
    pub fn append(
        &mut self,
        place_id: &PlaceId,
        draft: ExperienceDraft,
    ) -> Result<AppendReceipt, ValidationError> {
        let record = validate(draft)?;

        self.experiences
            .entry(place_id.clone())
            .or_default()
            .push(record.clone());
        tracing::debug!(place = %place_id, food = %record.food, rating = %record.rating, "Experience appended");

        let persistence = self.persist();
        Ok(AppendReceipt {
            record,
            persistence,
        })
    }

    /// Append every record of `other` after the existing records of the
    /// same place. Duplicates are kept. Writes through once at the end.
    pub fn merge(&mut self, other: ExperienceMap) -> MergeReport {
        let mut added = 0_usize;
        let mut places = 0_usize;
        for (place_id, records) in other {
            if records.is_empty() {
                continue;
            }
            added = added.saturating_add(records.len());
            places = places.saturating_add(1);
            self.experiences.entry(place_id).or_default().extend(records);
        }

        if added == 0 {
            return MergeReport {
                added,
                places,
                persistence: PersistOutcome::Unchanged,
            };
        }

        tracing::info!(added, places, "Experiences merged");
        MergeReport {
            added,
            places,
            persistence: self.persist(),
        }
    }

    /// The whole store as export text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if encoding fails.
    pub fn export_text(&self) -> Result<String, CodecError> {
        codec::encode_pretty(&self.experiences)
    }

    /// Decode `text` and merge it into the store.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text does not decode. Nothing is
    /// merged in that case.
    pub fn import_text(&mut self, text: &str) -> Result<MergeReport, ParseError> {
        let incoming = codec::decode(text)?;
        Ok(self.merge(incoming))
    }

    fn persist(&mut self) -> PersistOutcome {
        let written = codec::encode(&self.experiences)
            .map_err(PersistenceError::from)
            .and_then(|text| self.sink.write(&text));
        match written {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                tracing::warn!(sink = %self.sink.describe(), error = %e, "Experience write-through failed, keeping in-memory state");
                PersistOutcome::NotPersisted(e)
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Turn a draft into a record, or explain why it is not acceptable.
fn validate(draft: ExperienceDraft) -> Result<ExperienceRecord, ValidationError> {
    let food = draft.food.trim();
    if food.is_empty() {
        return Err(ValidationError::EmptyFood);
    }
    let rating: Rating = draft
        .rating
        .parse()
        .map_err(|e: UnknownVariant| ValidationError::UnknownRating(e.0))?;

    Ok(ExperienceRecord {
        food: food.to_owned(),
        rating,
        notes: draft.notes,
        date: draft.date.unwrap_or_else(today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap_or_default()
    }

    fn draft(food: &str, rating: &str, notes: &str) -> ExperienceDraft {
        ExperienceDraft::new(food, rating, notes).on(day(1))
    }

    fn record(food: &str, rating: Rating, notes: &str) -> ExperienceRecord {
        ExperienceRecord {
            food: food.to_owned(),
            rating,
            notes: notes.to_owned(),
            date: day(1),
        }
    }

    fn place(id: &str) -> PlaceId {
        PlaceId::from(id)
    }

    #[test]
    fn append_then_lookup() {
        let mut store = ExperienceStore::new(MemorySink::new());
        let receipt = store.append(&place("place-1"), draft("Latte", "liked", ""));
        assert!(receipt.is_ok_and(|r| r.persistence.is_persisted()));

        assert_eq!(
            store.records_for(&place("place-1")),
            &[record("Latte", Rating::Liked, "")]
        );
        assert!(store.records_for(&place("place-2")).is_empty());
    }

    #[test]
    fn append_puts_record_last() {
        let mut store = ExperienceStore::new(MemorySink::new());
        for (food, rating) in [("Latte", "liked"), ("Scone", "neutral"), ("Mocha", "disliked")] {
            let receipt = store.append(&place("p"), draft(food, rating, ""));
            assert!(receipt.is_ok());
            assert_eq!(store.records_for(&place("p")).last().map(|r| r.food.as_str()), Some(food));
        }
        assert_eq!(store.total_records(), 3);
    }

    #[test]
    fn empty_food_rejected_without_mutation() {
        let sink = MemorySink::new();
        let mut store = ExperienceStore::new(sink.clone());

        let result = store.append(&place("place-1"), draft("", "liked", ""));
        assert!(matches!(result, Err(ValidationError::EmptyFood)));
        let result = store.append(&place("place-1"), draft("   ", "liked", ""));
        assert!(matches!(result, Err(ValidationError::EmptyFood)));

        assert!(store.records_for(&place("place-1")).is_empty());
        assert_eq!(store.place_ids().count(), 0);
        assert_eq!(sink.write_count(), 0);
    }

    #[test]
    fn unknown_rating_rejected_without_mutation() {
        let mut store = ExperienceStore::new(MemorySink::new());
        assert!(store.append(&place("p"), draft("Tea", "liked", "")).is_ok());

        let result = store.append(&place("p"), draft("Tea", "amazing", ""));
        assert_eq!(
            result.err(),
            Some(ValidationError::UnknownRating(String::from("amazing")))
        );
        assert_eq!(store.records_for(&place("p")).len(), 1);
    }

    #[test]
    fn rating_is_case_insensitive_and_food_trimmed() {
        let mut store = ExperienceStore::new(MemorySink::new());
        let receipt = store.append(&place("p"), draft("  Matcha  ", "Disliked", ""));
        assert!(receipt.is_ok_and(|r| r.record.food == "Matcha" && r.record.rating == Rating::Disliked));
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let mut store = ExperienceStore::new(MemorySink::new());
        let before = today();
        let receipt = store.append(&place("p"), ExperienceDraft::new("Tea", "liked", ""));
        let after = today();
        assert!(receipt.is_ok_and(|r| r.record.date >= before && r.record.date <= after));
    }

    #[test]
    fn reminders_are_ordered_subset() {
        let mut store = ExperienceStore::new(MemorySink::new());
        let entries = [
            ("Latte", "liked", ""),
            ("Scone", "disliked", ""),
            ("Mocha", "liked", "too sweet"),
            ("Tea", "neutral", ""),
            ("Bagel", "disliked", "stale"),
        ];
        for (food, rating, notes) in entries {
            assert!(store.append(&place("p"), draft(food, rating, notes)).is_ok());
        }

        let foods: Vec<&str> = store
            .reminders(&place("p"))
            .into_iter()
            .map(|r| r.food.as_str())
            .collect();
        assert_eq!(foods, vec!["Scone", "Mocha", "Bagel"]);
        assert!(store.reminders(&place("nowhere")).is_empty());
    }

    #[test]
    fn liked_summaries_follow_given_order() {
        let mut store = ExperienceStore::new(MemorySink::new());
        for (id, food, rating) in [
            ("a", "Latte", "liked"),
            ("b", "Ramen", "liked"),
            ("a", "Scone", "disliked"),
            ("a", "Croissant", "liked"),
            ("b", "Gyoza", "neutral"),
        ] {
            assert!(store.append(&place(id), draft(food, rating, "")).is_ok());
        }

        let ids = [place("b"), place("missing"), place("a")];
        let summary: Vec<(String, String)> = store
            .liked_food_summaries(&ids)
            .into_iter()
            .map(|l| (l.food, l.place_id.into_inner()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (String::from("Ramen"), String::from("b")),
                (String::from("Latte"), String::from("a")),
                (String::from("Croissant"), String::from("a")),
            ]
        );
    }

    #[test]
    fn merge_concatenates_and_keeps_duplicates() {
        let sink = MemorySink::new();
        let mut store = ExperienceStore::new(sink.clone());
        assert!(store.append(&place("p"), draft("Latte", "liked", "")).is_ok());
        let writes_before = sink.write_count();

        let mut incoming = ExperienceMap::new();
        incoming.insert(
            place("p"),
            vec![record("Latte", Rating::Liked, ""), record("Tea", Rating::Neutral, "")],
        );
        incoming.insert(place("q"), vec![record("Pie", Rating::Liked, "")]);
        incoming.insert(place("r"), Vec::new());

        let report = store.merge(incoming);
        assert_eq!((report.added, report.places), (3, 2));
        assert!(matches!(report.persistence, PersistOutcome::Persisted));
        assert_eq!(sink.write_count(), writes_before + 1);

        let foods: Vec<&str> = store.records_for(&place("p")).iter().map(|r| r.food.as_str()).collect();
        assert_eq!(foods, vec!["Latte", "Latte", "Tea"]);
        assert!(store.records_for(&place("r")).is_empty());
        assert_eq!(store.place_ids().count(), 2);
    }

    #[test]
    fn empty_merge_does_not_write() {
        let sink = MemorySink::new();
        let mut store = ExperienceStore::new(sink.clone());
        let report = store.merge(ExperienceMap::new());
        assert_eq!(report.added, 0);
        assert!(matches!(report.persistence, PersistOutcome::Unchanged));
        assert_eq!(sink.write_count(), 0);
    }

    #[test]
    fn sequential_merges_equal_concatenated_merge() {
        let base = || {
            let mut map = ExperienceMap::new();
            map.insert(place("p"), vec![record("Base", Rating::Neutral, "")]);
            map
        };
        let mut a = ExperienceMap::new();
        a.insert(place("p"), vec![record("A1", Rating::Liked, ""), record("A2", Rating::Disliked, "")]);
        a.insert(place("q"), vec![record("A3", Rating::Liked, "")]);
        let mut b = ExperienceMap::new();
        b.insert(place("p"), vec![record("B1", Rating::Liked, "")]);
        b.insert(place("r"), vec![record("B2", Rating::Neutral, "")]);

        let mut combined = a.clone();
        for (id, records) in b.clone() {
            combined.entry(id).or_default().extend(records);
        }

        let mut stepwise = ExperienceStore::from_map(base(), MemorySink::new());
        let _ = stepwise.merge(a).persistence;
        let _ = stepwise.merge(b).persistence;

        let mut at_once = ExperienceStore::from_map(base(), MemorySink::new());
        let _ = at_once.merge(combined).persistence;

        assert_eq!(stepwise.snapshot(), at_once.snapshot());
        let foods: Vec<&str> = stepwise.records_for(&place("p")).iter().map(|r| r.food.as_str()).collect();
        assert_eq!(foods, vec!["Base", "A1", "A2", "B1"]);
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let sink = MemorySink::new();
        sink.set_fail_writes(true);
        let mut store = ExperienceStore::new(sink.clone());

        let receipt = store.append(&place("p"), draft("Latte", "liked", ""));
        assert!(receipt.is_ok_and(|r| !r.persistence.is_persisted() && r.persistence.error().is_some()));
        assert_eq!(store.records_for(&place("p")).len(), 1);
        assert_eq!(sink.contents(), None);

        // Once the sink recovers the next write carries the full store.
        sink.set_fail_writes(false);
        assert!(store.append(&place("p"), draft("Tea", "liked", "")).is_ok());
        let reloaded = ExperienceStore::load(sink);
        assert_eq!(reloaded.store.records_for(&place("p")).len(), 2);
    }

    #[test]
    fn load_round_trips_through_sink() {
        let sink = MemorySink::new();
        let mut store = ExperienceStore::new(sink.clone());
        assert!(store.append(&place("place-1"), draft("Latte", "liked", "")).is_ok());
        assert!(store.append(&place("place-1"), draft("Scone", "disliked", "dry")).is_ok());
        assert!(store.append(&place("place-2"), draft("Ramen", "neutral", "")).is_ok());

        let loaded = ExperienceStore::load(sink);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.store.snapshot(), store.snapshot());
    }

    #[test]
    fn load_absent_or_blank_is_empty_without_warning() {
        let loaded = ExperienceStore::load(MemorySink::new());
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.store.total_records(), 0);

        let loaded = ExperienceStore::load(MemorySink::with_contents("  \n"));
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn corrupt_sink_starts_empty_with_warning() {
        let sink = MemorySink::with_contents("{not json");
        let loaded = ExperienceStore::load(sink.clone());
        assert!(loaded.warning.is_some_and(|w| w.reason.starts_with("invalid JSON")));
        assert_eq!(loaded.store.total_records(), 0);

        // The corrupt blob is only replaced on the next successful mutation.
        assert_eq!(sink.contents().as_deref(), Some("{not json"));
        let mut store = loaded.store;
        assert!(store.append(&place("p"), draft("Tea", "liked", "")).is_ok());
        assert!(sink.contents().is_some_and(|t| t.contains("\"Tea\"")));
    }

    #[test]
    fn export_then_import_into_fresh_store() {
        let mut source = ExperienceStore::new(MemorySink::new());
        assert!(source.append(&place("Cafe Kitsune"), draft("Matcha Latte", "liked", "")).is_ok());
        assert!(source.append(&place("Cafe Kitsune"), draft("Croissant", "disliked", "")).is_ok());

        let text = source.export_text();
        assert!(text.is_ok());
        let text = text.unwrap_or_default();

        let mut target = ExperienceStore::new(MemorySink::new());
        let report = target.import_text(&text);
        assert!(report.is_ok_and(|r| r.added == 2));
        assert_eq!(target.snapshot(), source.snapshot());
    }

    #[test]
    fn failed_import_changes_nothing() {
        let sink = MemorySink::new();
        let mut store = ExperienceStore::new(sink.clone());
        assert!(store.append(&place("p"), draft("Tea", "liked", "")).is_ok());
        let before = store.snapshot().clone();

        let result = store.import_text(r#"{"p": [{"food": "Pie", "rating": "liked", "date": "2024-01-01"}], "q": "oops"}"#);
        assert!(result.is_err());
        assert_eq!(store.snapshot(), &before);
        assert_eq!(sink.write_count(), 1);
    }
}
