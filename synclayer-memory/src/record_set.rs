//! The synchronous record collection behind [`MemoryStore`](crate::MemoryStore).
//!
//! A [`RecordSet`] owns an ordered list of entries, each a record plus its
//! optional [`SyncStatus`]. It implements the store semantics directly:
//! identity-based upserts, wholesale resets, the reconciliation merge used when
//! synchronization is enabled, soft removal and filtering. All status changes go
//! through [`SyncStatus::next`].

use synclayer_core::{
    config::StoreSettings,
    filter::FilterSpec,
    record::{Record, RecordId, Target},
    status::{SyncEvent, SyncStatus},
};

use crate::evaluator::{RecordEvaluator, same_identity};

/// A record together with its sync status.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub record: Record,
    /// Always `None` when synchronization is disabled.
    pub status: Option<SyncStatus>,
}

impl Entry {
    pub fn is_visible(&self) -> bool {
        SyncStatus::is_visible(self.status)
    }
}

/// An ordered, named collection of records.
///
/// Ordering is insertion order, except that a replaced record keeps its
/// position. Among entries not marked removed, identity values are unique.
#[derive(Debug, Clone)]
pub struct RecordSet {
    name: String,
    record_id: String,
    data_sync: bool,
    entries: Vec<Entry>,
}

impl RecordSet {
    pub fn new(name: impl Into<String>, settings: StoreSettings) -> Self {
        Self {
            name: name.into(),
            record_id: settings.record_id,
            data_sync: settings.data_sync,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn data_sync(&self) -> bool {
        self.data_sync
    }

    /// Returns every visible record, or the visible record with identity `id`.
    pub fn read(&self, id: Option<&RecordId>) -> Vec<Record> {
        self.visible()
            .filter(|record| match id {
                Some(id) => self.has_identity(record, id),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Saves records and returns the visible set.
    ///
    /// Without `reset`, each record replaces the entry with the same identity in
    /// place or is appended. With `reset` and synchronization disabled, the
    /// current entries are discarded first. With `reset` and synchronization
    /// enabled, the current entries are reconciled against the incoming ones.
    pub fn save(&mut self, records: Vec<Record>, reset: bool) -> Vec<Record> {
        let count = records.len();

        match (reset, self.data_sync) {
            (true, true) => self.reconcile(records),
            (true, false) => {
                self.entries.clear();
                records
                    .into_iter()
                    .for_each(|record| self.upsert(record));
            },
            (false, _) => records
                .into_iter()
                .for_each(|record| self.upsert(record)),
        }

        tracing::debug!(store = self.name.as_str(), count, reset, "saved records");

        self.read(None)
    }

    /// Removes the targeted records and returns the visible set.
    ///
    /// With synchronization enabled the entries are marked removed instead of
    /// being deleted.
    pub fn remove(&mut self, target: &Target) -> Vec<Record> {
        match target.resolve(&self.record_id) {
            None => {
                if self.data_sync {
                    for index in 0..self.entries.len() {
                        self.transition(index, SyncEvent::Removed);
                    }
                } else {
                    self.entries.clear();
                }

                tracing::debug!(store = self.name.as_str(), "removed all records");
            },
            Some(ids) => {
                for id in &ids {
                    self.remove_id(id);
                }

                tracing::debug!(store = self.name.as_str(), count = ids.len(), "removed records");
            },
        }

        self.read(None)
    }

    /// Returns copies of the visible records matching `spec`.
    ///
    /// A missing or empty spec matches every visible record.
    pub fn filter(&self, spec: Option<&FilterSpec>, match_any: bool) -> Vec<Record> {
        match spec {
            Some(spec) if !spec.is_empty() => RecordEvaluator::filter_records(self.visible(), spec, match_any),
            _ => self.read(None),
        }
    }

    /// Physically deletes every entry marked removed and returns the purged records.
    pub fn purge(&mut self) -> Vec<Record> {
        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| !entry.is_visible());

        self.entries = kept;

        tracing::debug!(store = self.name.as_str(), count = removed.len(), "purged removed records");

        removed
            .into_iter()
            .map(|entry| entry.record)
            .collect()
    }

    /// Returns the sync status of the entry with identity `id`, including removed entries.
    pub fn sync_status(&self, id: &RecordId) -> Option<SyncStatus> {
        self.position(id)
            .and_then(|index| self.entries[index].status)
    }

    /// Returns every entry, including removed ones.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of visible records.
    pub fn len(&self) -> usize {
        self.visible().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn visible(&self) -> impl Iterator<Item = &Record> {
        self.entries
            .iter()
            .filter(|entry| entry.is_visible())
            .map(|entry| &entry.record)
    }

    fn has_identity(&self, record: &Record, id: &RecordId) -> bool {
        record
            .id(&self.record_id)
            .is_some_and(|other| same_identity(id, &other))
    }

    /// Finds the entry with identity `id`, visible or not.
    fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| self.has_identity(&entry.record, id))
    }

    fn transition(&mut self, index: usize, event: SyncEvent) {
        if !self.data_sync {
            return;
        }

        let entry = &mut self.entries[index];
        let next = SyncStatus::next(entry.status, event);

        tracing::trace!(
            store = self.name.as_str(),
            from = ?entry.status,
            to = %next,
            "sync status transition"
        );

        entry.status = Some(next);
    }

    fn upsert(&mut self, mut record: Record) {
        let id = record.id(&self.record_id);

        if let Some(index) = id.as_ref().and_then(|id| self.position(id)) {
            self.entries[index].record = record;
            self.transition(index, SyncEvent::Replaced);
            return;
        }

        if self.data_sync && id.is_none() {
            record.insert(self.record_id.clone(), RecordId::generate().into_bson());
        }

        self.entries.push(Entry { record, status: None });
        self.transition(self.entries.len() - 1, SyncEvent::Inserted);
    }

    fn remove_id(&mut self, id: &RecordId) {
        if self.data_sync {
            for index in 0..self.entries.len() {
                if self.has_identity(&self.entries[index].record, id) {
                    self.transition(index, SyncEvent::Removed);
                }
            }
        } else {
            let record_id = &self.record_id;

            self.entries.retain(|entry| {
                !entry
                    .record
                    .id(record_id)
                    .is_some_and(|other| same_identity(id, &other))
            });
        }
    }

    /// Merges `incoming` into the current entries.
    ///
    /// Each current entry consumes the first incoming record with the same
    /// identity and becomes `MODIFIED`; entries with no counterpart become
    /// `REMOVED`. Unconsumed incoming records are then saved as usual.
    fn reconcile(&mut self, mut incoming: Vec<Record>) {
        for index in 0..self.entries.len() {
            let matched = self.entries[index]
                .record
                .id(&self.record_id)
                .and_then(|id| {
                    incoming
                        .iter()
                        .position(|record| self.has_identity(record, &id))
                });

            match matched {
                Some(position) => {
                    self.entries[index].record = incoming.remove(position);
                    self.transition(index, SyncEvent::Replaced);
                },
                None => self.transition(index, SyncEvent::Removed),
            }
        }

        incoming
            .into_iter()
            .for_each(|record| self.upsert(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, doc};
    use synclayer_core::record::TargetItem;

    fn set(data_sync: bool) -> RecordSet {
        RecordSet::new("tasks", StoreSettings { data_sync, ..StoreSettings::default() })
    }

    fn records(documents: Vec<bson::Document>) -> Vec<Record> {
        documents
            .into_iter()
            .map(Record::from)
            .collect()
    }

    #[test]
    fn save_replaces_in_place_and_appends() {
        let mut set = set(false);
        set.save(records(vec![doc! { "id": 1, "v": "a" }, doc! { "id": 2, "v": "b" }]), false);

        let visible = set.save(records(vec![doc! { "id": 1, "v": "c" }, doc! { "id": 3 }]), false);

        assert_eq!(
            visible,
            records(vec![doc! { "id": 1, "v": "c" }, doc! { "id": 2, "v": "b" }, doc! { "id": 3 }])
        );
        assert_eq!(set.sync_status(&1.into()), None);
    }

    #[test]
    fn records_without_identity_are_always_appended_without_sync() {
        let mut set = set(false);

        set.save(records(vec![doc! { "v": 1 }]), false);
        let visible = set.save(records(vec![doc! { "v": 1 }]), false);

        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|record| record.get("id").is_none()));
    }

    #[test]
    fn sync_generates_missing_identities() {
        let mut set = set(true);

        let visible = set.save(records(vec![doc! { "title": "x" }]), false);
        let id = visible[0].id("id").expect("generated identity");

        assert!(matches!(id.as_bson(), Bson::String(_)));
        assert_eq!(set.sync_status(&id), Some(SyncStatus::New));
    }

    #[test]
    fn nan_identities_are_replaced_when_synchronized() {
        let mut set = set(true);

        set.save(records(vec![doc! { "id": f64::NAN, "v": 1 }]), false);
        let visible = set.save(records(vec![doc! { "id": f64::NAN, "v": 2 }]), false);

        let ids = visible
            .iter()
            .map(|record| record.id("id").expect("generated identity"))
            .collect::<Vec<_>>();

        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| matches!(id.as_bson(), Bson::String(_))));
        assert_ne!(ids[0], ids[1]);

        let visible = set.remove(&ids[0].clone().into());
        assert_eq!(visible.len(), 1);
        assert_eq!(set.sync_status(&ids[0]), Some(SyncStatus::Removed));
    }

    #[test]
    fn nan_identities_are_kept_as_plain_fields_without_sync() {
        let mut set = set(false);

        set.save(records(vec![doc! { "id": f64::NAN }, doc! { "id": f64::NAN }]), false);
        let visible = set.remove(&Target::from(RecordId::new(f64::NAN)));

        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn large_integer_identities_stay_distinct() {
        let big = 9_007_199_254_740_992_i64;
        let mut set = set(true);

        set.save(records(vec![doc! { "id": big, "v": "a" }]), false);
        let visible = set.save(records(vec![doc! { "id": big + 1, "v": "b" }]), false);

        assert_eq!(visible.len(), 2);
        assert_eq!(set.read(Some(&big.into())), records(vec![doc! { "id": big, "v": "a" }]));

        let visible = set.remove(&Target::from(big + 1));
        assert_eq!(visible, records(vec![doc! { "id": big, "v": "a" }]));
    }

    #[test]
    fn custom_identity_field() {
        let mut set = RecordSet::new(
            "tasks",
            StoreSettings { record_id: "taskId".into(), data_sync: true },
        );

        set.save(records(vec![doc! { "taskId": "a" }]), false);
        set.save(records(vec![doc! { "taskId": "a", "done": true }]), false);

        assert_eq!(set.read(None), records(vec![doc! { "taskId": "a", "done": true }]));
        assert_eq!(set.sync_status(&"a".into()), Some(SyncStatus::Modified));
        assert!(set.read(None)[0].get("id").is_none());
    }

    #[test]
    fn duplicates_in_one_batch_collapse() {
        let mut set = set(false);

        let visible = set.save(records(vec![doc! { "id": 1, "v": 1 }, doc! { "id": 1, "v": 2 }]), true);

        assert_eq!(visible, records(vec![doc! { "id": 1, "v": 2 }]));
    }

    #[test]
    fn reconcile_marks_modified_removed_and_new() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), false);

        let visible = set.save(records(vec![doc! { "id": 2, "v": "x" }, doc! { "id": 3 }]), true);

        assert_eq!(visible, records(vec![doc! { "id": 2, "v": "x" }, doc! { "id": 3 }]));
        assert_eq!(set.sync_status(&1.into()), Some(SyncStatus::Removed));
        assert_eq!(set.sync_status(&2.into()), Some(SyncStatus::Modified));
        assert_eq!(set.sync_status(&3.into()), Some(SyncStatus::New));
        assert_eq!(set.entries().len(), 3);
    }

    #[test]
    fn reconcile_resurrects_removed_entries() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1 }]), false);
        set.remove(&1.into());

        let visible = set.save(records(vec![doc! { "id": 1, "v": 2 }]), true);

        assert_eq!(visible, records(vec![doc! { "id": 1, "v": 2 }]));
        assert_eq!(set.sync_status(&1.into()), Some(SyncStatus::Modified));
    }

    #[test]
    fn reconcile_with_duplicate_incoming_identities_keeps_identities_unique() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1 }]), false);

        let visible = set.save(records(vec![doc! { "id": 1, "v": 1 }, doc! { "id": 1, "v": 2 }]), true);

        assert_eq!(visible.len(), 1);
        assert_eq!(set.entries().len(), 1);
    }

    #[test]
    fn remove_without_sync_splices() {
        let mut set = set(false);
        set.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }, doc! { "id": 3 }]), false);

        let visible = set.remove(&Target::from(vec![
            TargetItem::from(1),
            TargetItem::from(doc! { "id": 3 }),
            TargetItem::from(doc! { "title": "no identity" }),
        ]));

        assert_eq!(visible, records(vec![doc! { "id": 2 }]));
        assert_eq!(set.entries().len(), 1);
    }

    #[test]
    fn remove_with_sync_keeps_entries() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), false);

        let visible = set.remove(&Target::from(doc! { "id": 2 }));

        assert_eq!(visible, records(vec![doc! { "id": 1 }]));
        assert_eq!(set.entries().len(), 2);
        assert_eq!(set.read(Some(&2.into())), vec![]);
        assert_eq!(set.sync_status(&2.into()), Some(SyncStatus::Removed));
    }

    #[test]
    fn remove_all() {
        for data_sync in [false, true] {
            let mut set = set(data_sync);
            set.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), false);

            assert!(set.remove(&Target::None).is_empty());
            assert!(set.remove(&Target::None).is_empty());
            assert!(set.is_empty());
        }
    }

    #[test]
    fn purge_drops_removed_entries() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), false);
        set.remove(&1.into());

        let purged = set.purge();

        assert_eq!(purged, records(vec![doc! { "id": 1 }]));
        assert_eq!(set.entries().len(), 1);
        assert_eq!(set.sync_status(&1.into()), None);
    }

    #[test]
    fn filter_ignores_removed_records() {
        let mut set = set(true);
        set.save(records(vec![doc! { "id": 1, "a": 1 }, doc! { "id": 2, "a": 1 }]), false);
        set.remove(&2.into());

        let spec = FilterSpec::new().eq("a", 1);

        assert_eq!(set.filter(Some(&spec), false), records(vec![doc! { "id": 1, "a": 1 }]));
        assert_eq!(set.filter(Some(&FilterSpec::new()), true), set.read(None));
        assert_eq!(set.filter(None, false), set.read(None));
    }
}
