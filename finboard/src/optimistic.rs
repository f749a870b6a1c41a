use std::collections::HashMap;
use thiserror::Error;

/// Anything with a stable string id can live in an [`OptimisticList`]
pub trait Identified {
    fn id(&self) -> &str;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("a change to {0} is already in flight")]
    InFlight(String),

    #[error("no entry with id {0}")]
    NotFound(String),
}

#[derive(Debug, Clone)]
enum Pending<T> {
    Create,
    Update {
        previous: T,
    },
    Delete {
        previous: T,
        index: usize,
        /// Id of the entry that sat right before the removed one
        after: Option<String>,
    },
}

/// List-shaped client cache with optimistic mutations.
///
/// Each mutation runs in two phases. `begin_*` applies the local change
/// immediately so readers see it while the remote call is in flight; the caller
/// later settles it with `confirm_*` or [`OptimisticList::rollback`]. Updates and
/// deletes keep a snapshot of the entry they touch, so a rollback restores
/// exactly what was visible before the mutation without undoing other
/// mutations settled in the meantime. At most one mutation per id may be
/// pending at a time.
#[derive(Debug, Clone)]
pub struct OptimisticList<T> {
    items: Vec<T>,
    pending: HashMap<String, Pending<T>>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: HashMap::new(),
        }
    }
}

impl<T: Identified + Clone> OptimisticList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            pending: HashMap::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Swap in a freshly fetched list. Pending snapshots describe the old list,
    /// so they are dropped; late confirmations still land via the fallbacks in
    /// `confirm_create` and `confirm_update`.
    pub fn replace_all(&mut self, items: Vec<T>) {
        if !self.pending.is_empty() {
            tracing::debug!(
                "Replacing list with {} mutation(s) still in flight",
                self.pending.len()
            );
        }
        self.pending.clear();
        self.items = items;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn ensure_idle(&self, id: &str) -> Result<(), MutationError> {
        if self.pending.contains_key(id) {
            Err(MutationError::InFlight(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Append `temp` (carrying a locally generated id) right away
    pub fn begin_create(&mut self, temp: T) -> Result<(), MutationError> {
        let id = temp.id().to_string();
        self.ensure_idle(&id)?;
        self.items.push(temp);
        self.pending.insert(id, Pending::Create);
        Ok(())
    }

    /// Apply `transform` to the entry with `id`, leaving the others untouched
    pub fn begin_update<F>(&mut self, id: &str, transform: F) -> Result<(), MutationError>
    where
        F: FnOnce(&mut T),
    {
        self.ensure_idle(id)?;
        let index = self
            .position(id)
            .ok_or_else(|| MutationError::NotFound(id.to_string()))?;
        let previous = self.items[index].clone();
        transform(&mut self.items[index]);
        self.pending
            .insert(id.to_string(), Pending::Update { previous });
        Ok(())
    }

    /// Remove the entry with `id` right away
    pub fn begin_delete(&mut self, id: &str) -> Result<(), MutationError> {
        self.ensure_idle(id)?;
        let index = self
            .position(id)
            .ok_or_else(|| MutationError::NotFound(id.to_string()))?;
        let after = index
            .checked_sub(1)
            .map(|prev| self.items[prev].id().to_string());
        let previous = self.items.remove(index);
        self.pending.insert(
            id.to_string(),
            Pending::Delete {
                previous,
                index,
                after,
            },
        );
        Ok(())
    }

    /// Replace the temporary entry in place with the server's copy (new id)
    pub fn confirm_create(&mut self, temp_id: &str, entity: T) {
        self.pending.remove(temp_id);
        match self.position(temp_id) {
            Some(index) => self.items[index] = entity,
            None if self.position(entity.id()).is_none() => self.items.push(entity),
            None => {}
        }
    }

    pub fn confirm_update(&mut self, id: &str, entity: T) {
        self.pending.remove(id);
        if let Some(index) = self.position(id) {
            self.items[index] = entity;
        }
    }

    pub fn confirm_delete(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// Undo the pending mutation for `id`. Returns false when nothing was pending.
    pub fn rollback(&mut self, id: &str) -> bool {
        match self.pending.remove(id) {
            Some(Pending::Create) => {
                self.items.retain(|item| item.id() != id);
                true
            }
            Some(Pending::Update { previous }) => {
                if let Some(index) = self.position(id) {
                    self.items[index] = previous;
                }
                true
            }
            Some(Pending::Delete {
                previous,
                index,
                after,
            }) => {
                let at = match after {
                    None => 0,
                    Some(after) => self
                        .position(&after)
                        .map_or(index.min(self.items.len()), |prev| prev + 1),
                };
                self.items.insert(at, previous);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: i32,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: i32) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    fn list() -> OptimisticList<Item> {
        OptimisticList::new(vec![item("a", 1), item("b", 2), item("c", 3)])
    }

    #[test]
    fn create_is_visible_then_replaced_by_server_entity() {
        let mut cache = OptimisticList::default();
        cache.begin_create(item("temp-1", 10)).unwrap();
        assert_eq!(cache.items(), &[item("temp-1", 10)]);
        assert!(cache.is_pending("temp-1"));

        cache.confirm_create("temp-1", item("srv-9", 10));
        assert_eq!(cache.items(), &[item("srv-9", 10)]);
        assert!(cache.get("temp-1").is_none());
        assert!(cache.get("srv-9").is_some());
        assert!(!cache.has_pending());
    }

    #[test]
    fn create_keeps_position_of_temp_entry() {
        let mut cache = list();
        cache.begin_create(item("temp-1", 4)).unwrap();
        cache.begin_update("a", |i| i.value = 100).unwrap();
        cache.confirm_create("temp-1", item("d", 4));
        assert_eq!(cache.items()[3], item("d", 4));
    }

    #[test]
    fn failed_create_removes_temp_entry() {
        let mut cache = list();
        let before = cache.items().to_vec();
        cache.begin_create(item("temp-1", 4)).unwrap();
        assert!(cache.rollback("temp-1"));
        assert_eq!(cache.items(), before.as_slice());
    }

    #[test]
    fn update_touches_only_target() {
        let mut cache = list();
        cache.begin_update("b", |i| i.value = 20).unwrap();
        assert_eq!(
            cache.items(),
            &[item("a", 1), item("b", 20), item("c", 3)]
        );
        cache.confirm_update("b", item("b", 21));
        assert_eq!(cache.get("b"), Some(&item("b", 21)));
    }

    #[test]
    fn failed_update_and_delete_restore_exact_snapshot() {
        let mut cache = list();
        let before = cache.items().to_vec();

        cache.begin_update("c", |i| i.value = -1).unwrap();
        assert!(cache.rollback("c"));
        assert_eq!(cache.items(), before.as_slice());

        cache.begin_delete("a").unwrap();
        assert_eq!(cache.items().len(), 2);
        assert!(cache.rollback("a"));
        assert_eq!(cache.items(), before.as_slice());
    }

    #[test]
    fn second_mutation_on_same_id_is_rejected() {
        let mut cache = list();
        cache.begin_update("a", |i| i.value = 5).unwrap();
        assert_eq!(
            cache.begin_delete("a"),
            Err(MutationError::InFlight("a".to_string()))
        );
        // The first mutation is unaffected
        assert_eq!(cache.get("a"), Some(&item("a", 5)));
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut cache = list();
        assert_eq!(
            cache.begin_delete("zzz"),
            Err(MutationError::NotFound("zzz".to_string()))
        );
        assert!(!cache.rollback("zzz"));
    }

    #[test]
    fn confirmation_after_refetch_appends_once() {
        let mut cache = OptimisticList::default();
        cache.begin_create(item("temp-1", 7)).unwrap();
        cache.replace_all(vec![item("srv-1", 7)]);
        cache.confirm_create("temp-1", item("srv-1", 7));
        assert_eq!(cache.items(), &[item("srv-1", 7)]);

        cache.confirm_create("temp-2", item("srv-2", 8));
        assert_eq!(cache.items().len(), 2);
    }

    #[test]
    fn rollback_keeps_deletes_confirmed_in_between() {
        let mut cache = list();
        cache.begin_update("a", |i| i.value = 10).unwrap();
        cache.begin_delete("b").unwrap();
        cache.confirm_delete("b");

        assert!(cache.rollback("a"));
        assert_eq!(cache.items(), &[item("a", 1), item("c", 3)]);
        assert!(!cache.has_pending());
    }

    #[test]
    fn rollback_keeps_creates_confirmed_in_between() {
        let mut cache = list();
        cache.begin_create(item("temp-1", 4)).unwrap();
        cache.begin_update("a", |i| i.value = 10).unwrap();
        cache.confirm_create("temp-1", item("srv-9", 4));

        assert!(cache.rollback("a"));
        assert_eq!(
            cache.items(),
            &[item("a", 1), item("b", 2), item("c", 3), item("srv-9", 4)]
        );
        assert!(cache.get("temp-1").is_none());
        assert!(!cache.has_pending());
    }

    #[test]
    fn failed_delete_returns_to_its_slot_next_to_neighbour() {
        let mut cache = list();
        cache.begin_delete("c").unwrap();
        cache.begin_delete("a").unwrap();
        cache.confirm_delete("a");

        assert!(cache.rollback("c"));
        assert_eq!(cache.items(), &[item("b", 2), item("c", 3)]);

        let mut cache = list();
        cache.begin_delete("a").unwrap();
        assert!(cache.rollback("a"));
        assert_eq!(cache.items()[0], item("a", 1));
    }
}
