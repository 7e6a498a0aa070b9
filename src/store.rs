// 🗄️ Record Store - Items and members keyed by id
//
// Plain owned maps, no logic beyond lookups. BTreeMap keeps ascending-id
// iteration for the display reports.

use std::collections::BTreeMap;

use crate::entities::{Item, ItemId, Member, MemberId};
use crate::error::StoreError;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    items: BTreeMap<ItemId, Item>,
    members: BTreeMap<MemberId, Member>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records, rejecting duplicate ids
    pub fn from_records(items: Vec<Item>, members: Vec<Member>) -> Result<Self, StoreError> {
        let mut store = RecordStore::new();
        for item in items {
            store.insert_item(item)?;
        }
        for member in members {
            store.insert_member(member)?;
        }
        Ok(store)
    }

    pub fn insert_item(&mut self, item: Item) -> Result<(), StoreError> {
        if self.items.contains_key(&item.id) {
            return Err(StoreError::DuplicateItem(item.id));
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    pub fn insert_member(&mut self, member: Member) -> Result<(), StoreError> {
        if self.members.contains_key(&member.id) {
            return Err(StoreError::DuplicateMember(member.id));
        }
        self.members.insert(member.id, member);
        Ok(())
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    /// Items in ascending id order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Members in ascending id order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Member> {
        self.members.values_mut()
    }

    /// The member currently holding an item, if any
    pub fn holder_of(&self, item: ItemId) -> Option<&Member> {
        self.members.values().find(|m| m.holds(item))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
