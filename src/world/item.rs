use crate::error;
use crate::error::Result;

/// Stable handle into the item arena, never zero. Item 1 is the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u16);

impl ItemId {
    pub const PLAYER: ItemId = ItemId(1);

    pub fn new(id: u16) -> Option<ItemId> {
        if id == 0 {
            None
        } else {
            Some(ItemId(id))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub parent: Option<ItemId>,
    pub next: Option<ItemId>,
    pub child: Option<ItemId>,
    pub state: i16,
    pub class_flags: u16,
    pub noun: i16,
    pub adjective: i16,
}

/// ## Item graph
///
/// A forest of items linked by handles. An item has at most one parent;
/// re-parenting always unlinks from the old parent first and links the
/// item as the new parent's first child.

#[derive(Debug, Default)]
pub struct ItemArena {
    items: Vec<Item>,
}

impl ItemArena {
    pub fn new() -> ItemArena {
        ItemArena::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn create(&mut self, noun: i16, adjective: i16) -> ItemId {
        self.items.push(Item {
            noun,
            adjective,
            ..Item::default()
        });
        ItemId(self.items.len() as u16)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> {
        (1..=self.items.len() as u16).filter_map(ItemId::new)
    }

    pub fn id(&self, raw: u16) -> Result<Option<ItemId>> {
        match ItemId::new(raw) {
            None => Ok(None),
            Some(id) if id.index() < self.items.len() => Ok(Some(id)),
            Some(_) => Err(error!(BadItem; "item {} of {}", raw, self.items.len())),
        }
    }

    pub fn get(&self, id: ItemId) -> Result<&Item> {
        match self.items.get(id.index()) {
            Some(item) => Ok(item),
            None => Err(error!(BadItem; "item {}", id)),
        }
    }

    pub fn get_mut(&mut self, id: ItemId) -> Result<&mut Item> {
        match self.items.get_mut(id.index()) {
            Some(item) => Ok(item),
            None => Err(error!(BadItem; "item {}", id)),
        }
    }

    pub fn parent(&self, id: ItemId) -> Result<Option<ItemId>> {
        Ok(self.get(id)?.parent)
    }

    pub fn unlink(&mut self, id: ItemId) -> Result<()> {
        let (parent, next) = {
            let item = self.get(id)?;
            (item.parent, item.next)
        };
        if let Some(parent) = parent {
            if self.get(parent)?.child == Some(id) {
                self.get_mut(parent)?.child = next;
            } else {
                let mut cursor = self.get(parent)?.child;
                while let Some(sibling) = cursor {
                    let after = self.get(sibling)?.next;
                    if after == Some(id) {
                        self.get_mut(sibling)?.next = next;
                        break;
                    }
                    cursor = after;
                }
            }
        }
        let item = self.get_mut(id)?;
        item.parent = None;
        item.next = None;
        Ok(())
    }

    /// Fails with `BadItem` if `id` would become its own ancestor.
    pub fn set_parent(&mut self, id: ItemId, parent: Option<ItemId>) -> Result<()> {
        let mut ancestor = parent;
        while let Some(a) = ancestor {
            if a == id {
                return Err(error!(BadItem; "item {} cannot contain itself", id));
            }
            ancestor = self.get(a)?.parent;
        }
        self.unlink(id)?;
        if let Some(parent) = parent {
            let first = self.get(parent)?.child;
            let item = self.get_mut(id)?;
            item.parent = Some(parent);
            item.next = first;
            self.get_mut(parent)?.child = Some(id);
        }
        Ok(())
    }

    pub fn children(&self, id: ItemId) -> Result<Children<'_>> {
        Ok(Children {
            arena: self,
            cursor: self.get(id)?.child,
        })
    }

    pub fn has_class(&self, id: ItemId, mask: u16) -> Result<bool> {
        Ok(self.get(id)?.class_flags & mask != 0)
    }

    /// Children of `parent` whose class flags intersect `mask`, in sibling order.
    pub fn find_in_by_class(&self, parent: ItemId, mask: u16) -> Result<Vec<ItemId>> {
        let mut found = vec![];
        for child in self.children(parent)? {
            if mask == 0 || self.has_class(child, mask)? {
                found.push(child);
            }
        }
        Ok(found)
    }
}

pub struct Children<'a> {
    arena: &'a ItemArena,
    cursor: Option<ItemId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = ItemId;
    fn next(&mut self) -> Option<ItemId> {
        let id = self.cursor?;
        self.cursor = self.arena.items.get(id.index()).and_then(|item| item.next);
        Some(id)
    }
}
