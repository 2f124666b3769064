/*!
## World Module

The mutable game world scripts operate on: the item graph, the variable
banks, and the persisted snapshot of both.

*/

mod item;
mod state;
mod var;

pub use item::{Children, Item, ItemArena, ItemId};
pub use state::{SavedItem, SavedState};
pub use var::Var;

/// Items and variables. This is the "variables" capability handed to
/// opcode handlers and VGA scripts.
#[derive(Debug, Default)]
pub struct World {
    pub items: ItemArena,
    pub vars: Var,
}

impl World {
    pub fn new(var_count: usize, bit_words: usize) -> World {
        World {
            items: ItemArena::new(),
            vars: Var::new(var_count, bit_words),
        }
    }
}
