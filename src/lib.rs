//! # Adventure
//!
//! The runtime core of a scripted adventure game engine.
//!
//! Game logic lives in *subroutines*: rule sets of condition/action lines
//! run by a bytecode interpreter against a graph of items and a bank of
//! variables. Animation lives in a second, lower-level bytecode, the VGA
//! script, continued frame by frame from a countdown timer table. A
//! dirty-rectangle compositor keeps the presented frame in step with both.
//!
//! Everything runs cooperatively on one thread. Scripts block only in
//! [`Engine::delay`](engine::Engine::delay), which is where the frame
//! pump ticks: it drains the VGA timer table twice per tick, a third time
//! every other tick, and flushes the dirty rectangle.
//!
//! ```
//! use adventure::config::EngineConfig;
//! use adventure::engine::Engine;
//! use adventure::resource::MemoryBundle;
//!
//! let mut engine = Engine::new(EngineConfig::default(), Box::new(MemoryBundle::new())).unwrap();
//! assert_eq!(engine.handle_verb(1, -1, -1).unwrap(), -1);
//! ```

pub mod asm;
pub mod config;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod input;
pub mod mach;
pub mod resource;
pub mod sched;
pub mod world;
