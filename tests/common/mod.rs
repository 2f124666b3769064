#![allow(dead_code)]
use adventure::config::{EngineConfig, Variant};
use adventure::engine::Engine;
use adventure::gfx::{Rect, Screen};
use adventure::mach::Output;
use adventure::resource::MemoryBundle;
use adventure::sched::ManualClock;
use adventure::world::ItemId;
use std::cell::RefCell;
use std::rc::Rc;

pub const ROOM: u16 = 2;
pub const LAMP: u16 = 3;
pub const BOX: u16 = 4;

pub fn engine(bundle: MemoryBundle) -> (Engine, ManualClock) {
    engine_for(Variant::standard(), bundle)
}

/// Engine on a manual clock with a player in a room holding nothing, a
/// lamp and a box lying in the room.
pub fn engine_for(variant: Variant, bundle: MemoryBundle) -> (Engine, ManualClock) {
    let mut config = EngineConfig::for_variant(variant);
    config.random_seed = Some(1);
    let clock = ManualClock::new();
    let mut engine = Engine::new(config, Box::new(bundle))
        .unwrap()
        .with_clock(Box::new(clock.clone()));
    let items = &mut engine.world_mut().items;
    let player = items.create(0, 0);
    let room = items.create(1, 0);
    let lamp = items.create(2, 0);
    let boxed = items.create(3, 0);
    items.set_parent(player, Some(room)).unwrap();
    items.set_parent(boxed, Some(room)).unwrap();
    items.set_parent(lamp, Some(room)).unwrap();
    (engine, clock)
}

pub fn item(raw: u16) -> ItemId {
    ItemId::new(raw).unwrap()
}

/// Output produced since the last call, one line per entry.
pub fn output(engine: &mut Engine) -> String {
    let mut s = String::new();
    render(engine, &mut s);
    s
}

fn render(engine: &mut Engine, s: &mut String) {
    for output in engine.take_output() {
        match output {
            Output::Message(m) => s.push_str(&format!("{}\n", m)),
            Output::Number(n) => s.push_str(&format!("{}\n", n)),
            Output::NoMatch => s.push_str("?\n"),
            Output::Quit => s.push_str("QUIT\n"),
        }
    }
}

/// Runs a command through the verb dispatcher; output and any error as text.
pub fn exec(engine: &mut Engine, verb: i16, noun1: i16, noun2: i16) -> String {
    let result = engine.handle_verb(verb, noun1, noun2);
    let mut s = String::new();
    render(engine, &mut s);
    if let Err(error) = result {
        s.push_str(&format!("{}\n", error));
    }
    s
}

/// Runs one subroutine by id; output and any error as text.
pub fn call(engine: &mut Engine, id: u16) -> String {
    let result = engine.run_subroutine_id(id);
    let mut s = String::new();
    render(engine, &mut s);
    if let Err(error) = result {
        s.push_str(&format!("{}\n", error));
    }
    s
}

/// Screen that shares the rectangles it was asked to update.
pub struct RecordingScreen {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    pub updates: Rc<RefCell<Vec<Rect>>>,
}

impl RecordingScreen {
    pub fn new(width: usize, height: usize) -> RecordingScreen {
        RecordingScreen {
            width,
            height,
            pixels: vec![0; width * height],
            updates: Rc::new(RefCell::new(vec![])),
        }
    }
}

impl Screen for RecordingScreen {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn lock(&mut self) -> (&mut [u8], usize) {
        (&mut self.pixels, self.width)
    }

    fn set_palette(&mut self, _palette: &[u8]) {}

    fn update(&mut self, rect: Rect) {
        self.updates.borrow_mut().push(rect);
    }
}
