use crate::asm::TableWriter;
use crate::config::{EngineConfig, Variant};
use crate::engine::Engine;
use crate::mach::Output;
use crate::resource::MemoryBundle;
use crate::sched::ManualClock;

mod class_test;

const ROOM: i16 = 2;
const LAMP: i16 = 3;
const BOX: i16 = 4;

fn writer() -> TableWriter {
    TableWriter::new(&Variant::standard())
}

/// Player, room, lamp and box; everything but the room lies in the room.
fn engine(tables: TableWriter) -> Engine {
    let bundle = MemoryBundle::new()
        .with_base_tables(tables.finish().unwrap())
        .with_text(1, "IT IS DARK")
        .with_text(2, "YOU SEE A LAMP");
    let mut config = EngineConfig::default();
    config.random_seed = Some(7);
    let mut engine = Engine::new(config, Box::new(bundle))
        .unwrap()
        .with_clock(Box::new(ManualClock::new()));
    let items = &mut engine.world.items;
    let player = items.create(0, 0);
    let room = items.create(1, 0);
    let lamp = items.create(2, 0);
    let boxed = items.create(3, 0);
    items.set_parent(player, Some(room)).unwrap();
    items.set_parent(boxed, Some(room)).unwrap();
    items.set_parent(lamp, Some(room)).unwrap();
    engine
}

fn drain(engine: &mut Engine) -> String {
    let mut s = String::new();
    for output in engine.take_output() {
        match output {
            Output::Message(m) => s.push_str(&format!("{}\n", m)),
            Output::Number(n) => s.push_str(&format!("{}\n", n)),
            Output::NoMatch => s.push_str("?\n"),
            Output::Quit => s.push_str("QUIT\n"),
        }
    }
    s
}

fn run(engine: &mut Engine, id: u16) -> String {
    let result = engine.run_subroutine_id(id);
    let mut s = drain(engine);
    if let Err(error) = result {
        s.push_str(&format!("{}\n", error));
    }
    s
}

fn command(engine: &mut Engine, verb: i16, noun1: i16, noun2: i16) -> String {
    let result = engine.handle_verb(verb, noun1, noun2);
    let mut s = drain(engine);
    if let Err(error) = result {
        s.push_str(&format!("{}\n", error));
    }
    s
}
