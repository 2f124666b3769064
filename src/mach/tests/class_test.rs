use super::*;
use crate::mach::Opcode::*;
use crate::world::ItemId;

fn id(raw: i16) -> ItemId {
    ItemId::new(raw as u16).unwrap()
}

fn classify(e: &mut Engine, raw: i16, class: u16) {
    e.world.items.get_mut(id(raw)).unwrap().class_flags |= 1 << class;
}

#[test]
fn test_rest_of_subroutine_runs_per_item() {
    let t = writer()
        .subroutine(10)
        .line()
        .op(Inc).var(2)
        .end()
        .line()
        .op(DoClass).item(ROOM).byte(2).byte(1)
        .end()
        .line()
        .op(SetState).item(-1).word(5)
        .op(Inc).var(1)
        .end();
    let mut e = engine(t);
    classify(&mut e, LAMP, 2);
    classify(&mut e, BOX, 2);
    assert_eq!(run(&mut e, 10), "");
    assert_eq!(e.world.vars.fetch(1).unwrap(), 2);
    assert_eq!(e.world.vars.fetch(2).unwrap(), 1);
    assert_eq!(e.world.items.get(id(LAMP)).unwrap().state, 5);
    assert_eq!(e.world.items.get(id(BOX)).unwrap().state, 5);
    assert_eq!(e.world.items.get(ItemId::PLAYER).unwrap().state, 0);
}

#[test]
fn test_any_class_binds_object() {
    let t = writer()
        .subroutine(10)
        .line()
        .op(DoClass).item(ROOM).byte(255).byte(2)
        .end()
        .line()
        .op(If2)
        .op(GetParent).item(-3).var(3)
        .op(Inc).var(1)
        .end();
    let mut e = engine(t);
    run(&mut e, 10);
    assert_eq!(e.world.vars.fetch(1).unwrap(), 3);
    assert_eq!(e.world.vars.fetch(3).unwrap(), ROOM);
    assert_eq!(e.script.subject, None);
}

#[test]
fn test_item_that_lost_class_is_skipped() {
    let t = writer()
        .subroutine(10)
        .line()
        .op(DoClass).item(ROOM).byte(2).byte(1)
        .end()
        .line()
        .op(UnsetClass).item(BOX).byte(2)
        .op(Inc).var(1)
        .end();
    let mut e = engine(t);
    classify(&mut e, LAMP, 2);
    classify(&mut e, BOX, 2);
    run(&mut e, 10);
    assert_eq!(e.world.vars.fetch(1).unwrap(), 1);
}

#[test]
fn test_empty_class_binds_nothing() {
    let t = writer()
        .subroutine(10)
        .line()
        .op(DoClass).item(ROOM).byte(5).byte(1)
        .end()
        .line()
        .op(If1)
        .op(Inc).var(1)
        .end()
        .line()
        .op(Inc).var(2)
        .end();
    let mut e = engine(t);
    run(&mut e, 10);
    assert_eq!(e.world.vars.fetch(1).unwrap(), 0);
    assert_eq!(e.world.vars.fetch(2).unwrap(), 1);
}

#[test]
fn test_done_ends_only_current_item() {
    let t = writer()
        .subroutine(10)
        .line()
        .op(DoClass).item(ROOM).byte(255).byte(1)
        .end()
        .line()
        .op(Inc).var(1)
        .op(Done)
        .end();
    let mut e = engine(t);
    run(&mut e, 10);
    assert_eq!(e.world.vars.fetch(1).unwrap(), 3);
}
