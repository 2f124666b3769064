mod common;
use adventure::asm::VgaWriter;
use adventure::gfx::VgaOp;
use adventure::resource::MemoryBundle;
use adventure::sched::VgaEventKind;
use adventure::world::ItemId;
use common::*;

fn walker() -> Vec<u8> {
    VgaWriter::new()
        .animation(1)
        .op(VgaOp::Delay)
        .word(5)
        .op(VgaOp::End)
        .finish()
}

#[test]
fn test_restore_brings_back_world_and_events() {
    let (mut e, clock) = engine(MemoryBundle::new().with_zone(1, walker()));
    e.world_mut().items.set_parent(item(LAMP), Some(ItemId::PLAYER)).unwrap();
    e.world_mut().items.get_mut(item(BOX)).unwrap().state = 3;
    e.world_mut().vars.store(10, 42).unwrap();
    e.world_mut().vars.set_bit(5, true).unwrap();
    e.schedule_event(8, 7);
    clock.advance(3000);
    let saved = e.save_state().unwrap();
    assert_eq!(saved.events, vec![(5, 7)]);

    e.world_mut().items.set_parent(item(LAMP), Some(item(ROOM))).unwrap();
    e.world_mut().vars.store(10, 0).unwrap();
    e.world_mut().vars.set_bit(5, false).unwrap();
    e.timers_mut().events.clear();
    e.animate(0, 1, 1, 0, 0, 0).unwrap();
    clock.advance(60_000);

    e.restore_state(&saved).unwrap();
    assert_eq!(e.world().items.parent(item(LAMP)).unwrap(), Some(ItemId::PLAYER));
    assert_eq!(e.world().items.get(item(BOX)).unwrap().state, 3);
    assert_eq!(e.world().vars.fetch(10).unwrap(), 42);
    assert!(e.world().vars.bit(5).unwrap());
    assert_eq!(e.save_state().unwrap().events, vec![(5, 7)]);
    assert_eq!(e.save_state().unwrap().digest(), saved.digest());
    assert!(e.graphics().sprites.is_empty());
    let kinds: Vec<VgaEventKind> = e.timers().vga.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![VgaEventKind::AnimateInt]);
}

#[test]
fn test_digest_tracks_changes() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    let before = e.save_state().unwrap().digest();
    assert_eq!(e.save_state().unwrap().digest(), before);
    e.world_mut().vars.store(1, 1).unwrap();
    assert_ne!(e.save_state().unwrap().digest(), before);
}

#[test]
fn test_restore_keeps_equal_time_order() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    e.schedule_event(5, 7);
    e.schedule_event(5, 5);
    e.schedule_event(2, 9);
    let saved = e.save_state().unwrap();
    assert_eq!(saved.events, vec![(2, 9), (5, 5), (5, 7)]);
    e.restore_state(&saved).unwrap();
    let again = e.save_state().unwrap();
    assert_eq!(again.events, saved.events);
    assert_eq!(again.digest(), saved.digest());
}

#[test]
fn test_restore_rejects_other_world() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    let mut saved = e.save_state().unwrap();
    saved.items.pop();
    assert!(e.restore_state(&saved).is_err());
}
