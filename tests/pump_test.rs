mod common;
use adventure::asm::VgaWriter;
use adventure::gfx::{HitArea, Rect, VgaOp};
use adventure::input::{InputState, QueuedInput};
use adventure::resource::MemoryBundle;
use adventure::sched::{Clock, LockOut};
use common::*;

#[test]
fn test_three_passes_every_other_tick() {
    let (mut e, clock) = engine(MemoryBundle::new());
    e.delay(1000).unwrap();
    assert_eq!(clock.millis(), 1000);
    let ticks = e.pump().ticks();
    assert!(ticks >= 18, "{}", ticks);
    assert_eq!(e.pump().passes(), 2 * ticks + ticks / 2);
}

#[test]
fn test_late_pump_drops_backlog() {
    let (mut e, clock) = engine(MemoryBundle::new());
    clock.advance(1000);
    e.delay(0).unwrap();
    assert_eq!(e.pump().ticks(), 1);
    assert_eq!(e.pump().passes(), 2);
    e.delay(0).unwrap();
    assert_eq!(e.pump().ticks(), 1);
}

#[test]
fn test_halt_skips_processing_but_ticks() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    e.halt_animation();
    e.delay(500).unwrap();
    assert!(e.pump().ticks() > 0);
    assert_eq!(e.pump().passes(), 0);
    e.restart_animation();
    e.delay(500).unwrap();
    assert!(e.pump().passes() > 0);
}

#[test]
fn test_table_lock_blocks_tick() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    e.timers_mut().lock.hold(LockOut::TABLE);
    e.delay(500).unwrap();
    assert_eq!(e.pump().ticks(), 0);
    e.timers_mut().lock.release(LockOut::TABLE);
    e.delay(500).unwrap();
    assert!(e.pump().ticks() > 0);
}

#[test]
fn test_pause_freezes_ticks() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    e.pause();
    assert!(e.pump().is_paused());
    e.delay(500).unwrap();
    assert_eq!(e.pump().ticks(), 0);
    e.resume();
    e.delay(500).unwrap();
    assert!(e.pump().ticks() > 0);
}

#[test]
fn test_quit_ends_delay() {
    let (mut e, clock) = engine(MemoryBundle::new());
    e.request_quit();
    e.delay(10_000).unwrap();
    assert!(clock.millis() <= 20);
}

#[test]
fn test_wait_for_sync_times_out() {
    let (mut e, clock) = engine(MemoryBundle::new());
    e.wait_for_sync(5).unwrap();
    assert_eq!(e.pump().wait_for(), None);
    assert!(clock.millis() >= 2500);
}

#[test]
fn test_wait_for_sync_released_by_animation() {
    let zone = VgaWriter::new()
        .animation(1)
        .op(VgaOp::Delay)
        .word(3)
        .op(VgaOp::Sync)
        .word(5)
        .op(VgaOp::End)
        .finish();
    let (mut e, clock) = engine(MemoryBundle::new().with_zone(1, zone));
    e.animate(0, 1, 1, 0, 0, 0).unwrap();
    e.wait_for_sync(5).unwrap();
    assert_eq!(e.pump().wait_for(), None);
    assert!(clock.millis() < 200, "{}", clock.millis());
    assert_eq!(e.timers().vga.len(), 1);
}

#[test]
fn test_tick_tracks_hovered_area() {
    let state = InputState {
        mouse_x: 15,
        mouse_y: 12,
        ..InputState::default()
    };
    let (e, _clock) = engine(MemoryBundle::new());
    let mut e = e.with_input(Box::new(QueuedInput::new(vec![state])));
    e.graphics_mut().hit_areas.add(HitArea {
        id: 7,
        rect: Rect::new(10, 10, 20, 20),
        priority: 0,
        flags: 0,
        item: None,
        verb: 0,
        enabled: true,
    });
    e.delay(200).unwrap();
    assert_eq!(e.input_state(), state);
    assert_eq!(e.hovered(), Some(7));
}
