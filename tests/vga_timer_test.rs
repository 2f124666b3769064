mod common;
use adventure::asm::VgaWriter;
use adventure::config::Variant;
use adventure::gfx::{GaugeKind, Image, VgaOp};
use adventure::resource::MemoryBundle;
use adventure::sched::VgaEventKind;
use common::*;

/// Animation `id` waits one pass, then sets variable `id` to 1.
fn countdown(w: VgaWriter, id: u16) -> VgaWriter {
    w.animation(id)
        .op(VgaOp::Delay)
        .word(1)
        .op(VgaOp::SetVar)
        .word(id as i16)
        .word(1)
        .op(VgaOp::End)
}

/// Animation `id` steps its sprite right once per pass, forever.
fn walker(w: VgaWriter, id: u16) -> VgaWriter {
    w.animation(id)
        .op(VgaOp::Delay)
        .word(1)
        .op(VgaOp::AddToSpriteX)
        .word(1)
        .op(VgaOp::Jump)
        .word(-12)
}

fn zone() -> Vec<u8> {
    let w = VgaWriter::new();
    let w = countdown(w, 1);
    let w = countdown(w, 2);
    let w = walker(w, 3);
    let w = countdown(w, 4);
    let w = countdown(w, 5);
    w.animation(6)
        .op(VgaOp::WaitSync)
        .word(9)
        .op(VgaOp::SetVar)
        .word(6)
        .word(1)
        .op(VgaOp::End)
        .animation(7)
        .op(VgaOp::Delay)
        .word(1)
        .op(VgaOp::Sync)
        .word(9)
        .op(VgaOp::End)
        .finish()
}

fn kinds(e: &adventure::engine::Engine) -> Vec<(VgaEventKind, u16)> {
    e.timers().vga.iter().map(|t| (t.kind, t.sprite)).collect()
}

#[test]
fn test_one_shot_entries_leave_before_their_payload_runs() {
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, zone()));
    for id in 1..=5 {
        e.animate(0, 1, id, 0, 0, 0).unwrap();
    }
    assert_eq!(e.timers().vga.len(), 6);
    e.process_vga_events().unwrap();
    assert_eq!(e.timers().vga.len(), 6);
    e.process_vga_events().unwrap();
    for id in &[1, 2, 4, 5] {
        assert_eq!(e.world().vars.fetch(*id).unwrap(), 1, "var {}", id);
    }
    assert_eq!(e.world().vars.fetch(3).unwrap(), 0);
    assert_eq!(e.graphics().sprites.find(3, 1).unwrap().x, 1);
    assert_eq!(
        kinds(&e),
        vec![(VgaEventKind::AnimateInt, 0), (VgaEventKind::AnimateEvent, 3)]
    );
    e.process_vga_events().unwrap();
    assert_eq!(e.graphics().sprites.find(3, 1).unwrap().x, 2);
    assert_eq!(e.timers().vga.len(), 2);
}

#[test]
fn test_periodic_entry_rearms() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    for _ in 0..10 {
        e.process_vga_events().unwrap();
    }
    assert_eq!(kinds(&e), vec![(VgaEventKind::AnimateInt, 0)]);
    assert_eq!(e.graphics().compositor.frames(), 10);
}

#[test]
fn test_slow_rearm_variant() {
    let (mut e, _clock) = engine_for(Variant::scrolling(), MemoryBundle::new());
    for _ in 0..11 {
        e.process_vga_events().unwrap();
    }
    assert_eq!(e.graphics().compositor.frames(), 3);
}

#[test]
fn test_sync_wakes_sleeping_script() {
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, zone()));
    e.animate(0, 1, 6, 0, 0, 0).unwrap();
    e.animate(0, 1, 7, 0, 0, 0).unwrap();
    assert_eq!(e.graphics().vga.sleepers.len(), 1);
    for _ in 0..3 {
        e.process_vga_events().unwrap();
    }
    assert!(e.graphics().vga.sleepers.is_empty());
    assert_eq!(e.world().vars.fetch(6).unwrap(), 1);
    assert_eq!(e.timers().vga.len(), 1);
}

#[test]
fn test_stop_animate_drops_pending_entries() {
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, zone()));
    e.animate(0, 1, 3, 0, 0, 0).unwrap();
    e.animate(0, 1, 6, 0, 0, 0).unwrap();
    e.stop_animate(3, 1);
    e.stop_animate(6, 1);
    assert_eq!(kinds(&e), vec![(VgaEventKind::AnimateInt, 0)]);
    assert!(e.graphics().sprites.is_empty());
    assert!(e.graphics().vga.sleepers.is_empty());
}

#[test]
fn test_animate_twice_is_ignored() {
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, zone()));
    e.animate(0, 1, 3, 0, 0, 0).unwrap();
    e.animate(0, 1, 3, 0, 0, 0).unwrap();
    assert_eq!(e.graphics().sprites.len(), 1);
    assert_eq!(e.timers().vga.len(), 2);
}

#[test]
fn test_animate_missing_zone() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    let err = e.animate(0, 4, 1, 0, 0, 0).unwrap_err();
    assert_eq!(err.to_string(), "ZONE NOT FOUND; zone 4");
}

#[test]
fn test_damage_gauge_ramps_and_expires() {
    let (mut e, _clock) = engine(MemoryBundle::new());
    e.start_damage(GaugeKind::Player, 2).unwrap();
    e.start_damage(GaugeKind::Player, 9).unwrap();
    assert_eq!(e.timers().vga.len(), 2);
    e.process_vga_events().unwrap();
    e.process_vga_events().unwrap();
    assert_eq!(e.graphics().gauges[0].level, 2);
    assert!(e.graphics().gauges[0].falling);
    for _ in 0..30 {
        e.process_vga_events().unwrap();
    }
    assert_eq!(e.graphics().gauges[0].level, 0);
    assert_eq!(kinds(&e), vec![(VgaEventKind::AnimateInt, 0)]);
}

#[test]
fn test_negative_literals_move_sprite() {
    let zone = VgaWriter::new()
        .animation(8)
        .op(VgaOp::SetSpriteXY)
        .word(10)
        .word(-4)
        .op(VgaOp::AddToSpriteX)
        .word(-1)
        .op(VgaOp::AddToSpriteY)
        .word(-3)
        .op(VgaOp::End)
        .finish();
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, zone));
    e.world_mut().vars.store(1, 7).unwrap();
    e.world_mut().vars.store(3, 7).unwrap();
    e.world_mut().vars.store(4, 7).unwrap();
    e.animate(0, 1, 8, 0, 0, 0).unwrap();
    let sprite = e.graphics().sprites.find(8, 1).unwrap();
    assert_eq!((sprite.x, sprite.y), (9, -7));
}

/// Animation 1 shows a background ten pixels wider than the screen and
/// scrolls it right by four.
fn scroller() -> Vec<u8> {
    VgaWriter::new()
        .image(Image::new(330, 1, vec![]))
        .animation(1)
        .op(VgaOp::SetBackground)
        .word(1)
        .op(VgaOp::ScrollRight)
        .word(4)
        .op(VgaOp::End)
        .finish()
}

#[test]
fn test_scroll_right() {
    let (mut e, _clock) = engine_for(Variant::scrolling(), MemoryBundle::new().with_zone(1, scroller()));
    e.animate(0, 1, 1, 0, 0, 0).unwrap();
    for _ in 0..40 {
        e.process_vga_events().unwrap();
    }
    assert_eq!(e.graphics().compositor.scroll_x(), 4);
    assert_eq!(kinds(&e), vec![(VgaEventKind::AnimateInt, 0)]);
}

#[test]
fn test_scroll_needs_scrolling_variant() {
    let (mut e, _clock) = engine(MemoryBundle::new().with_zone(1, scroller()));
    e.animate(0, 1, 1, 0, 0, 0).unwrap();
    for _ in 0..40 {
        e.process_vga_events().unwrap();
    }
    assert_eq!(e.graphics().compositor.scroll_x(), 0);
    assert_eq!(kinds(&e), vec![(VgaEventKind::AnimateInt, 0)]);
}
