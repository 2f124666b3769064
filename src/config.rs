use crate::mach::{OpcodeTable, ScriptFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyMode {
    /// Restore every snapshot and redraw every sprite on each pass.
    Full,
    /// Propagate dirty flags to a fixpoint and redraw only what they reach.
    Clipped,
}

/// ## Game variant description
///
/// Static configuration that distinguishes one game release from another.
/// None of it is behavior; the interpreter, timers and compositor read it.

#[derive(Debug, Clone)]
pub struct Variant {
    pub name: &'static str,
    pub format: ScriptFormat,
    pub opcodes: &'static OpcodeTable,
    /// Amount every VGA timer counts down per processing pass.
    pub vga_base_delay: i16,
    /// Delay a periodic animation entry re-arms itself with.
    pub rearm_delay: i16,
    pub dirty_mode: DirtyMode,
    pub sync_iterations: u32,
    /// While this variable is non-zero the full-screen spell effect is drawn
    /// underneath the sprites.
    pub spell_effect_var: Option<usize>,
    /// `ScrollRight` and `ScrollLeft` do nothing without it.
    pub scrolling: bool,
}

impl Variant {
    pub fn classic() -> Variant {
        Variant {
            name: "classic",
            format: ScriptFormat::Word,
            opcodes: &crate::mach::CLASSIC_OPCODES,
            vga_base_delay: 1,
            rearm_delay: 1,
            dirty_mode: DirtyMode::Full,
            sync_iterations: 1000,
            spell_effect_var: Some(293),
            scrolling: false,
        }
    }

    pub fn standard() -> Variant {
        Variant {
            name: "standard",
            format: ScriptFormat::Byte,
            opcodes: &crate::mach::STANDARD_OPCODES,
            vga_base_delay: 1,
            rearm_delay: 1,
            dirty_mode: DirtyMode::Clipped,
            sync_iterations: 2500,
            spell_effect_var: None,
            scrolling: false,
        }
    }

    pub fn scrolling() -> Variant {
        Variant {
            name: "scrolling",
            rearm_delay: 5,
            scrolling: true,
            ..Variant::standard()
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub variant: Variant,
    /// Wall-clock milliseconds per tick.
    pub tick_period: u64,
    pub fast_tick_period: u64,
    pub fast_mode: bool,
    pub max_call_depth: usize,
    pub tables_heap_size: usize,
    pub vga_timer_capacity: usize,
    pub sprite_capacity: usize,
    pub var_count: usize,
    pub bit_words: usize,
    pub screen_width: usize,
    pub screen_height: usize,
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::for_variant(Variant::standard())
    }
}

impl EngineConfig {
    pub fn for_variant(variant: Variant) -> EngineConfig {
        let var_count = match variant.format {
            ScriptFormat::Word => 512,
            ScriptFormat::Byte => 256,
        };
        EngineConfig {
            variant,
            tick_period: 50,
            fast_tick_period: 10,
            fast_mode: false,
            max_call_depth: 40,
            tables_heap_size: 250_000,
            vga_timer_capacity: 205,
            sprite_capacity: 200,
            var_count,
            bit_words: 32,
            screen_width: 320,
            screen_height: 200,
            random_seed: None,
        }
    }

    pub fn period(&self) -> u64 {
        if self.fast_mode {
            self.fast_tick_period
        } else {
            self.tick_period
        }
    }
}
