use crate::config::EngineConfig;
use crate::error::Result;
use crate::gfx::{Graphics, MemoryScreen, Screen, ScriptPtr};
use crate::input::{InputSource, InputState, NoInput};
use crate::mach::{Dispatch, Output, ScriptState, SubroutineTable, TableIndex};
use crate::resource::ResourceBundle;
use crate::sched::{Clock, FramePump, SystemClock, Timers, VgaEventKind, VgaTimerEntry};
use crate::world::{SavedState, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// ## Engine
///
/// The interpreter context. Opcode handlers reach the world, graphics
/// and timers through their own fields; nothing is global. Everything
/// runs on the caller's thread; the only thing shared with other threads
/// is the quit flag.

pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) world: World,
    pub(crate) gfx: Graphics,
    pub(crate) timers: Timers,
    pub(crate) script: ScriptState,
    pub(crate) tables: SubroutineTable,
    pub(crate) dispatch: Dispatch,
    pub(crate) pump: FramePump,
    pub(crate) resources: Box<dyn ResourceBundle>,
    pub(crate) screen: Box<dyn Screen>,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) input_state: InputState,
    pub(crate) hovered: Option<u16>,
    pub(crate) rng: StdRng,
    pub(crate) output: Vec<Output>,
    pub(crate) quit: Arc<AtomicBool>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Engine({}, {:?})", self.config.variant.name, self.pump)
    }
}

impl Engine {
    /// Loads the table indices and the resident tables, and starts the
    /// periodic animation timer.
    pub fn new(config: EngineConfig, resources: Box<dyn ResourceBundle>) -> Result<Engine> {
        let dispatch = Dispatch::new(config.variant.opcodes);
        let index = match resources.table_index() {
            Some(data) => TableIndex::parse(&data)?,
            None => TableIndex::new(),
        };
        let extra_index = match resources.extra_table_index() {
            Some(data) => TableIndex::parse(&data)?,
            None => TableIndex::new(),
        };
        let mut tables = SubroutineTable::new(config.tables_heap_size, index, extra_index);
        if let Some(data) = resources.base_tables() {
            tables.load_baseline(&data, config.variant.format, &dispatch)?;
        }
        info!(
            variant = config.variant.name,
            resident = tables.heap().len(),
            "engine started"
        );
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Engine {
            world: World::new(config.var_count, config.bit_words),
            gfx: Graphics::new(&config),
            timers: Timers::new(config.vga_timer_capacity),
            script: ScriptState::new(config.max_call_depth),
            tables,
            dispatch,
            pump: FramePump::new(Box::new(SystemClock::new())),
            resources,
            screen: Box::new(MemoryScreen::new(config.screen_width, config.screen_height)),
            input: Box::new(NoInput),
            input_state: InputState::default(),
            hovered: None,
            rng,
            output: vec![],
            quit: Arc::new(AtomicBool::new(false)),
            config,
        };
        engine.start_animation_timer()?;
        Ok(engine)
    }

    fn start_animation_timer(&mut self) -> Result<()> {
        self.add_vga_event(VgaTimerEntry {
            delay: 1,
            kind: VgaEventKind::AnimateInt,
            script: ScriptPtr::default(),
            sprite: 0,
            zone: 0,
        })
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Engine {
        self.pump = FramePump::new(clock);
        self
    }

    pub fn with_screen(mut self, screen: Box<dyn Screen>) -> Engine {
        self.screen = screen;
        self
    }

    pub fn with_input(mut self, input: Box<dyn InputSource>) -> Engine {
        self.input = input;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn graphics(&self) -> &Graphics {
        &self.gfx
    }

    pub fn graphics_mut(&mut self) -> &mut Graphics {
        &mut self.gfx
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn script(&self) -> &ScriptState {
        &self.script
    }

    pub fn script_mut(&mut self) -> &mut ScriptState {
        &mut self.script
    }

    pub fn tables(&self) -> &SubroutineTable {
        &self.tables
    }

    pub fn pump(&self) -> &FramePump {
        &self.pump
    }

    pub fn screen_mut(&mut self) -> &mut dyn Screen {
        self.screen.as_mut()
    }

    pub fn input_state(&self) -> InputState {
        self.input_state
    }

    /// Hit area under the pointer as of the last tick.
    pub fn hovered(&self) -> Option<u16> {
        self.hovered
    }

    pub fn take_output(&mut self) -> Vec<Output> {
        std::mem::take(&mut self.output)
    }

    /// For a signal handler or another thread to request a cooperative stop.
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        self.quit.clone()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Relaxed);
    }

    pub fn save_state(&self) -> Result<SavedState> {
        let now = self.pump.seconds();
        SavedState::capture(&self.world, self.timers.events.snapshot(now))
    }

    /// Replaces world and timed events. Animation state is dropped and
    /// the next frame is redrawn from scratch.
    pub fn restore_state(&mut self, state: &SavedState) -> Result<()> {
        state.apply(&mut self.world)?;
        let now = self.pump.seconds();
        self.timers.events.restore(now, &state.events);
        self.timers.vga.clear_one_shots();
        self.gfx.reset();
        self.script.subject = None;
        self.script.object = None;
        Ok(())
    }
}
