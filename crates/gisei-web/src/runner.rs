use gisei_engine::bridge::protocol::{HEADER_EVENT_COUNT, HEADER_INSTANCE_COUNT};
use gisei_engine::{
    Clock, FixedTimestep, FrameView, InputEvent, KeyState, LevelSession, ManualClock, MapError,
    MapRegistry, MapSource, Presentation, ProtocolLayout, SessionEvent, SimConfig,
};

const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Drives a [`LevelSession`] from variable frame deltas.
///
/// Owns the simulated clock, the fixed-timestep accumulator, queued key
/// events and the map source. wasm-bindgen cannot export generic structs,
/// so the crate root keeps a concrete runner in a `thread_local!`.
pub struct GameRunner<P: Presentation, S: MapSource = MapRegistry> {
    config: SimConfig,
    source: S,
    presenter: P,
    session: Option<LevelSession>,
    clock: ManualClock,
    timestep: FixedTimestep,
    keys: KeyState,
    /// Events of every step run during the current frame.
    frame_events: Vec<SessionEvent>,
}

impl<P: Presentation, S: MapSource> GameRunner<P, S> {
    pub fn new(config: SimConfig, source: S, presenter: P) -> Self {
        let dt = if config.fixed_dt.is_finite() && config.fixed_dt > 0.0 {
            config.fixed_dt
        } else {
            log::warn!("invalid fixed_dt {}, using 1/60", config.fixed_dt);
            DEFAULT_FIXED_DT
        };
        Self {
            config,
            source,
            presenter,
            session: None,
            clock: ManualClock::new(),
            timestep: FixedTimestep::new(dt),
            keys: KeyState::new(),
            frame_events: Vec::new(),
        }
    }

    /// Load the first level and present it. Call again to restart from the
    /// first level.
    pub fn start(&mut self) -> Result<(), MapError> {
        let session = LevelSession::start(self.config.clone(), &self.source)?;
        self.presenter.level_loaded(session.map_id());
        self.frame_events.clear();
        self.presenter.present(&session.frame());
        self.session = Some(session);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// Queue a key event. Applied before the next simulated step.
    pub fn push_input(&mut self, event: InputEvent) {
        self.keys.push(event);
    }

    /// Run as many fixed steps as `frame_dt` covers, then present the result.
    pub fn tick(&mut self, frame_dt: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.frame_events.clear();
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.clock.advance(self.timestep.step_duration());
            self.keys.fold_pending();
            let snapshot = self.keys.snapshot(&self.config.keys);

            session.tick(snapshot, &self.source, self.clock.now());
            for event in session.events() {
                if let SessionEvent::LevelChanged { to, .. } = event {
                    self.presenter.level_loaded(to);
                }
            }
            self.frame_events.extend_from_slice(session.events());
        }

        let frame = FrameView {
            events: &self.frame_events,
            ..session.frame()
        };
        self.presenter.present(&frame);
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut LevelSession> {
        self.session.as_mut()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Maps can be added at any time; transitions look them up lazily.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Packs every presented frame into a flat `f32` buffer the host reads
/// through a pointer.
pub struct BufferPresenter {
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    frame_counter: u64,
}

impl BufferPresenter {
    pub fn new(layout: ProtocolLayout) -> Self {
        let buffer = layout.allocate();
        Self {
            layout,
            buffer,
            frame_counter: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(ProtocolLayout::from_config(config))
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn instance_count(&self) -> u32 {
        self.buffer[HEADER_INSTANCE_COUNT] as u32
    }

    pub fn event_count(&self) -> u32 {
        self.buffer[HEADER_EVENT_COUNT] as u32
    }
}

impl Presentation for BufferPresenter {
    fn present(&mut self, frame: &FrameView<'_>) {
        self.frame_counter += 1;
        self.layout.write_frame(frame, self.frame_counter, &mut self.buffer);
    }
}
