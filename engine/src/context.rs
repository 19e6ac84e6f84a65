use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use glam::UVec2;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    config::EngineConfig,
    error::EngineError,
    game::{Game, GameFlow},
    host::RunLoop,
    input::Input,
    render::{create_graphics, Color, Graphics},
    time::FrameClock,
};

/// Events delivered to the loop from outside a window callback.
pub enum EngineEvent {
    GraphicsReady(Graphics),
    GraphicsFailed(crate::error::GraphicsError),
}

enum State {
    Ready(Graphics),
    Init(Option<EventLoopProxy<EngineEvent>>),
}

/// What a frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Frame {
    /// Game not initialized yet; nothing ran.
    Skipped,
    Draw(Color),
    Exit,
}

/// The game plus everything it sees: clock, input, and its own lifecycle.
struct Runner<G: Game> {
    game: G,
    input: Input,
    clock: FrameClock,
    initialized: bool,
    failure: Option<EngineError>,
}

impl<G: Game> Runner<G> {
    fn new(game: G, clock: FrameClock) -> Self {
        Self {
            game,
            input: Input::default(),
            clock,
            initialized: false,
            failure: None,
        }
    }

    fn initialize(&mut self) {
        if !self.initialized {
            self.game.initialize();
            self.initialized = true;
        }
    }

    /// Runs the updates owed for `delta`, then asks the game for a draw.
    fn frame(&mut self, delta: Duration) -> Frame {
        if !self.initialized {
            return Frame::Skipped;
        }

        let mut updated = false;
        for time in self.clock.advance(delta) {
            updated = true;
            if self.game.update(&time, &self.input) == GameFlow::Exit {
                return Frame::Exit;
            }
        }
        if updated {
            self.input.end_frame();
        }

        Frame::Draw(self.game.draw(&self.clock.time()))
    }

    /// Keeps the first failure; later ones are usually fallout from it.
    fn fail(&mut self, err: EngineError) {
        error!("engine stopping: {err}");
        self.failure.get_or_insert(err);
    }

    fn finish(&mut self) -> Result<(), EngineError> {
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn unload(mut self) {
        if self.initialized {
            self.game.unload();
        }
    }
}

/// The windowed run loop: one window, one surface, one game.
pub struct EngineContext<G: Game> {
    event_loop: Option<EventLoop<EngineEvent>>,
    app: App<G>,
}

struct App<G: Game> {
    state: State,
    config: EngineConfig,
    runner: Runner<G>,
    last_frame: Option<Instant>,
}

impl<G: Game> App<G> {
    fn new(config: EngineConfig, game: G, event_loop: &EventLoop<EngineEvent>) -> Self {
        let clock = FrameClock::new(
            config.target_elapsed(),
            config.max_elapsed(),
            config.timing.fixed_time_step,
        );
        Self {
            state: State::Init(Some(event_loop.create_proxy())),
            config,
            runner: Runner::new(game, clock),
            last_frame: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        self.runner.fail(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // The OS may ask for a paint before graphics (and the game) are ready.
        let State::Ready(gfx) = &mut self.state else {
            return;
        };

        let now = Instant::now();
        let delta = match self.last_frame.replace(now) {
            Some(last) => now - last,
            None => Duration::ZERO,
        };

        match self.runner.frame(delta) {
            Frame::Draw(clear) => gfx.draw(clear),
            Frame::Exit => {
                info!("game requested exit");
                event_loop.exit();
            }
            Frame::Skipped => {}
        }
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        if let State::Ready(gfx) = &mut self.state {
            gfx.resize(UVec2::new(size.width, size.height));
        }
    }

    fn key(&mut self, event: KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.runner.input.press(code),
            ElementState::Released => self.runner.input.release(code),
        }
    }
}

impl<G: Game> ApplicationHandler<EngineEvent> for App<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let State::Init(proxy) = &mut self.state else {
            return;
        };
        let Some(proxy) = proxy.take() else {
            return;
        };

        let window = &self.config.window;
        let win_attr = Window::default_attributes()
            .with_title(window.title.clone())
            .with_inner_size(LogicalSize::new(window.width, window.height))
            .with_resizable(window.resizable);

        let window = match event_loop.create_window(win_attr) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        debug!("window created: {:?}", window.inner_size());

        pollster::block_on(create_graphics(window, self.config.window.vsync, proxy));
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: EngineEvent) {
        match event {
            EngineEvent::GraphicsReady(graphics) => {
                info!("graphics ready at {}", graphics.size());
                self.runner.initialize();
                graphics.request_redraw();
                self.state = State::Ready(graphics);
            }
            EngineEvent::GraphicsFailed(err) => self.fail(event_loop, err.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { event, .. } => self.key(event),
            WindowEvent::Focused(false) => self.runner.input.clear(),
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let State::Ready(gfx) = &self.state {
            gfx.request_redraw();
        }
    }
}

impl<G: Game> EngineContext<G> {
    pub fn new(config: EngineConfig, game: G) -> Result<Self, EngineError> {
        config.validate()?;
        let event_loop = EventLoop::<EngineEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        let app = App::new(config, game, &event_loop);
        Ok(Self {
            event_loop: Some(event_loop),
            app,
        })
    }
}

impl<G: Game> RunLoop for EngineContext<G> {
    type Error = EngineError;

    /// Runs the event loop on the current thread until the window closes or
    /// the game exits.
    fn run(&mut self) -> Result<(), EngineError> {
        let event_loop = self.event_loop.take().ok_or(EngineError::AlreadyRan)?;
        event_loop.run_app(&mut self.app)?;
        self.app.runner.finish()
    }

    fn dispose(self) {
        let App { state, runner, .. } = self.app;
        runner.unload();
        // Surface before window.
        drop(state);
        debug!("engine context released");
    }
}
