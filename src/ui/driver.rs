use console::{Key, Term};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{interval, MissedTickBehavior};
use crate::core::{Direction, GameEngine, GamePhase};
use crate::render::Canvas;
use crate::utils::GameResult;
use tracing::{debug, trace, warn};

/// A key press as the frame loop sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    Press(Direction),
    ReleaseAll,
    Quit,
    Other,
}

impl HostInput {
    pub fn from_key(key: &Key) -> Self {
        match key {
            Key::ArrowLeft | Key::Char('a') | Key::Char('A') => HostInput::Press(Direction::Left),
            Key::ArrowRight | Key::Char('d') | Key::Char('D') => HostInput::Press(Direction::Right),
            Key::ArrowDown | Key::Char(' ') | Key::Char('s') | Key::Char('S') => HostInput::ReleaseAll,
            Key::Escape | Key::Char('q') | Key::Char('Q') => HostInput::Quit,
            _ => HostInput::Other,
        }
    }
}

/// How a session handed control back to the menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    GameOver(u32),
    Quit,
    InputClosed,
}

/// Shared on/off switch for the key reader thread.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    active: Arc<AtomicBool>,
}

impl ListenerHandle {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The reader still delivers the key it is blocked on, then exits.
    pub fn shutdown(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Default for ListenerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads keys on a blocking thread and forwards them to the frame loop.
/// Exits after forwarding a quit key or once `handle` is shut down.
pub fn spawn_key_reader(
    term: Term,
    sender: UnboundedSender<HostInput>,
    handle: ListenerHandle,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while handle.is_active() {
            let key = match term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    warn!("Key reader stopped: {}", e);
                    break;
                }
            };

            let input = HostInput::from_key(&key);
            trace!("Key {:?} -> {:?}", key, input);

            if sender.send(input).is_err() || input == HostInput::Quit {
                break;
            }
        }
        debug!("Key reader exited");
    })
}

/// Waits for the key reader to exit after a shutdown, discarding what it
/// forwards on the way. Returns the number of discarded inputs.
pub async fn drain_until_closed(inputs: &mut UnboundedReceiver<HostInput>) -> usize {
    let mut discarded = 0;
    while inputs.recv().await.is_some() {
        discarded += 1;
    }
    discarded
}

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Calls [`GameEngine::advance_frame`] on a fixed cadence and feeds it keys.
///
/// Terminals report presses and auto-repeats but no releases, so a held
/// direction is released once no repeat arrived for `key_hold`.
pub struct FrameDriver {
    frame_interval: Duration,
    key_hold: Duration,
    pressed_at: HashMap<Direction, Instant>,
}

impl FrameDriver {
    /// A zero interval is raised to one millisecond.
    pub fn new(frame_interval: Duration, key_hold: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
            key_hold,
            pressed_at: HashMap::new(),
        }
    }

    /// Drives frames until the run ends, the player quits or input closes.
    /// `present` is called after every frame, including the game-over frame.
    pub async fn run<C, F>(
        &mut self,
        engine: &mut GameEngine<C>,
        inputs: &mut UnboundedReceiver<HostInput>,
        mut present: F,
    ) -> GameResult<SessionOutcome>
    where
        C: Canvas,
        F: FnMut(&GameEngine<C>) -> GameResult<()>,
    {
        self.pressed_at.clear();
        let mut ticker = interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.release_stale(engine, Instant::now());
                    let keep_going = engine.advance_frame();
                    present(&*engine)?;

                    if !keep_going {
                        return Ok(match engine.phase() {
                            GamePhase::GameOver => SessionOutcome::GameOver(engine.score()),
                            _ => SessionOutcome::Quit,
                        });
                    }
                }
                input = inputs.recv() => match input {
                    Some(HostInput::Quit) => {
                        engine.stop();
                        return Ok(SessionOutcome::Quit);
                    }
                    Some(input) => self.apply(engine, input, Instant::now()),
                    None => {
                        engine.stop();
                        return Ok(SessionOutcome::InputClosed);
                    }
                },
            }
        }
    }

    fn apply<C: Canvas>(&mut self, engine: &mut GameEngine<C>, input: HostInput, now: Instant) {
        match input {
            HostInput::Press(direction) => {
                // switching sides lets go of the other side at once
                let opposite = match direction {
                    Direction::Left => Direction::Right,
                    Direction::Right => Direction::Left,
                };
                if self.pressed_at.remove(&opposite).is_some() {
                    engine.key_up(opposite);
                }
                if engine.key_down(direction) {
                    self.pressed_at.insert(direction, now);
                }
            }
            HostInput::ReleaseAll => {
                for (direction, _) in self.pressed_at.drain() {
                    engine.key_up(direction);
                }
            }
            HostInput::Quit | HostInput::Other => {}
        }
    }

    fn release_stale<C: Canvas>(&mut self, engine: &mut GameEngine<C>, now: Instant) {
        let key_hold = self.key_hold;
        let stale: Vec<Direction> = self
            .pressed_at
            .iter()
            .filter(|(_, pressed)| now.duration_since(**pressed) >= key_hold)
            .map(|(direction, _)| *direction)
            .collect();

        for direction in stale {
            self.pressed_at.remove(&direction);
            engine.key_up(direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineSettings;
    use crate::core::Snowflake;
    use crate::render::RecordingCanvas;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::sync::mpsc::unbounded_channel;

    fn calm_engine(height: f64) -> (GameEngine<RecordingCanvas>, Rc<RefCell<Vec<u32>>>) {
        let mut settings = EngineSettings::default();
        settings.game.snowflake_spawn_rate = 0.0;

        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = reports.clone();
        let engine = GameEngine::new(RecordingCanvas::new(600.0, height), settings, move |score| {
            sink.borrow_mut().push(score)
        })
        .unwrap();
        (engine, reports)
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(Duration::from_millis(1), Duration::from_millis(400))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(HostInput::from_key(&Key::ArrowLeft), HostInput::Press(Direction::Left));
        assert_eq!(HostInput::from_key(&Key::Char('d')), HostInput::Press(Direction::Right));
        assert_eq!(HostInput::from_key(&Key::Char(' ')), HostInput::ReleaseAll);
        assert_eq!(HostInput::from_key(&Key::Escape), HostInput::Quit);
        assert_eq!(HostInput::from_key(&Key::Enter), HostInput::Other);
    }

    #[test]
    fn test_listener_handle_shutdown_is_shared() {
        let handle = ListenerHandle::new();
        let reader_side = handle.clone();

        assert!(reader_side.is_active());
        handle.shutdown();
        assert!(!reader_side.is_active());
    }

    #[test]
    fn test_held_key_released_after_hold_window() {
        let (mut engine, _) = calm_engine(800.0);
        let mut driver = driver();
        engine.start();

        let t0 = Instant::now();
        driver.apply(&mut engine, HostInput::Press(Direction::Left), t0);
        driver.release_stale(&mut engine, t0 + Duration::from_millis(100));
        assert!(engine.input().is_held(Direction::Left));

        // auto-repeat refreshes the hold
        driver.apply(&mut engine, HostInput::Press(Direction::Left), t0 + Duration::from_millis(300));
        driver.release_stale(&mut engine, t0 + Duration::from_millis(500));
        assert!(engine.input().is_held(Direction::Left));

        driver.release_stale(&mut engine, t0 + Duration::from_millis(700));
        assert!(engine.input().is_idle());
    }

    #[test]
    fn test_switching_direction_and_release_all() {
        let (mut engine, _) = calm_engine(800.0);
        let mut driver = driver();
        engine.start();
        let now = Instant::now();

        driver.apply(&mut engine, HostInput::Press(Direction::Left), now);
        driver.apply(&mut engine, HostInput::Press(Direction::Right), now);
        assert!(!engine.input().is_held(Direction::Left));
        assert!(engine.input().is_held(Direction::Right));

        driver.apply(&mut engine, HostInput::ReleaseAll, now);
        assert!(engine.input().is_idle());
    }

    #[tokio::test]
    async fn test_scripted_collision_ends_session() {
        let (mut engine, reports) = calm_engine(850.0);
        engine.start();
        engine.push_snowflake(Snowflake::new(300.0, 790.0, 10.0, 5.0));

        let (_sender, mut inputs) = unbounded_channel();
        let mut presented = 0;
        let outcome = driver()
            .run(&mut engine, &mut inputs, |_| {
                presented += 1;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(outcome, SessionOutcome::GameOver(0));
        assert_eq!(presented, 1);
        assert_eq!(*reports.borrow(), vec![0]);
        assert_eq!(engine.canvas().frames(), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_still_drives_frames() {
        let (mut engine, reports) = calm_engine(850.0);
        engine.start();
        engine.push_snowflake(Snowflake::new(300.0, 790.0, 10.0, 5.0));

        let mut driver = FrameDriver::new(Duration::ZERO, Duration::from_millis(400));
        assert_eq!(driver.frame_interval, Duration::from_millis(1));

        let (_sender, mut inputs) = unbounded_channel();
        let outcome = driver.run(&mut engine, &mut inputs, |_| Ok(())).await.unwrap();

        assert_eq!(outcome, SessionOutcome::GameOver(0));
        assert_eq!(*reports.borrow(), vec![0]);
    }

    #[tokio::test]
    async fn test_quit_stops_without_game_over() {
        let (mut engine, reports) = calm_engine(800.0);
        engine.start();

        let (sender, mut inputs) = unbounded_channel();
        sender.send(HostInput::Press(Direction::Right)).unwrap();
        sender.send(HostInput::Quit).unwrap();

        let outcome = driver().run(&mut engine, &mut inputs, |_| Ok(())).await.unwrap();

        assert_eq!(outcome, SessionOutcome::Quit);
        assert_eq!(engine.phase(), GamePhase::Stopped);
        assert!(!engine.input_attached());
        assert!(reports.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_drain_consumes_everything_until_reader_exits() {
        let (sender, mut inputs) = unbounded_channel();
        let reader = tokio::spawn(async move {
            sender.send(HostInput::Press(Direction::Left)).unwrap();
            tokio::task::yield_now().await;
            sender.send(HostInput::Other).unwrap();
        });

        assert_eq!(drain_until_closed(&mut inputs).await, 2);
        reader.await.unwrap();
        assert!(inputs.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_present_ends_run_with_error() {
        let (mut engine, _) = calm_engine(800.0);
        engine.start();

        let (_sender, mut inputs) = unbounded_channel();
        let result = driver()
            .run(&mut engine, &mut inputs, |_| Err(crate::utils::GameError::canvas("terminal gone")))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_closed_input_stops_the_run() {
        let (mut engine, _) = calm_engine(800.0);
        engine.start();

        let (sender, mut inputs) = unbounded_channel::<HostInput>();
        drop(sender);

        let outcome = driver().run(&mut engine, &mut inputs, |_| Ok(())).await.unwrap();

        assert_eq!(outcome, SessionOutcome::InputClosed);
        assert!(!engine.is_running());
    }
}
