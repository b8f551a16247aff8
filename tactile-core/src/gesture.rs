//! # Gesture Intents
//!
//! Translates raw gesture measurements into a closed set of semantic intents.
//!
//! ## Gesture table
//!
//! | Gesture                  | Canvas mode          | Menu mode             |
//! |--------------------------|----------------------|-----------------------|
//! | Swipe (1 pointer)        | `MOVE_*`             | horizontal: `COLOR_MENU_NEXT` / `PREV`, vertical: dropped |
//! | Swipe left / right (2)   | `UNDO` / `REDO`      | dropped               |
//! | Tap                      | `INSPECT`            | `INSPECT`             |
//! | Double tap               | `PAINT`              | `COLOR_MENU_CONFIRM`  |
//! | Two-finger tap           | `ERASE`              | `COLOR_MENU_CANCEL`   |
//! | Two-finger double tap    | `HOME`               | dropped               |
//! | Hold >= 500 ms           | `MENU`               | `MENU`                |
//! | Hold >= 2000 ms          | `ANNOUNCE`           | `ANNOUNCE`            |
//!
//! The two hold thresholds are exclusive recognizers: a hold that reaches the
//! extended threshold never produces `MENU`.

use serde::{Deserialize, Serialize};

use crate::Direction;

/// Semantic intent derived from a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Move focus up.
    MoveUp,
    /// Move focus down.
    MoveDown,
    /// Move focus left.
    MoveLeft,
    /// Move focus right.
    MoveRight,
    /// Paint the focused cell with the selected color.
    Paint,
    /// Erase the focused cell.
    Erase,
    /// Report the focused cell without changing anything.
    Inspect,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
    /// Toggle the color menu.
    Menu,
    /// Jump focus to the top-left cell.
    Home,
    /// Announce the full context (extended hold).
    Announce,
    /// Next palette color.
    ColorMenuNext,
    /// Previous palette color.
    ColorMenuPrev,
    /// Keep the previewed color.
    ColorMenuConfirm,
    /// Restore the color from before the menu opened.
    ColorMenuCancel,
    /// Unrecognized; never dispatched.
    Unknown,
}

impl Intent {
    /// The move intent for a direction.
    #[must_use]
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::MoveUp,
            Direction::Down => Self::MoveDown,
            Direction::Left => Self::MoveLeft,
            Direction::Right => Self::MoveRight,
        }
    }

    /// Direction of a move intent.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveUp => Some(Direction::Up),
            Self::MoveDown => Some(Direction::Down),
            Self::MoveLeft => Some(Direction::Left),
            Self::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which surface currently owns gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Grid navigation and painting.
    Canvas,
    /// Color menu browsing.
    Menu,
}

/// Gesture thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Minimum pan speed (units per second) for a swipe.
    pub min_swipe_velocity: f32,
    /// Hold duration that toggles the menu.
    pub long_press_ms: u64,
    /// Hold duration that announces context.
    pub extended_press_ms: u64,
    /// Minimum gap between two processed intents.
    pub debounce_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_swipe_velocity: 300.0,
            long_press_ms: 500,
            extended_press_ms: 2000,
            debounce_ms: 200,
        }
    }
}

const fn one_pointer() -> u8 {
    1
}

/// Pan measurements at gesture end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanGesture {
    /// Horizontal translation, positive to the right.
    pub translation_x: f32,
    /// Vertical translation, positive downwards.
    pub translation_y: f32,
    /// Horizontal velocity.
    pub velocity_x: f32,
    /// Vertical velocity.
    pub velocity_y: f32,
    /// Number of fingers.
    #[serde(default = "one_pointer")]
    pub pointers: u8,
}

impl PanGesture {
    /// Single-pointer pan.
    #[must_use]
    pub const fn new(
        translation_x: f32,
        translation_y: f32,
        velocity_x: f32,
        velocity_y: f32,
    ) -> Self {
        Self {
            translation_x,
            translation_y,
            velocity_x,
            velocity_y,
            pointers: 1,
        }
    }

    /// Same pan with a different pointer count.
    #[must_use]
    pub const fn with_pointers(mut self, pointers: u8) -> Self {
        self.pointers = pointers;
        self
    }
}

/// A recognized raw gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureInput {
    /// Completed pan.
    Pan(PanGesture),
    /// Tap sequence.
    Tap {
        /// Consecutive taps (1 = single, 2 = double).
        count: u8,
        /// Number of fingers.
        #[serde(default = "one_pointer")]
        pointers: u8,
    },
    /// Completed hold.
    LongPress {
        /// Hold duration.
        duration_ms: u64,
    },
}

/// A gesture with the time it was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    /// The gesture.
    pub input: GestureInput,
    /// Milliseconds on a monotonic clock.
    pub timestamp_ms: u64,
}

impl GestureEvent {
    /// Create an event.
    #[must_use]
    pub const fn new(input: GestureInput, timestamp_ms: u64) -> Self {
        Self {
            input,
            timestamp_ms,
        }
    }
}

/// Swipe direction of a pan, or `None` if it is too slow or ambiguous.
///
/// Horizontal requires `|dx| > |dy|` and an angle below 45 degrees; vertical
/// requires `|dy| > |dx|` and an angle above 45 degrees. Exactly diagonal pans
/// are dropped.
#[must_use]
pub fn swipe_direction(pan: &PanGesture, config: &GestureConfig) -> Option<Direction> {
    let total_velocity = pan.velocity_x.hypot(pan.velocity_y);
    if total_velocity < config.min_swipe_velocity {
        return None;
    }
    let horizontal = pan.translation_x.abs();
    let vertical = pan.translation_y.abs();
    let angle = vertical.atan2(horizontal).to_degrees();
    if horizontal > vertical && angle < 45.0 {
        Some(if pan.translation_x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if vertical > horizontal && angle > 45.0 {
        Some(if pan.translation_y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        None
    }
}

/// Hold classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the long-press threshold.
    Short,
    /// Between the two thresholds.
    Long,
    /// At or past the extended threshold.
    Extended,
}

/// Classify a hold duration.
#[must_use]
pub const fn classify_press(duration_ms: u64, config: &GestureConfig) -> PressKind {
    if duration_ms >= config.extended_press_ms {
        PressKind::Extended
    } else if duration_ms >= config.long_press_ms {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// Recognizers that may claim the same input window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    /// Hold past the extended threshold.
    ExtendedPress,
    /// Hold past the long-press threshold.
    LongPress,
    /// Pan.
    Pan,
    /// Double tap.
    DoubleTap,
    /// Single tap.
    Tap,
}

/// Exclusivity table, highest priority first.
const RECOGNIZER_PRIORITY: [Recognizer; 5] = [
    Recognizer::ExtendedPress,
    Recognizer::LongPress,
    Recognizer::Pan,
    Recognizer::DoubleTap,
    Recognizer::Tap,
];

impl Recognizer {
    /// Recognizer that produced an input.
    #[must_use]
    pub const fn of(input: &GestureInput, config: &GestureConfig) -> Self {
        match input {
            GestureInput::Pan(_) => Self::Pan,
            GestureInput::Tap { count, .. } if *count >= 2 => Self::DoubleTap,
            GestureInput::Tap { .. } => Self::Tap,
            GestureInput::LongPress { duration_ms } => match classify_press(*duration_ms, config) {
                PressKind::Extended => Self::ExtendedPress,
                PressKind::Long | PressKind::Short => Self::LongPress,
            },
        }
    }

    /// Rank in the exclusivity table; lower wins.
    #[must_use]
    pub fn rank(self) -> usize {
        RECOGNIZER_PRIORITY
            .iter()
            .position(|r| *r == self)
            .unwrap_or(RECOGNIZER_PRIORITY.len())
    }
}

/// Map a gesture to an intent. Pure.
#[must_use]
pub fn map_gesture(input: &GestureInput, mode: InputMode, config: &GestureConfig) -> Intent {
    match (*input, mode) {
        (GestureInput::Pan(pan), _) => map_pan(&pan, mode, config),
        (GestureInput::Tap { count: 1, pointers: 1 }, _) => Intent::Inspect,
        (GestureInput::Tap { count: 2, pointers: 1 }, InputMode::Canvas) => Intent::Paint,
        (GestureInput::Tap { count: 2, pointers: 1 }, InputMode::Menu) => Intent::ColorMenuConfirm,
        (GestureInput::Tap { count: 1, pointers: 2 }, InputMode::Canvas) => Intent::Erase,
        (GestureInput::Tap { count: 1, pointers: 2 }, InputMode::Menu) => Intent::ColorMenuCancel,
        (GestureInput::Tap { count: 2, pointers: 2 }, InputMode::Canvas) => Intent::Home,
        (GestureInput::LongPress { duration_ms }, _) => match classify_press(duration_ms, config) {
            PressKind::Extended => Intent::Announce,
            PressKind::Long => Intent::Menu,
            PressKind::Short => Intent::Unknown,
        },
        _ => Intent::Unknown,
    }
}

fn map_pan(pan: &PanGesture, mode: InputMode, config: &GestureConfig) -> Intent {
    let Some(direction) = swipe_direction(pan, config) else {
        return Intent::Unknown;
    };
    match (pan.pointers, mode, direction) {
        (1, InputMode::Canvas, _) => Intent::from_direction(direction),
        (1, InputMode::Menu, Direction::Right) => Intent::ColorMenuNext,
        (1, InputMode::Menu, Direction::Left) => Intent::ColorMenuPrev,
        (2, InputMode::Canvas, Direction::Left) => Intent::Undo,
        (2, InputMode::Canvas, Direction::Right) => Intent::Redo,
        _ => Intent::Unknown,
    }
}

/// Real-time hold recognizer.
///
/// The extended intent fires from [`PressTracker::poll`] as soon as the hold
/// crosses its threshold; the long-press intent only fires on release, and only
/// if the extended one did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressTracker {
    started_at: Option<u64>,
    extended_fired: bool,
}

impl PressTracker {
    /// Finger down.
    pub fn begin(&mut self, timestamp_ms: u64) {
        self.started_at = Some(timestamp_ms);
        self.extended_fired = false;
    }

    /// Whether a hold is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Check an ongoing hold; returns `Announce` once when the extended
    /// threshold is crossed.
    pub fn poll(&mut self, now_ms: u64, config: &GestureConfig) -> Option<Intent> {
        let started = self.started_at?;
        if self.extended_fired || now_ms.saturating_sub(started) < config.extended_press_ms {
            return None;
        }
        self.extended_fired = true;
        Some(Intent::Announce)
    }

    /// Finger up.
    pub fn end(&mut self, timestamp_ms: u64, config: &GestureConfig) -> Option<Intent> {
        let started = self.started_at.take()?;
        if std::mem::take(&mut self.extended_fired) {
            return None;
        }
        match classify_press(timestamp_ms.saturating_sub(started), config) {
            PressKind::Extended => Some(Intent::Announce),
            PressKind::Long => Some(Intent::Menu),
            PressKind::Short => None,
        }
    }

    /// Abandon the hold (another recognizer claimed the input).
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.extended_fired = false;
    }
}

/// Stateful mapper adding debounce and recognizer arbitration to [`map_gesture`].
#[derive(Debug, Clone, Default)]
pub struct IntentMapper {
    config: GestureConfig,
    last_processed_ms: Option<u64>,
    press: PressTracker,
}

impl IntentMapper {
    /// Create a mapper.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_processed_ms: None,
            press: PressTracker::default(),
        }
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Time of the last intent that passed debounce.
    #[must_use]
    pub const fn last_processed_ms(&self) -> Option<u64> {
        self.last_processed_ms
    }

    fn is_debounced(&self, timestamp_ms: u64) -> bool {
        self.last_processed_ms
            .is_some_and(|last| timestamp_ms.saturating_sub(last) < self.config.debounce_ms)
    }

    fn accept(&mut self, intent: Intent, timestamp_ms: u64) -> Option<Intent> {
        if intent == Intent::Unknown {
            tracing::trace!("gesture dropped: no intent");
            return None;
        }
        if self.is_debounced(timestamp_ms) {
            tracing::trace!(?intent, timestamp_ms, "gesture debounced");
            return None;
        }
        self.last_processed_ms = Some(timestamp_ms);
        tracing::debug!(?intent, "intent recognized");
        Some(intent)
    }

    /// Map one gesture, applying debounce.
    pub fn process(&mut self, event: &GestureEvent, mode: InputMode) -> Option<Intent> {
        let intent = map_gesture(&event.input, mode, &self.config);
        self.accept(intent, event.timestamp_ms)
    }

    /// Resolve gestures that claimed the same input window; only the
    /// highest-priority recognizer is processed.
    pub fn resolve(&mut self, events: &[GestureEvent], mode: InputMode) -> Option<Intent> {
        let winner = events
            .iter()
            .min_by_key(|event| Recognizer::of(&event.input, &self.config).rank())?;
        self.process(winner, mode)
    }

    /// Finger down for a potential hold.
    pub fn press_began(&mut self, timestamp_ms: u64) {
        self.press.begin(timestamp_ms);
    }

    /// Check an ongoing hold.
    pub fn press_poll(&mut self, now_ms: u64) -> Option<Intent> {
        let intent = self.press.poll(now_ms, &self.config)?;
        self.accept(intent, now_ms)
    }

    /// Finger up after a hold.
    pub fn press_ended(&mut self, timestamp_ms: u64) -> Option<Intent> {
        let intent = self.press.end(timestamp_ms, &self.config)?;
        self.accept(intent, timestamp_ms)
    }

    /// Abandon an ongoing hold.
    pub fn press_cancelled(&mut self) {
        self.press.cancel();
    }

    /// Forget debounce and hold state.
    pub fn reset(&mut self) {
        self.last_processed_ms = None;
        self.press.cancel();
    }
}
