//! Pointer and keyboard input.

use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use sightline_protocols::{ActionKind, Actuator, ActuatorError, PointerSource};
use tracing::debug;

/// Gap between the clicks of a double-click, and between click and typing.
const INPUT_GAP: Duration = Duration::from_millis(50);

/// One primitive input operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputStep {
    MoveTo(i32, i32),
    Click(MouseButton),
    Pause(Duration),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        }
    }
}

/// Primitive steps for an action at `(x, y)`.
pub fn plan(action: &ActionKind, x: i32, y: i32) -> Vec<InputStep> {
    let mut steps = vec![InputStep::MoveTo(x, y)];
    match action {
        ActionKind::Click => steps.push(InputStep::Click(MouseButton::Left)),
        ActionKind::RightClick => steps.push(InputStep::Click(MouseButton::Right)),
        ActionKind::DoubleClick => steps.extend([
            InputStep::Click(MouseButton::Left),
            InputStep::Pause(INPUT_GAP),
            InputStep::Click(MouseButton::Left),
        ]),
        ActionKind::Type(text) => steps.extend([
            InputStep::Click(MouseButton::Left),
            InputStep::Pause(INPUT_GAP),
            InputStep::Text(text.clone()),
        ]),
    }
    steps
}

fn connect() -> Result<Enigo, ActuatorError> {
    Enigo::new(&Settings::default()).map_err(|e| ActuatorError::Unavailable(e.to_string()))
}

fn execute(steps: &[InputStep]) -> Result<(), ActuatorError> {
    let mut enigo = connect()?;
    for step in steps {
        let result = match step {
            InputStep::MoveTo(x, y) => enigo.move_mouse(*x, *y, Coordinate::Abs),
            InputStep::Click(button) => enigo.button((*button).into(), Direction::Click),
            InputStep::Text(text) => enigo.text(text),
            InputStep::Pause(gap) => {
                thread::sleep(*gap);
                Ok(())
            }
        };
        result.map_err(|e| ActuatorError::Failed(format!("{step:?}: {e}")))?;
    }
    Ok(())
}

/// [`Actuator`] and [`PointerSource`] over the system input devices.
///
/// Input backends are blocking, so every call runs on the blocking pool.
#[derive(Debug, Default, Clone)]
pub struct EnigoActuator;

impl EnigoActuator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Actuator for EnigoActuator {
    async fn perform(&self, action: &ActionKind, x: i32, y: i32) -> Result<(), ActuatorError> {
        let steps = plan(action, x, y);
        debug!(action = action.verb(), x, y, "Performing input");
        tokio::task::spawn_blocking(move || execute(&steps))
            .await
            .map_err(|e| ActuatorError::Failed(e.to_string()))?
    }
}

#[async_trait]
impl PointerSource for EnigoActuator {
    async fn position(&self) -> Result<(i32, i32), ActuatorError> {
        tokio::task::spawn_blocking(|| {
            connect()?
                .location()
                .map_err(|e| ActuatorError::Failed(e.to_string()))
        })
        .await
        .map_err(|e| ActuatorError::Failed(e.to_string()))?
    }
}
