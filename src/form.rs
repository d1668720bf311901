//! The new-cycle form: two text fields, their validation, and the submit gate.

use crate::cycle::{MAX_MINUTES, MIN_MINUTES, NewCycle};

pub const TASK_REQUIRED: &str = "Informe a tarefa";
pub const MINUTES_TOO_SHORT: &str = "O ciclo precisa ser maior que 5 minutos.";
pub const MINUTES_TOO_LONG: &str = "O ciclo precisa ser menor que 60 minutos.";

const MINUTES_STEP: u32 = 5;
const MAX_MINUTES_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Task,
    MinutesAmount,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Task => Self::MinutesAmount,
            Self::MinutesAmount => Self::Task,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub task: Option<&'static str>,
    pub minutes_amount: Option<&'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.minutes_amount.is_none()
    }
}

pub fn validate_task(task: &str) -> Result<String, &'static str> {
    let task = task.trim();
    if task.is_empty() {
        Err(TASK_REQUIRED)
    } else {
        Ok(task.to_string())
    }
}

pub fn validate_minutes(minutes: u32) -> Result<u32, &'static str> {
    if minutes < MIN_MINUTES {
        Err(MINUTES_TOO_SHORT)
    } else if minutes > MAX_MINUTES {
        Err(MINUTES_TOO_LONG)
    } else {
        Ok(minutes)
    }
}

pub struct NewCycleForm {
    task: String,
    minutes_amount: String,
    default_minutes: Option<u32>,
    focus: Field,
    errors: ValidationErrors,
    submitted: bool,
}

impl NewCycleForm {
    pub fn new(default_minutes: Option<u32>) -> Self {
        Self {
            task: String::new(),
            minutes_amount: default_minutes.map(|m| m.to_string()).unwrap_or_default(),
            default_minutes,
            focus: Field::Task,
            errors: ValidationErrors::default(),
            submitted: false,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_input(&self) -> &str {
        &self.minutes_amount
    }

    /// Empty input reads as zero, the form's initial value, so a blank field
    /// fails with the "maior que 5 minutos" range message rather than a
    /// separate "required" one.
    pub fn minutes_value(&self) -> u32 {
        self.minutes_amount.parse().unwrap_or(0)
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.task.trim().is_empty()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Field::Task => self.task.push(c),
            Field::MinutesAmount => {
                if c.is_ascii_digit() && self.minutes_amount.len() < MAX_MINUTES_DIGITS {
                    self.minutes_amount.push(c);
                }
            }
        }
        self.revalidate();
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Task => self.task.pop(),
            Field::MinutesAmount => self.minutes_amount.pop(),
        };
        self.revalidate();
    }

    /// Moves the minutes by one step, snapping into the allowed range.
    pub fn step_minutes(&mut self, up: bool) {
        let current = self.minutes_value();
        let next = if up {
            (current / MINUTES_STEP + 1) * MINUTES_STEP
        } else {
            current.saturating_sub(1) / MINUTES_STEP * MINUTES_STEP
        };
        self.minutes_amount = next.clamp(MIN_MINUTES, MAX_MINUTES).to_string();
        self.revalidate();
    }

    /// Replaces the task with `suggestion` when it extends what was typed.
    pub fn complete_task(&mut self, suggestion: &str) {
        if suggestion.to_lowercase().starts_with(&self.task.to_lowercase()) {
            self.task = suggestion.to_string();
            self.revalidate();
        }
    }

    pub fn validate(&self) -> Result<NewCycle, ValidationErrors> {
        let task = validate_task(&self.task);
        let minutes = validate_minutes(self.minutes_value());

        match (task, minutes) {
            (Ok(task), Ok(minutes_amount)) => Ok(NewCycle { task, minutes_amount }),
            (task, minutes) => Err(ValidationErrors {
                task: task.err(),
                minutes_amount: minutes.err(),
            }),
        }
    }

    /// Returns the validated cycle and clears the fields, or records the errors.
    pub fn submit(&mut self) -> Option<NewCycle> {
        if self.is_submit_disabled() {
            return None;
        }

        self.submitted = true;
        match self.validate() {
            Ok(new_cycle) => {
                self.reset();
                Some(new_cycle)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.task.clear();
        self.minutes_amount = self.default_minutes.map(|m| m.to_string()).unwrap_or_default();
        self.focus = Field::Task;
        self.errors = ValidationErrors::default();
        self.submitted = false;
    }

    fn revalidate(&mut self) {
        if self.submitted {
            self.errors = self.validate().err().unwrap_or_default();
        }
    }
}
