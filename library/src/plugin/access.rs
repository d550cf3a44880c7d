//! Per-item input/output slots handed to `solve_instance`.

use crate::error::LibraryError;
use crate::evaluation::output::PinValue;
use crate::model::geometry::Line;
use crate::plugin::definition::ComponentDefinition;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolvePhase {
    /// First pass of a task-enabled solution: queue work, write nothing.
    PreSolve,
    /// Regular pass: collect queued work or compute directly, then write outputs.
    Solve,
}

#[derive(Clone, Debug)]
pub struct DataAccess {
    iteration: usize,
    input_names: Vec<String>,
    inputs: Vec<Option<PinValue>>,
    outputs: Vec<Option<PinValue>>,
}

impl DataAccess {
    /// Slots for `definition`. Missing trailing inputs are treated as unset.
    pub fn new(definition: &ComponentDefinition, iteration: usize, inputs: Vec<Option<PinValue>>) -> Self {
        let mut inputs = inputs;
        inputs.resize(definition.inputs.len(), None);
        Self {
            iteration,
            input_names: definition.inputs.iter().map(|pin| pin.name.clone()).collect(),
            inputs,
            outputs: vec![None; definition.outputs.len()],
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// `None` for unset pins and explicit `PinValue::None`.
    pub fn get_data(&self, index: usize) -> Option<&PinValue> {
        self.inputs
            .get(index)
            .and_then(|slot| slot.as_ref())
            .filter(|value| !value.is_none())
    }

    pub fn get_scalar(&self, index: usize) -> Result<f64, LibraryError> {
        self.get_data(index)
            .and_then(PinValue::as_scalar)
            .ok_or_else(|| self.missing(index))
    }

    pub fn get_integer(&self, index: usize) -> Result<i64, LibraryError> {
        self.get_data(index)
            .and_then(PinValue::as_integer)
            .ok_or_else(|| self.missing(index))
    }

    /// Returns `false` if the component has no output at `index`.
    pub fn set_data(&mut self, index: usize, value: impl Into<PinValue>) -> bool {
        match self.outputs.get_mut(index) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    pub fn set_data_list(&mut self, index: usize, lines: Vec<Line>) -> bool {
        self.set_data(index, PinValue::Lines(lines))
    }

    pub fn output(&self, index: usize) -> Option<&PinValue> {
        self.outputs.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn has_output(&self) -> bool {
        self.outputs.iter().any(Option::is_some)
    }

    pub fn clear_outputs(&mut self) {
        self.outputs.iter_mut().for_each(|slot| *slot = None);
    }

    fn missing(&self, index: usize) -> LibraryError {
        let name = self
            .input_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{}", index));
        LibraryError::missing_input(name)
    }
}
