//! Pin and component definitions shown to the host.

use serde::{Deserialize, Serialize};

/// Data carried by a pin.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PinDataType {
    /// Floating point scalar (f64)
    Scalar,
    /// Integer value (i64)
    Integer,
    /// Line segment
    Line,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PinDirection {
    Input,
    Output,
}

/// Whether the pin consumes/produces a single item or a whole list.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PinAccess {
    Item,
    List,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PinDefinition {
    /// Display name (e.g. "Branch Angle")
    pub name: String,
    /// Short label drawn on the component (e.g. "BA")
    pub nickname: String,
    pub description: String,
    pub direction: PinDirection,
    pub data_type: PinDataType,
    pub access: PinAccess,
}

impl PinDefinition {
    pub fn input(name: &str, nickname: &str, data_type: PinDataType) -> Self {
        Self {
            name: name.to_string(),
            nickname: nickname.to_string(),
            description: String::new(),
            direction: PinDirection::Input,
            data_type,
            access: PinAccess::Item,
        }
    }

    pub fn output(name: &str, nickname: &str, data_type: PinDataType) -> Self {
        Self {
            direction: PinDirection::Output,
            ..Self::input(name, nickname, data_type)
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn as_list(mut self) -> Self {
        self.access = PinAccess::List;
        self
    }
}

/// Everything the host needs to place a component: identity, placement in
/// the toolbar and its pins.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ComponentDefinition {
    /// Unique identifier (e.g. "branching_tree.basic")
    pub id: String,
    pub display_name: String,
    pub nickname: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub inputs: Vec<PinDefinition>,
    pub outputs: Vec<PinDefinition>,
}

impl ComponentDefinition {
    pub fn new(id: &str, display_name: &str, nickname: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            nickname: nickname.to_string(),
            category: String::new(),
            subcategory: String::new(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_placement(mut self, category: &str, subcategory: &str) -> Self {
        self.category = category.to_string();
        self.subcategory = subcategory.to_string();
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PinDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PinDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|pin| pin.name == name)
    }
}
