use ckb_types::packed::{Byte32, CellOutput, Script};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// A script group is defined as scripts that share the same hash.
///
/// A script group will only be executed once per transaction, the
/// script itself should check against all inputs/outputs in its group
/// if needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptGroup {
    /// The script.
    ///
    /// A script group is a group of input and output cells that share the same script.
    pub script: Script,
    /// The script group type.
    pub group_type: ScriptGroupType,
    /// Indices of input cells.
    pub input_indices: Vec<usize>,
    /// Indices of output cells.
    pub output_indices: Vec<usize>,
}

impl ScriptGroup {
    /// Creates a new script group struct.
    pub fn new(script: &Script, group_type: ScriptGroupType) -> Self {
        Self {
            group_type,
            script: script.to_owned(),
            input_indices: vec![],
            output_indices: vec![],
        }
    }

    /// Creates a lock script group.
    pub fn from_lock_script(script: &Script) -> Self {
        Self::new(script, ScriptGroupType::Lock)
    }

    /// Creates a type script group.
    pub fn from_type_script(script: &Script) -> Self {
        Self::new(script, ScriptGroupType::Type)
    }

    /// The hash of the group script.
    pub fn script_hash(&self) -> Byte32 {
        self.script.calc_script_hash()
    }

    /// The witness slot owned by this group: the witness at its first input.
    ///
    /// Groups touching outputs only have no witness slot.
    pub fn witness_index(&self) -> Option<usize> {
        self.input_indices.first().copied()
    }

    /// Whether the input at `index` belongs to this group.
    pub fn contains_input(&self, index: usize) -> bool {
        self.input_indices.contains(&index)
    }
}

/// The script group type.
///
/// A cell can have a lock script and an optional type script. Even they reference the same script,
/// lock script and type script will not be grouped together.
#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ScriptGroupType {
    /// Lock script group.
    Lock,
    /// Type script group.
    Type,
}

impl fmt::Display for ScriptGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptGroupType::Lock => write!(f, "Lock"),
            ScriptGroupType::Type => write!(f, "Type"),
        }
    }
}

/// Partitions the cells of a transaction into script groups.
///
/// Groups keep the order in which their script is first seen: inputs are visited in order, the
/// lock script of a cell before its type script, then the type scripts of the outputs. Two cells
/// share a group iff their scripts are structurally equal, which is checked by the script hash.
#[derive(Clone, Debug, Default)]
pub struct ScriptGroups {
    groups: Vec<ScriptGroup>,
    positions: HashMap<(ScriptGroupType, Byte32), usize>,
}

impl ScriptGroups {
    /// Creates an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies the cells consumed by the inputs and the created outputs.
    pub fn classify<'a, I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator<Item = &'a CellOutput>,
        O: IntoIterator<Item = &'a CellOutput>,
    {
        let mut groups = Self::new();
        for (index, cell) in inputs.into_iter().enumerate() {
            groups.add_input(index, cell);
        }
        for (index, output) in outputs.into_iter().enumerate() {
            groups.add_output(index, output);
        }
        groups
    }

    /// Adds the input at `index` which consumes `cell`.
    pub fn add_input(&mut self, index: usize, cell: &CellOutput) {
        self.entry(&cell.lock(), ScriptGroupType::Lock)
            .input_indices
            .push(index);
        if let Some(type_script) = cell.type_().to_opt() {
            self.entry(&type_script, ScriptGroupType::Type)
                .input_indices
                .push(index);
        }
    }

    /// Adds the output at `index`.
    ///
    /// Lock scripts do not run for outputs, so only the type script is grouped.
    pub fn add_output(&mut self, index: usize, output: &CellOutput) {
        if let Some(type_script) = output.type_().to_opt() {
            self.entry(&type_script, ScriptGroupType::Type)
                .output_indices
                .push(index);
        }
    }

    fn entry(&mut self, script: &Script, group_type: ScriptGroupType) -> &mut ScriptGroup {
        let key = (group_type, script.calc_script_hash());
        let position = match self.positions.get(&key) {
            Some(position) => *position,
            None => {
                self.groups.push(ScriptGroup::new(script, group_type));
                self.positions.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }

    /// Finds the group of a script in the given role.
    pub fn find(&self, script: &Script, group_type: ScriptGroupType) -> Option<&ScriptGroup> {
        self.positions
            .get(&(group_type, script.calc_script_hash()))
            .map(|position| &self.groups[*position])
    }

    /// Iterates the groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptGroup> {
        self.groups.iter()
    }

    /// The number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there is no group at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the groups in first-seen order.
    pub fn into_vec(self) -> Vec<ScriptGroup> {
        self.groups
    }
}

impl AsRef<[ScriptGroup]> for ScriptGroups {
    fn as_ref(&self) -> &[ScriptGroup] {
        &self.groups
    }
}
