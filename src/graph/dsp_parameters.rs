use crate::{commands::Id, parameter::RealtimeAudioParameter};

/// The realtime parameters owned by one DSP
///
/// Nodes have one or two parameters, so they're kept in a list rather than a
/// map.
pub struct DspParameters {
    parameters: Vec<RealtimeAudioParameter>,
}

impl DspParameters {
    pub fn new(parameters: impl IntoIterator<Item = RealtimeAudioParameter>) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    /// Values of parameter `id` for the first `frame_count` frames of the block
    ///
    /// Panics if the DSP doesn't own the parameter, which is a wiring bug in
    /// the node that created it.
    pub fn get_parameter_values(&self, id: Id, frame_count: usize) -> &[f64] {
        let values = self
            .find(id)
            .unwrap_or_else(|| panic!("DSP has no parameter {id:?}"))
            .get_values();

        &values[..frame_count.min(values.len())]
    }

    pub fn get_parameter_mut(&mut self, id: Id) -> Option<&mut RealtimeAudioParameter> {
        self.parameters
            .iter_mut()
            .find(|parameter| parameter.get_id() == id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RealtimeAudioParameter> {
        self.parameters.iter_mut()
    }

    fn find(&self, id: Id) -> Option<&RealtimeAudioParameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.get_id() == id)
    }
}
