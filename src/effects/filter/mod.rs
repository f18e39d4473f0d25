mod biquad;
mod frequency_filter_node;
mod frequency_filter_processor;

pub use frequency_filter_node::FrequencyFilter;
