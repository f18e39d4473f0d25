mod echo;
mod filter;
mod gain;
mod generator;
mod tape_player;
mod utility;

pub use echo::Echo;
pub use filter::FrequencyFilter;
pub use gain::Gain;
pub use generator::Generator;
pub use generator::GeneratorSource;
pub use generator::Waveform;
pub use tape_player::TapePlayer;

use crossbeam::channel as Channel;
