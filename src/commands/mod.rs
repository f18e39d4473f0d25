mod command;
mod id;

pub use command::Command;
pub use command::ParameterChangeRequest;
pub use id::Id;
