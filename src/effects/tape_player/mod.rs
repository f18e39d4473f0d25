mod tape_player_event;
mod tape_player_node;
mod tape_player_processor;

pub use tape_player_node::TapePlayer;
