use std::thread;

use crossbeam::channel::Receiver;

use super::Dsp;

pub enum GarbageCollectionCommand {
    DisposeDsp(Box<Dsp>),
}

/// Drop DSPs that were removed from the graph away from the audio thread
///
/// The collector stops once every sender has been dropped.
pub fn run_garbage_collector(receive_channel: Receiver<GarbageCollectionCommand>) {
    let spawn_result = thread::Builder::new()
        .name(String::from("pianola-gc"))
        .spawn(move || {
            for command in receive_channel.iter() {
                handle_garbage_collection_command(command);
            }
        });

    if let Err(error) = spawn_result {
        tracing::error!(?error, "Unable to start the garbage collector");
    }
}

fn handle_garbage_collection_command(command: GarbageCollectionCommand) {
    match command {
        GarbageCollectionCommand::DisposeDsp(dsp) => {
            tracing::debug!(id = ?dsp.get_id(), "Disposing DSP");
        }
    }
}
