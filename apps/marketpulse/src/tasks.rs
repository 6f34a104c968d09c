use marketpulse_application::feed::SharedSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub enum TaskEvent {
    Input(crossterm::event::Event),
    Snapshot(SharedSnapshot),
}

/// Terminal reads block, so they run on a plain thread rather than the runtime.
pub fn spawn_input_reader(tx: mpsc::UnboundedSender<TaskEvent>) {
    std::thread::spawn(move || {
        while let Ok(event) = crossterm::event::read() {
            if tx.send(TaskEvent::Input(event)).is_err() {
                break;
            }
        }
    });
}

/// Relays every published snapshot into the UI event queue until either side goes away.
pub fn forward_feed(
    mut rx: watch::Receiver<SharedSnapshot>,
    tx: mpsc::UnboundedSender<TaskEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if tx.send(TaskEvent::Snapshot(snapshot)).is_err() {
                break;
            }
        }
    })
}
