use crate::app::TuiMsg;
use crossterm::event;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Start the terminal input reader and the spinner ticker.
///
/// The reader is one blocking thread polling crossterm; it re-checks `cancel`
/// between polls. The returned handle belongs to the reader so callers can
/// wait for the terminal to be released before restoring it.
pub fn spawn_feeders(tx: mpsc::Sender<TuiMsg>, cancel: CancellationToken) -> JoinHandle<()> {
    let tick_tx = tx.clone();
    let tick_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = tick_cancel.cancelled() => break,
                _ = interval.tick() => {
                    let _ = tick_tx.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            let ready = match event::poll(POLL_INTERVAL) {
                Ok(ready) => ready,
                Err(err) => {
                    let _ = tx.blocking_send(TuiMsg::InputError(err.to_string()));
                    break;
                }
            };
            if !ready {
                continue;
            }
            match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(TuiMsg::Input(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.blocking_send(TuiMsg::InputError(err.to_string()));
                    break;
                }
            }
        }
    })
}
