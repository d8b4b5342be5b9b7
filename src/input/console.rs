//! Console input capture
//!
//! Lines are read on a dedicated thread and posted to the main loop; the
//! reader never touches form state directly.

use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::app::LoopEvent;

/// Starts a thread that forwards every line of `reader` to `sender`
///
/// Posts [`LoopEvent::InputClosed`] at end of input or on a read error.
pub fn spawn_reader<R>(reader: R, sender: Sender<LoopEvent>) -> std::io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("console-reader".to_string())
        .spawn(move || forward_lines(reader, &sender))
}

fn forward_lines<R: BufRead>(reader: R, sender: &Sender<LoopEvent>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if sender.send(LoopEvent::Input(line)).is_err() {
                    debug!("Main loop gone; console reader stopping");
                    return;
                }
            }
            Err(err) => {
                warn!("Console read failed: {}", err);
                break;
            }
        }
    }
    let _ = sender.send(LoopEvent::InputClosed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn forwards_lines_then_closes() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_reader(Cursor::new("set x 10\nconvert\n"), tx).unwrap();
        handle.join().unwrap();

        let events: Vec<LoopEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                LoopEvent::Input("set x 10".to_string()),
                LoopEvent::Input("convert".to_string()),
                LoopEvent::InputClosed,
            ]
        );
    }
}
