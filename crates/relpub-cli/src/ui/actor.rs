//! Progress Actor - upload progress drawn from a dedicated thread
//!
//! The upload path only sends byte counts over a channel; the render thread
//! owns the terminal line and the [`ProgressState`]. It redraws on a fixed
//! cadence, so a fast upload never waits on the terminal and a stalled one
//! keeps its speed and remaining time current.

use super::progress::ProgressState;
use super::theme::BarStyle;
use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use relpub_core::io::ProgressSink;
use std::io::Write;
use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Instant;

/// Events sent to the render thread
#[derive(Debug)]
pub enum ProgressEvent {
    /// More bytes were transferred
    Advance(u64),
    /// Transfer over: clear the bar and exit
    Finish,
}

/// Handle to the progress render thread.
///
/// Implements [`ProgressSink`] so it can be attached to the upload reader
/// directly. [`ProgressSink::finish`] blocks until the bar is gone.
#[derive(Debug)]
pub struct TerminalProgress {
    sender: mpsc::Sender<ProgressEvent>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl TerminalProgress {
    /// Draw a bar for `total` bytes on `out`.
    pub fn spawn<W>(total: u64, style: BarStyle, out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || run_event_loop(&receiver, total, style, out));

        Self {
            sender,
            handle: Mutex::new(Some(handle)),
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn advance(&self, bytes: u64) {
        let _ = self.sender.send(ProgressEvent::Advance(bytes));
    }

    fn finish(&self) {
        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            let _ = self.sender.send(ProgressEvent::Finish);
            let _ = handle.join();
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Main loop of the render thread
fn run_event_loop<W: Write>(
    receiver: &mpsc::Receiver<ProgressEvent>,
    total: u64,
    style: BarStyle,
    mut out: W,
) {
    let refresh = style.refresh;
    let mut state = ProgressState::new(total, style, Instant::now());
    let mut drawn_at = Instant::now();

    loop {
        match receiver.recv_timeout(refresh) {
            Ok(ProgressEvent::Advance(bytes)) => {
                state.advance(bytes);
                if drawn_at.elapsed() < refresh {
                    continue;
                }
            }
            Ok(ProgressEvent::Finish) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                let _ = clear_line(&mut out);
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        state.sample(now);
        let _ = draw_line(&mut out, &state.line());
        drawn_at = now;
    }
}

fn draw_line<W: Write>(out: &mut W, line: &str) -> std::io::Result<()> {
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?
        .queue(Print(line))?;
    out.flush()
}

fn clear_line<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(MoveToColumn(0))?
        .queue(Clear(ClearType::CurrentLine))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    /// Writer that keeps everything for inspection.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_draws_then_clears_on_finish() {
        let out = Captured::default();
        let progress = TerminalProgress::spawn(2048, BarStyle::default(), out.clone());

        progress.advance(512);
        thread::sleep(Duration::from_millis(500));
        progress.finish();

        let text = out.text();
        assert!(text.contains("512 B / 2.00 KiB ["));
        assert!(text.ends_with("\u{1b}[2K"));
    }

    #[test]
    fn test_finish_is_idempotent() {
        let out = Captured::default();
        let progress = TerminalProgress::spawn(10, BarStyle::default(), out.clone());

        progress.advance(10);
        progress.finish();
        let after_first = out.text();
        progress.finish();
        drop(progress);

        assert_eq!(out.text(), after_first);
    }
}
