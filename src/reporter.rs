use ndarray::ArrayView2;

/// Sink for training observations, injected into the
/// [`Monitor`](crate::monitor::Monitor).
///
/// The monitor pushes scalar time series (reward, steps, loss, epsilon)
/// keyed by episode or step index, plus optional rendered frames and
/// free-form progress notes. All methods are infallible: a reporter that
/// cannot deliver its output drops it rather than disturbing training.
pub trait Reporter {
    /// Record one point of a named scalar series.
    fn scalar(&mut self, tag: &str, index: usize, value: f32) {
        let _ = (tag, index, value);
    }

    /// Receive a rendered grayscale frame.
    fn frame(&mut self, index: usize, frame: ArrayView2<f32>) {
        let _ = (index, frame);
    }

    /// Free-form progress message.
    fn note(&mut self, message: &str) {
        let _ = message;
    }
}

/// Discards everything.
#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Writes notes and scalars to stdout.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn scalar(&mut self, tag: &str, index: usize, value: f32) {
        println!("[{:>6}] {}: {:.4}", index, tag, value);
    }

    fn note(&mut self, message: &str) {
        println!("{}", message);
    }
}
