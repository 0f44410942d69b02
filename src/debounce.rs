//! Debounced re-processing
//!
//! Runs a job on the latest input once the input has been quiet for an idle
//! period. Every push restarts the idle timer, so a burst of edits costs one
//! run. Results are published on a `watch` channel. Dropping the
//! [`Debouncer`] stops its task; input still waiting for its idle period is
//! discarded.

use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub struct Debouncer<I, O> {
    input: mpsc::UnboundedSender<I>,
    output: watch::Receiver<Option<O>>,
    task: JoinHandle<()>,
}

impl<I, O> Debouncer<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    /// Spawn the debouncing task on the current tokio runtime
    pub fn spawn<F, Fut>(idle: Duration, job: F) -> Self
    where
        F: Fn(I) -> Fut + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<I>();
        let (output_tx, output_rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<I> = None;
            loop {
                let next = match pending.take() {
                    None => input_rx.recv().await,
                    Some(input) => {
                        tokio::select! {
                            // A newer input supersedes the pending one
                            next = input_rx.recv() => next,
                            _ = tokio::time::sleep(idle) => {
                                let output = job(input).await;
                                output_tx.send_replace(Some(output));
                                continue;
                            }
                        }
                    }
                };
                match next {
                    Some(input) => pending = Some(input),
                    None => break,
                }
            }
        });

        Self {
            input: input_tx,
            output: output_rx,
            task,
        }
    }

    /// Record new input and restart the idle timer
    pub fn push(&self, input: I) {
        if self.input.send(input).is_err() {
            tracing::debug!("debouncer task has stopped; input dropped");
        }
    }

    /// Receiver for job outputs; holds `None` until the first run completes
    pub fn subscribe(&self) -> watch::Receiver<Option<O>> {
        self.output.clone()
    }

    /// Wait until a new output is published
    pub async fn changed(&mut self) -> bool {
        self.output.changed().await.is_ok()
    }

    /// Latest output, if any run has completed
    pub fn latest(&self) -> Option<O>
    where
        O: Clone,
    {
        self.output.borrow().clone()
    }
}

impl<I, O> Drop for Debouncer<I, O> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_upper(runs: Arc<AtomicUsize>) -> impl Fn(String) -> std::future::Ready<String> {
        move |text: String| {
            runs.fetch_add(1, Ordering::SeqCst);
            std::future::ready(text.to_uppercase())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once_with_latest_input() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::spawn(Duration::from_millis(300), counting_upper(runs.clone()));

        debouncer.push("a".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("ab".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("abc".to_string());
        assert_eq!(debouncer.latest(), None);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(debouncer.latest(), Some("ABC".to_string()));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_run_separately() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer =
            Debouncer::spawn(Duration::from_millis(300), counting_upper(runs.clone()));

        debouncer.push("one".to_string());
        assert!(debouncer.changed().await);
        assert_eq!(debouncer.latest(), Some("ONE".to_string()));

        debouncer.push("two".to_string());
        assert!(debouncer.changed().await);
        assert_eq!(debouncer.latest(), Some("TWO".to_string()));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_idle_period() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::spawn(Duration::from_millis(300), counting_upper(runs.clone()));
        debouncer.push("x".to_string());
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
