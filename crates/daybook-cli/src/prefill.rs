//! Background fetch that pre-fills the journal editor when its date changes.
//!
//! Each [`Prefill::request`] aborts the fetch in flight and bumps a
//! generation counter. Results are tagged with the generation they were
//! started under, and [`Prefill::poll`] drops any that are not current, so a
//! slow response for an old date can never overwrite a newer one.

use std::future::Future;

use chrono::NaiveDate;
use tokio::{sync::mpsc, task::JoinHandle};

/// A completed fetch for `date`. `Ok(None)` means nothing is stored.
#[derive(Debug)]
pub struct Fetched<T> {
  pub date:   NaiveDate,
  pub result: anyhow::Result<Option<T>>,
}

struct Message<T> {
  generation: u64,
  fetched:    Fetched<T>,
}

pub struct Prefill<T> {
  generation: u64,
  task:       Option<JoinHandle<()>>,
  tx:         mpsc::UnboundedSender<Message<T>>,
  rx:         mpsc::UnboundedReceiver<Message<T>>,
}

impl<T: Send + 'static> Prefill<T> {
  pub fn new() -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self { generation: 0, task: None, tx, rx }
  }

  /// Start fetching for `date`, superseding any earlier request.
  pub fn request<F>(&mut self, date: NaiveDate, fetch: F)
  where
    F: Future<Output = anyhow::Result<Option<T>>> + Send + 'static,
  {
    self.cancel();
    let generation = self.generation;
    let tx = self.tx.clone();
    tracing::debug!(%date, generation, "journal pre-fill requested");
    self.task = Some(tokio::spawn(async move {
      let result = fetch.await;
      // The receiver lives as long as `self`; a send error means it is gone.
      let _ = tx.send(Message { generation, fetched: Fetched { date, result } });
    }));
  }

  /// Abort the fetch in flight, if any, and invalidate its result.
  pub fn cancel(&mut self) {
    self.generation += 1;
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }

  /// Whether a current request has not yet been delivered.
  pub fn is_pending(&self) -> bool { self.task.is_some() }

  /// Non-blocking: the current request's result, if it has arrived.
  pub fn poll(&mut self) -> Option<Fetched<T>> {
    while let Ok(message) = self.rx.try_recv() {
      if let Some(fetched) = self.accept(message) {
        return Some(fetched);
      }
    }
    None
  }

  /// Wait for the current request's result. Returns `None` immediately when
  /// nothing is pending.
  #[cfg(test)]
  pub async fn next(&mut self) -> Option<Fetched<T>> {
    while self.is_pending() {
      let message = self.rx.recv().await?;
      if let Some(fetched) = self.accept(message) {
        return Some(fetched);
      }
    }
    None
  }

  fn accept(&mut self, message: Message<T>) -> Option<Fetched<T>> {
    if message.generation != self.generation {
      tracing::debug!(
        date = %message.fetched.date,
        generation = message.generation,
        "discarded stale journal pre-fill"
      );
      return None;
    }
    self.task = None;
    Some(message.fetched)
  }
}

impl<T> Drop for Prefill<T> {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[tokio::test]
  async fn delivers_current_result() {
    let mut prefill = Prefill::<String>::new();
    prefill.request(date("2024-01-01"), async { Ok(Some("entry".to_string())) });
    assert!(prefill.is_pending());

    let fetched = prefill.next().await.unwrap();
    assert_eq!(fetched.date, date("2024-01-01"));
    assert_eq!(fetched.result.unwrap().as_deref(), Some("entry"));
    assert!(!prefill.is_pending());
  }

  #[tokio::test]
  async fn newer_request_supersedes_slow_one() {
    let mut prefill = Prefill::<String>::new();
    prefill.request(date("2024-01-01"), async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      Ok(Some("old".to_string()))
    });
    prefill.request(date("2024-01-02"), async { Ok(None) });

    let fetched = prefill.next().await.unwrap();
    assert_eq!(fetched.date, date("2024-01-02"));
    assert!(fetched.result.unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(prefill.poll().is_none());
  }

  #[tokio::test]
  async fn stale_results_already_queued_are_dropped() {
    let mut prefill = Prefill::<String>::new();
    prefill.request(date("2024-01-01"), async { Ok(Some("first".to_string())) });
    // Let the first fetch finish and queue its message before superseding.
    tokio::time::sleep(Duration::from_millis(20)).await;
    prefill.request(date("2024-01-03"), async { Ok(Some("third".to_string())) });

    let fetched = prefill.next().await.unwrap();
    assert_eq!(fetched.date, date("2024-01-03"));
    assert_eq!(fetched.result.unwrap().as_deref(), Some("third"));
  }

  #[tokio::test]
  async fn cancel_discards_in_flight() {
    let mut prefill = Prefill::<String>::new();
    prefill.request(date("2024-01-01"), async { Ok(Some("x".to_string())) });
    prefill.cancel();
    assert!(!prefill.is_pending());
    assert!(prefill.next().await.is_none());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(prefill.poll().is_none());
  }

  #[tokio::test]
  async fn errors_are_delivered() {
    let mut prefill = Prefill::<String>::new();
    prefill.request(date("2024-01-01"), async { Err(anyhow::anyhow!("offline")) });
    let fetched = prefill.next().await.unwrap();
    assert!(fetched.result.is_err());
  }
}
