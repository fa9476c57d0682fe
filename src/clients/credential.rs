use std::{fmt, future::Future, time::Duration};

use log::{debug, warn};
use tokio::{task::JoinHandle, time::Instant};

use crate::clients::errors::Result;

/// Renew this long before the token actually expires.
pub const RENEWAL_MARGIN: Duration = Duration::from_secs(30);
/// Floor for the renewal delay when a token lives shorter than the margin.
pub const MIN_RENEWAL_DELAY: Duration = Duration::from_secs(1);

/// An access token together with the moment it stops being valid.
#[derive(Clone)]
pub struct AccessCredential {
    access_token: String,
    expires_in: Duration,
    obtained_at: Instant,
}

impl AccessCredential {
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        AccessCredential {
            access_token: access_token.into(),
            expires_in,
            obtained_at: Instant::now(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    pub fn expires_at(&self) -> Instant {
        self.obtained_at + self.expires_in
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at()
    }

    /// How long to wait before renewing this credential.
    pub fn renewal_delay(&self) -> Duration {
        renewal_delay(self.expires_in)
    }
}

// Keep the token itself out of logs
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

pub fn renewal_delay(expires_in: Duration) -> Duration {
    match expires_in.checked_sub(RENEWAL_MARGIN) {
        Some(delay) if !delay.is_zero() => delay,
        _ => MIN_RENEWAL_DELAY,
    }
}

/// Owner of a running auto-renew task. The task is aborted on
/// [`cancel`](RenewalHandle::cancel) or when the handle is dropped.
#[derive(Debug)]
pub struct RenewalHandle {
    task: JoinHandle<()>,
}

impl RenewalHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RenewalHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a renewal loop on the current tokio runtime.
///
/// `renew` is called after `first_delay` and returns the delay until the
/// next renewal, or `None` when there is nothing left to renew. The loop
/// stops at the first failure.
pub fn spawn_renewal<F, Fut>(first_delay: Duration, mut renew: F) -> RenewalHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<Duration>>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut delay = first_delay;
        loop {
            debug!("Next access token renewal in {} seconds", delay.as_secs());
            tokio::time::sleep(delay).await;
            match renew().await {
                Ok(Some(next)) => delay = next,
                Ok(None) => break,
                Err(e) => {
                    warn!("Access token renewal failed, auto-renew stopped: {e}");
                    break;
                }
            }
        }
    });
    RenewalHandle { task }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::clients::errors::Error;

    #[test]
    fn renewal_delay_keeps_a_margin() {
        assert_eq!(renewal_delay(Duration::from_secs(3600)), Duration::from_secs(3570));
        assert_eq!(renewal_delay(Duration::from_secs(31)), Duration::from_secs(1));
    }

    #[test]
    fn short_lived_tokens_renew_after_one_second() {
        assert_eq!(renewal_delay(Duration::from_secs(10)), MIN_RENEWAL_DELAY);
        assert_eq!(renewal_delay(Duration::from_secs(30)), MIN_RENEWAL_DELAY);
        assert_eq!(renewal_delay(Duration::ZERO), MIN_RENEWAL_DELAY);
    }

    #[test]
    fn debug_output_hides_token() {
        let credential = AccessCredential::new("secret-token", Duration::from_secs(10));
        assert!(!format!("{credential:?}").contains("secret-token"));
    }

    #[tokio::test(start_paused = true)]
    async fn credential_expires_after_its_lifetime() {
        let credential = AccessCredential::new("xxx", Duration::from_secs(10));
        assert!(!credential.is_expired());
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(credential.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn renews_on_schedule_until_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = spawn_renewal(Duration::from_secs(10), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Duration::from_secs(10)))
            }
        });

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_renewal_stops_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = spawn_renewal(Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::UpstreamError("token endpoint down".into()))
            }
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn renewal_ends_when_nothing_is_left_to_renew() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = spawn_renewal(Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_renewal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = spawn_renewal(Duration::from_secs(5), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Duration::from_secs(5)))
            }
        });
        drop(handle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
