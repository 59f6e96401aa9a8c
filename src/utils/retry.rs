use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `max_attempts` times. After the n-th failure it waits
/// `base_delay * 2^(n-1)` unless that was the last attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                let delay = backoff_delay(base_delay, attempt);
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying after failure");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

pub fn backoff_delay(base: Duration, failed_attempt: u32) -> Duration {
    base * 2u32.saturating_pow(failed_attempt.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn delays_double_from_base() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(250));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let c = calls.clone();
        let result: Result<(), String> = retry_with_backoff(3, Duration::from_millis(250), move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err("boom".to_string())
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 250ms + 500ms of waiting, none after the final attempt
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(750));
        assert!(waited < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_first_success() {
        let result: Result<u32, String> = retry_with_backoff(3, Duration::from_millis(250), |attempt| async move {
            if attempt == 2 {
                Ok(attempt)
            } else {
                Err(format!("attempt {} failed", attempt))
            }
        })
        .await;
        tokio_test::assert_ok!(&result);
        assert_eq!(result.unwrap(), 2);
    }
}
