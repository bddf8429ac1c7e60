//! Bounded retry for operations whose *successful* result may still be unsatisfying.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryOutcome<T> {
    pub value: T,
    /// Number of attempts actually made, 1-based.
    pub attempts: u32,
    /// Whether `value` passed the acceptance check.
    pub satisfied: bool,
}

/// Runs `op` up to `max_attempts` times (at least once), stopping at the first
/// result accepted by `is_satisfied`.
///
/// When no result is accepted, the last successful one is returned. An error
/// is returned only when no attempt succeeded at all.
pub async fn retry_until<T, E, F, Fut, P>(
    max_attempts: u32,
    mut op: F,
    is_satisfied: P,
) -> Result<RetryOutcome<T>, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut latest: Option<T> = None;
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) if is_satisfied(&value) => {
                return Ok(RetryOutcome {
                    value,
                    attempts: attempt,
                    satisfied: true,
                });
            }
            Ok(value) => {
                if attempt >= max_attempts {
                    return Ok(RetryOutcome {
                        value,
                        attempts: attempt,
                        satisfied: false,
                    });
                }
                warn!("Attempt {attempt}/{max_attempts} unsatisfactory, retrying");
                latest = Some(value);
            }
            Err(e) => {
                if attempt >= max_attempts {
                    return match latest {
                        Some(value) => {
                            warn!("Final attempt {attempt} failed ({e}), keeping earlier result");
                            Ok(RetryOutcome {
                                value,
                                attempts: attempt,
                                satisfied: false,
                            })
                        }
                        None => Err(e),
                    };
                }
                warn!("Attempt {attempt}/{max_attempts} failed: {e}, retrying");
            }
        }
        attempt += 1;
    }
}
