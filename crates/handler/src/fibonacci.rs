use crate::error::{HandlerError, Result};
use std::collections::TryReserveError;

/// Fibonacci numbers counted with `f(0) = f(1) = 1`.
///
/// Deliberately the naive evaluation: every leaf of the call tree is visited, so cost grows
/// exponentially with `n` and nothing here bounds it. Pending calls are kept on the heap rather
/// than the thread stack, so depth is limited by memory only. Additions wrap.
pub fn fibonacci(n: u32) -> std::result::Result<u64, TryReserveError> {
    let mut pending = Vec::new();
    pending.try_reserve(1)?;
    pending.push(n);

    let mut sum = 0u64;
    while let Some(m) = pending.pop() {
        if m < 2 {
            sum = sum.wrapping_add(1);
            continue;
        }
        pending.try_reserve(2)?;
        pending.push(m - 1);
        pending.push(m - 2);
    }
    Ok(sum)
}

/// Run [`fibonacci`] on a dedicated thread and wait for it without holding an async worker.
///
/// If the caller stops waiting, the thread still runs to completion and its result is dropped.
pub async fn compute(number: u32) -> Result<u64> {
    let failed = |message: String| HandlerError::Compute { number, message };

    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::Builder::new()
        .name("fibonacci".to_string())
        .spawn(move || {
            let _ = tx.send(fibonacci(number));
        })
        .map_err(|e| failed(format!("spawn worker thread: {e}")))?;

    rx.await
        .map_err(|_| failed("worker thread exited without a result".to_string()))?
        .map_err(|e| failed(e.to_string()))
}
