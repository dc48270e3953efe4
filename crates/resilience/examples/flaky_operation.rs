//! Flaky operation example - retrying, watching events, cancelling

use resilience::{
    from_continuations, retry, CancelToken, EventBus, Retry, RetryPolicy, RetryRegistry, Settle,
};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let policy = RetryPolicy::from_json(r#"{ "interval_ms": 200, "max_attempts": 5 }"#)?;

    // Subscribe to events before starting
    let bus = Arc::new(EventBus::new());
    let mut event_rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            println!("📢 Event: attempt {} → {:?}", event.attempt, event.state);
        }
    });

    // Fails twice, then answers
    let flaky = |attempt: u32| async move {
        if attempt < 3 {
            Err(format!("service unavailable (attempt {})", attempt))
        } else {
            Ok("pong")
        }
    };
    let value = Retry::new(flaky, policy.clone())
        .with_events(bus.clone())
        .run()
        .await
        .into_result()?;
    println!("✅ Got {}", value);

    // Continuation style, never succeeds: the budget runs out
    let rejections = Arc::new(AtomicU32::new(0));
    let counter = rejections.clone();
    let always_down = from_continuations(move |settle: Settle<(), u32>| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        settle.reject(n);
    });
    let budget = policy.clone().with_max_attempts(NonZeroU32::new(3).ok_or("zero budget")?);
    match retry(always_down, budget).await.into_result() {
        Ok(()) => println!("unexpected success"),
        Err(err) => println!("❌ {} ({} failures kept)", err, err.history().len()),
    }

    // Unbounded retries stopped from outside
    let registry = RetryRegistry::new();
    let cancel = CancelToken::new();
    let never = |_attempt: u32| async { Err::<(), _>("still down") };
    let handle = registry.spawn(
        Retry::new(never, RetryPolicy::new().with_interval(Duration::from_millis(100)))
            .with_cancel(cancel.clone()),
    );

    tokio::time::sleep(Duration::from_millis(450)).await;
    println!("🛑 Cancelling {} running retries", registry.cancel_all());

    let outcome = handle.join().await?;
    println!(
        "Stopped after {} attempts, cancelled: {}",
        outcome.attempts(),
        cancel.is_cancelled()
    );

    Ok(())
}
