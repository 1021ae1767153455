use std::future::Future;
use std::time::Duration;

/// Progress lines cycled while the recording is being analyzed.
pub const LOADING_MESSAGES: [&str; 5] = [
    "Uploading your presentation...",
    "Analyzing speech patterns...",
    "Detecting filler words...",
    "Evaluating tone and confidence...",
    "Generating feedback report...",
];

pub const MESSAGE_INTERVAL: Duration = Duration::from_secs(3);

pub fn loading_message(tick: usize) -> &'static str {
    LOADING_MESSAGES[tick % LOADING_MESSAGES.len()]
}

/// Drive `work` to completion, calling `on_message` with the next progress
/// line every `interval` (the first one immediately).
pub async fn with_progress<F, T>(work: F, interval: Duration, mut on_message: impl FnMut(&str)) -> T
where
    F: Future<Output = T>,
{
    tokio::pin!(work);
    let mut ticker = tokio::time::interval(interval);
    let mut tick = 0usize;

    loop {
        tokio::select! {
            out = &mut work => return out,
            _ = ticker.tick() => {
                on_message(loading_message(tick));
                tick += 1;
            }
        }
    }
}
