use dmxgate_core::{ArtNetGateway, MemorySink, DEFAULT_FPS, HEADER_LEN};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn memory_gateway(count: usize, default_level: u8) -> (ArtNetGateway, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let gateway = ArtNetGateway::with_sink(sink.clone(), default_level, count);
    (gateway, sink)
}

/// Level of `channel` (1-based) in every recorded frame
fn channel_history(sink: &MemorySink, channel: usize) -> Vec<u8> {
    sink.frames()
        .iter()
        .map(|frame| frame[HEADER_LEN + channel - 1])
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_one_second_fade_takes_forty_steps() {
    let (gateway, sink) = memory_gateway(512, 0);

    let outcome = gateway
        .fade(&[1], 200u8, Duration::from_secs(1), DEFAULT_FPS)
        .await;

    assert_eq!(outcome.steps, 40);
    assert_eq!(outcome.frames_sent, 40);
    assert_eq!(gateway.get_channel_level(1), 200);

    let history = channel_history(&sink, 1);
    let expected: Vec<u8> = (1..=40).map(|i| (i * 5) as u8).collect();
    assert_eq!(history, expected);
    assert!(history.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test(start_paused = true)]
async fn test_fade_keeps_frame_cadence() {
    let (gateway, _sink) = memory_gateway(512, 0);
    let start = Instant::now();

    gateway
        .fade(&[1], 255u8, Duration::from_secs(1), DEFAULT_FPS)
        .await;

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_millis(1100));
}

#[tokio::test(start_paused = true)]
async fn test_downward_fade_is_monotonic() {
    let (gateway, sink) = memory_gateway(16, 255);

    let outcome = gateway
        .fade(&[4], 0u8, Duration::from_millis(750), DEFAULT_FPS)
        .await;

    assert_eq!(outcome.steps, 30);
    assert_eq!(gateway.get_channel_level(4), 0);
    let history = channel_history(&sink, 4);
    assert!(history.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(history.last(), Some(&0));
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_snaps_in_one_step() {
    let (gateway, sink) = memory_gateway(8, 0);

    let outcome = gateway
        .fade(&[2, 3], [10u8, 250], Duration::ZERO, DEFAULT_FPS)
        .await;

    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.frames_sent, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(gateway.get_channel_level(2), 10);
    assert_eq!(gateway.get_channel_level(3), 250);
}

#[tokio::test(start_paused = true)]
async fn test_scalar_target_drives_every_channel() {
    let (gateway, _sink) = memory_gateway(8, 0);

    let outcome = gateway
        .fade(&[1, 2, 3], 128u8, Duration::from_millis(500), 40)
        .await;

    assert_eq!(outcome.steps, 20);
    for channel in 1..=3 {
        assert_eq!(gateway.get_channel_level(channel), 128);
    }
    assert_eq!(gateway.get_channel_level(4), 0);
}

#[tokio::test(start_paused = true)]
async fn test_short_target_list_repeats_last_level() {
    let (gateway, _sink) = memory_gateway(8, 0);

    gateway
        .fade(&[5, 6, 7], vec![40u8, 80], Duration::ZERO, DEFAULT_FPS)
        .await;

    assert_eq!(gateway.buffer().snapshot(), vec![0, 0, 0, 0, 40, 80, 80, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_steps_do_not_send() {
    let (gateway, sink) = memory_gateway(8, 100);

    let outcome = gateway
        .fade(&[1, 2], 100u8, Duration::from_millis(500), DEFAULT_FPS)
        .await;

    assert_eq!(outcome.steps, 20);
    assert_eq!(outcome.frames_sent, 0);
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_fade_skips_repeated_levels() {
    let (gateway, sink) = memory_gateway(8, 0);

    // 40 steps for a change of 4 levels: only steps that cross a rounding
    // boundary produce a frame
    let outcome = gateway
        .fade(&[1], 4u8, Duration::from_secs(1), DEFAULT_FPS)
        .await;

    assert_eq!(outcome.steps, 40);
    assert_eq!(outcome.frames_sent, 4);
    assert_eq!(channel_history(&sink, 1), vec![1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_frames_carry_whole_buffer() {
    let (gateway, sink) = memory_gateway(4, 0);
    gateway.set_channel(4, 99, false);

    gateway
        .fade(&[1], 50u8, Duration::from_millis(100), DEFAULT_FPS)
        .await;

    assert!(!sink.is_empty());
    assert!(sink
        .frames()
        .iter()
        .all(|frame| frame[HEADER_LEN + 3] == 99));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fades_progress_independently() {
    let (gateway, _sink) = memory_gateway(8, 0);
    let start = Instant::now();

    let dimmer = gateway.spawn_fade(vec![1], 255u8, Duration::from_secs(1), DEFAULT_FPS);
    let rgb = gateway.spawn_fade(
        vec![2, 3, 4],
        [255u8, 128, 0],
        Duration::from_secs(1),
        DEFAULT_FPS,
    );

    let dimmer = dimmer.await.unwrap();
    let rgb = rgb.await.unwrap();

    assert_eq!(dimmer.steps, 40);
    assert_eq!(rgb.steps, 40);
    assert_eq!(gateway.buffer().snapshot(), vec![255, 255, 128, 0, 0, 0, 0, 0]);

    // Running side by side, not one after the other
    assert!(start.elapsed() < Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_reads_during_fade() {
    let (gateway, _sink) = memory_gateway(8, 0);

    let fade = gateway.spawn_fade(vec![1], 200u8, Duration::from_secs(1), DEFAULT_FPS);

    tokio::time::sleep(Duration::from_millis(510)).await;
    let midway = gateway.get_channel_level(1);
    assert!(midway > 0 && midway < 200, "midway level was {}", midway);

    // Writes to other channels are not blocked by the fade
    assert!(gateway.set_channel(2, 7, false));

    fade.await.unwrap();
    assert_eq!(gateway.get_channel_level(1), 200);
    assert_eq!(gateway.get_channel_level(2), 7);
}
