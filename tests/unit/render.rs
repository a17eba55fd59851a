use super::*;
use crate::composite::compositor::Background;
use crate::foundation::core::{Canvas, Rgb8};
use crate::layer::{Layer, Position};
use std::sync::Arc;

fn moving_square() -> Compositor {
    Compositor::new(
        Canvas::new(8, 4),
        vec![
            Layer::solid((2, 2), Rgb8::new(200, 10, 10))
                .with_position(Position::Animated(Arc::new(|t: f64| ((t * 4.0) as i32, 1)))),
        ],
        Background::Solid(Rgb8::BLACK),
    )
}

fn fps() -> Fps {
    Fps::new(4, 1).unwrap()
}

#[test]
fn sequential_render_pushes_frames_in_order() {
    let comp = moving_square();
    let mut sink = InMemorySink::new();
    let stats = render_range(&comp, fps(), 2..6, &mut sink, &RenderThreading::default()).unwrap();
    assert_eq!(stats, RenderStats { frames_total: 4, frames_static: 0 });
    assert!(sink.is_finished());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 8,
            height: 4,
            fps: fps()
        })
    );
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![2, 3, 4, 5]);
    for (i, frame) in sink.frames() {
        assert_eq!(*frame, comp.render(fps().frame_time_secs(*i)));
    }
}

#[test]
fn parallel_render_matches_sequential() {
    let comp = moving_square();
    let mut seq = InMemorySink::new();
    render_range(&comp, fps(), 0..7, &mut seq, &RenderThreading::default()).unwrap();

    let mut par = InMemorySink::new();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 3,
        threads: Some(2),
    };
    render_range(&comp, fps(), 0..7, &mut par, &threading).unwrap();
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn invalid_requests_are_rejected() {
    let comp = moving_square();
    let mut sink = InMemorySink::new();
    assert!(render_range(&comp, fps(), 3..3, &mut sink, &RenderThreading::default()).is_err());
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 8,
        threads: Some(0),
    };
    let err = render_range(&comp, fps(), 0..2, &mut sink, &threading).unwrap_err();
    assert!(matches!(err, KinetextError::Validation(_)));
}

#[test]
fn thread_pool_honours_requested_size() {
    assert_eq!(build_thread_pool(Some(3)).unwrap().current_num_threads(), 3);
    assert!(build_thread_pool(None).is_ok());
}

#[test]
fn static_composites_report_cached_frames() {
    let comp = Compositor::new(
        Canvas::new(2, 2),
        vec![Layer::solid((2, 2), Rgb8::WHITE)],
        Background::Transparent,
    );
    let mut sink = InMemorySink::new();
    let stats = render_range(&comp, fps(), 0..3, &mut sink, &RenderThreading::default()).unwrap();
    assert_eq!(stats.frames_static, 3);
}

#[test]
fn cached_frame_count_stops_at_the_composite_duration() {
    // 1s at 4 fps: frames 0..4 sit inside the window, 4..6 fall past it.
    let comp = Compositor::new(
        Canvas::new(2, 2),
        vec![Layer::solid((2, 2), Rgb8::WHITE).with_duration(1.0)],
        Background::Solid(Rgb8::BLACK),
    );
    assert!(comp.is_static_cached());
    let mut sink = InMemorySink::new();
    let stats = render_range(&comp, fps(), 0..6, &mut sink, &RenderThreading::default()).unwrap();
    assert_eq!(stats.frames_total, 6);
    assert_eq!(stats.frames_static, 4);
    assert_eq!(sink.frames()[5].1.pixel(0, 0), Some(Rgb8::BLACK.with_alpha(255)));
}

#[test]
fn png_sequence_round_trips_pixels() {
    let dir = std::env::temp_dir().join(format!("kinetext_png_seq_{}", std::process::id()));
    let comp = moving_square();
    let mut sink = PngSequenceSink::new(&dir);
    render_range(&comp, fps(), 0..2, &mut sink, &RenderThreading::default()).unwrap();

    assert_eq!(sink.written().len(), 2);
    assert!(sink.written()[1].ends_with("frame_000001.png"));
    let decoded = image::open(&sink.written()[1]).unwrap().to_rgba8();
    assert_eq!(decoded.as_raw().as_slice(), comp.render(0.25).data());
    let _ = std::fs::remove_dir_all(&dir);
}
