//! Sampling a composite at a fixed frame rate into a frame sink.

use std::ops::Range;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::composite::compositor::Compositor;
use crate::foundation::core::Fps;
use crate::foundation::error::{KinetextError, KinetextResult};
use crate::raster::buffer::RasterBuffer;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
}

/// Consumer of flattened frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing frame order.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> KinetextResult<()>;
    fn push_frame(&mut self, index: u64, frame: &RasterBuffer) -> KinetextResult<()>;
    fn end(&mut self) -> KinetextResult<()>;
}

/// Keeps every frame in memory. Meant for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, RasterBuffer)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, RasterBuffer)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KinetextResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &RasterBuffer) -> KinetextResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KinetextResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes `frame_000000.png`, `frame_000001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> KinetextResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            KinetextError::evaluation(format!("create '{}': {e}", self.dir.display()))
        })?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &RasterBuffer) -> KinetextResult<()> {
        let path = self.frame_path(index);
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> KinetextResult<()> {
        tracing::debug!(frames = self.written.len(), dir = %self.dir.display(), "png sequence written");
        Ok(())
    }
}

/// Encode one frame as an RGBA PNG.
pub fn write_png(path: &Path, frame: &RasterBuffer) -> KinetextResult<()> {
    image::save_buffer_with_format(
        path,
        frame.data(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| KinetextError::evaluation(format!("write png '{}': {e}", path.display())))
}

/// Threading and chunking controls for [`render_range`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render frames of a chunk in parallel when `true`.
    pub parallel: bool,
    /// Chunk size in frames; frames are pushed to the sink chunk by chunk.
    pub chunk_size: usize,
    /// Worker thread count; `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    /// Frames served from the static-composite cache.
    pub frames_static: u64,
}

/// Render frames `frames.start..frames.end` at `t = frame / fps` into `sink`.
///
/// Parallel rendering produces the same frames, pushed in the same order.
#[tracing::instrument(
    level = "debug",
    skip(compositor, sink, threading),
    fields(start = frames.start, end = frames.end, parallel = threading.parallel)
)]
pub fn render_range(
    compositor: &Compositor,
    fps: Fps,
    frames: Range<u64>,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> KinetextResult<RenderStats> {
    if frames.is_empty() {
        return Err(KinetextError::validation("render range must be non-empty"));
    }
    let (width, height) = compositor.size();
    sink.begin(SinkConfig { width, height, fps })?;

    let stats = RenderStats {
        frames_total: frames.end - frames.start,
        frames_static: frames
            .clone()
            .filter(|&f| compositor.is_cached_at(fps.frame_time_secs(f)))
            .count() as u64,
    };

    if !threading.parallel {
        for f in frames {
            let frame = compositor.frame(fps.frame_time_secs(f));
            sink.push_frame(f, &frame)?;
        }
        sink.end()?;
        return Ok(stats);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk = threading.chunk_size.max(1) as u64;
    let mut chunk_start = frames.start;
    while chunk_start < frames.end {
        let chunk_end = (chunk_start + chunk).min(frames.end);
        let rendered: Vec<RasterBuffer> = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|f| compositor.render(fps.frame_time_secs(f)))
                .collect()
        });
        for (f, frame) in (chunk_start..chunk_end).zip(&rendered) {
            sink.push_frame(f, frame)?;
        }
        chunk_start = chunk_end;
    }
    sink.end()?;
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> KinetextResult<rayon::ThreadPool> {
    let builder = match threads {
        Some(0) => {
            return Err(KinetextError::validation(
                "render threads must be at least 1 when set",
            ));
        }
        Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n),
        None => rayon::ThreadPoolBuilder::new(),
    };
    builder
        .thread_name(|i| format!("kinetext-render-{i}"))
        .build()
        .map_err(|e| KinetextError::evaluation(format!("render thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
