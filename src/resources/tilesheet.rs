//! Shared tile sheet (sprite atlas) and its draw batch.
//!
//! A [`TileSheet`] partitions one texture into named strips of frame
//! rectangles and collects quad submissions from every sprite that draws
//! from it. Sprites hold it through an [`Arc`]; the sheet lives as long as
//! its longest holder.
//!
//! # Batching
//!
//! ```ignore
//! sheet.start_batch();
//! for sprite in &sprites {
//!     sprite.draw(false);
//! }
//! sheet.finish_batch(); // quads handed to the BatchSink in one call
//! ```
//!
//! The sheet only records quads. Turning them into GPU work is the job of
//! the [`BatchSink`] installed with [`TileSheet::set_sink`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::Vec4;
use log::{debug, warn};

use crate::error::{Result, SpriteError};
use crate::geometry::Rect;

/// One textured quad submitted to a batch.
///
/// A negative `src.width` or `src.height` means the source is mirrored on
/// that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Source rectangle in texture space.
    pub src: Rect,
    /// Destination rectangle in untransformed world space.
    pub dst: Rect,
    /// RGBA modulation color.
    pub tint: Vec4,
}

/// Receives the quads of a finished batch.
pub trait BatchSink: Send {
    fn flush(&mut self, texture: &str, quads: &[Quad]);
}

/// Sink that only logs what it receives.
#[derive(Debug, Default)]
pub struct LogSink;

impl BatchSink for LogSink {
    fn flush(&mut self, texture: &str, quads: &[Quad]) {
        debug!("Flushed {} quads for texture '{}'", quads.len(), texture);
    }
}

/// Named ordered sequence of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub id: String,
    pub frames: Vec<Rect>,
}

#[derive(Default)]
struct SpriteBatch {
    active: bool,
    quads: Vec<Quad>,
    sink: Option<Box<dyn BatchSink>>,
    flush_count: u64,
    last_flush_len: usize,
}

/// Shared tile sheet handle type.
pub type SharedTileSheet = Arc<TileSheet>;

pub struct TileSheet {
    id: String,
    texture: String,
    strips: RwLock<Vec<Strip>>,
    batch: Mutex<SpriteBatch>,
}

impl fmt::Debug for TileSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileSheet")
            .field("id", &self.id)
            .field("texture", &self.texture)
            .field("strips", &self.strip_count())
            .finish()
    }
}

impl TileSheet {
    /// Create an empty tile sheet drawing from `texture`.
    pub fn new(id: impl Into<String>, texture: impl Into<String>) -> Self {
        TileSheet {
            id: id.into(),
            texture: texture.into(),
            strips: RwLock::new(Vec::new()),
            batch: Mutex::new(SpriteBatch::default()),
        }
    }

    /// Create a sheet already wrapped for sharing.
    pub fn shared(id: impl Into<String>, texture: impl Into<String>) -> SharedTileSheet {
        Arc::new(Self::new(id, texture))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Texture key the sheet draws from.
    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Number of live handles to this sheet.
    pub fn ref_count(this: &Arc<Self>) -> usize {
        Arc::strong_count(this)
    }

    fn strips(&self) -> RwLockReadGuard<'_, Vec<Strip>> {
        self.strips.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn strips_mut(&self) -> RwLockWriteGuard<'_, Vec<Strip>> {
        self.strips.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn batch(&self) -> MutexGuard<'_, SpriteBatch> {
        self.batch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- strips ----

    /// Append a strip of `frame_count` empty frames and return its index.
    pub fn add_strip(&self, id: impl Into<String>, frame_count: usize) -> Result<usize> {
        let id = id.into();
        let mut strips = self.strips_mut();
        if strips.iter().any(|s| s.id == id) {
            return Err(SpriteError::DuplicateStrip(id));
        }
        debug!(
            "Tile sheet '{}': added strip '{}' with {} frames",
            self.id, id, frame_count
        );
        strips.push(Strip {
            id,
            frames: vec![Rect::ZERO; frame_count],
        });
        Ok(strips.len() - 1)
    }

    /// Remove a strip by id. Indices of later strips shift down by one.
    pub fn remove_strip(&self, id: &str) -> bool {
        let mut strips = self.strips_mut();
        let Some(index) = strips.iter().position(|s| s.id == id) else {
            return false;
        };
        strips.remove(index);
        debug!("Tile sheet '{}': removed strip '{}'", self.id, id);
        true
    }

    pub fn strip_count(&self) -> usize {
        self.strips().len()
    }

    pub fn strip_id(&self, strip: usize) -> Option<String> {
        self.strips().get(strip).map(|s| s.id.clone())
    }

    pub fn strip_index(&self, id: &str) -> Option<usize> {
        self.strips().iter().position(|s| s.id == id)
    }

    pub fn strip_frame_count(&self, strip: usize) -> Option<usize> {
        self.strips().get(strip).map(|s| s.frames.len())
    }

    /// Resolve a frame rectangle, `None` if either index is out of range.
    pub fn strip_frame(&self, strip: usize, frame: usize) -> Option<Rect> {
        self.strips()
            .get(strip)
            .and_then(|s| s.frames.get(frame))
            .copied()
    }

    pub fn strip_frame_by_id(&self, id: &str, frame: usize) -> Option<Rect> {
        self.strips()
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.frames.get(frame))
            .copied()
    }

    pub fn set_strip_frame(&self, strip: usize, frame: usize, rect: Rect) -> Result<()> {
        let mut strips = self.strips_mut();
        let s = strips
            .get_mut(strip)
            .ok_or_else(|| SpriteError::StripNotFound(strip.to_string()))?;
        let slot = s
            .frames
            .get_mut(frame)
            .ok_or(SpriteError::FrameOutOfRange { strip, frame })?;
        *slot = rect;
        Ok(())
    }

    pub fn set_strip_frame_by_id(&self, id: &str, frame: usize, rect: Rect) -> Result<()> {
        let strip = self
            .strip_index(id)
            .ok_or_else(|| SpriteError::StripNotFound(id.to_string()))?;
        self.set_strip_frame(strip, frame, rect)
    }

    /// Copy up to `count` frames starting at `start`.
    pub fn strip_frames(&self, strip: usize, start: usize, count: usize) -> Vec<Rect> {
        self.strips()
            .get(strip)
            .map(|s| s.frames.iter().skip(start).take(count).copied().collect())
            .unwrap_or_default()
    }

    /// Overwrite consecutive frames starting at `start`, growing the strip
    /// when the slice runs past its end.
    pub fn set_strip_frames(&self, strip: usize, start: usize, frames: &[Rect]) -> Result<()> {
        let mut strips = self.strips_mut();
        let s = strips
            .get_mut(strip)
            .ok_or_else(|| SpriteError::StripNotFound(strip.to_string()))?;
        if start > s.frames.len() {
            return Err(SpriteError::FrameOutOfRange {
                strip,
                frame: start,
            });
        }
        let end = start + frames.len();
        if end > s.frames.len() {
            s.frames.resize(end, Rect::ZERO);
        }
        s.frames[start..end].copy_from_slice(frames);
        Ok(())
    }

    pub fn strip_frames_by_id(&self, id: &str, start: usize, count: usize) -> Vec<Rect> {
        self.strip_index(id)
            .map(|strip| self.strip_frames(strip, start, count))
            .unwrap_or_default()
    }

    pub fn set_strip_frames_by_id(&self, id: &str, start: usize, frames: &[Rect]) -> Result<()> {
        let strip = self
            .strip_index(id)
            .ok_or_else(|| SpriteError::StripNotFound(id.to_string()))?;
        self.set_strip_frames(strip, start, frames)
    }

    // ---- batching ----

    /// Install the sink that receives flushed batches.
    pub fn set_sink(&self, sink: Box<dyn BatchSink>) {
        self.batch().sink = Some(sink);
    }

    pub fn is_batching(&self) -> bool {
        self.batch().active
    }

    pub fn start_batch(&self) {
        let mut batch = self.batch();
        if batch.active {
            warn!("Tile sheet '{}': start_batch while a batch is open", self.id);
            return;
        }
        batch.active = true;
    }

    /// Queue a quad for the current batch. Quads submitted while no batch
    /// is open are dropped.
    pub fn submit(&self, quad: Quad) {
        let mut batch = self.batch();
        if !batch.active {
            warn!("Tile sheet '{}': quad submitted outside a batch, dropped", self.id);
            return;
        }
        batch.quads.push(quad);
    }

    /// Close the batch and hand its quads to the sink. Returns the number of
    /// quads flushed.
    pub fn finish_batch(&self) -> usize {
        let mut batch = self.batch();
        if !batch.active {
            warn!("Tile sheet '{}': finish_batch without start_batch", self.id);
            return 0;
        }
        batch.active = false;
        let quads = std::mem::take(&mut batch.quads);
        if let Some(sink) = batch.sink.as_mut() {
            sink.flush(&self.texture, &quads);
        }
        batch.flush_count += 1;
        batch.last_flush_len = quads.len();
        quads.len()
    }

    /// Number of batches flushed so far.
    pub fn flush_count(&self) -> u64 {
        self.batch().flush_count
    }

    /// Quad count of the most recent flush.
    pub fn last_flush_len(&self) -> usize {
        self.batch().last_flush_len
    }

    /// Quads waiting for the next flush.
    pub fn pending_quads(&self) -> usize {
        self.batch().quads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSink {
        flushed: Arc<Mutex<Vec<(String, Vec<Quad>)>>>,
    }

    impl BatchSink for RecordingSink {
        fn flush(&mut self, texture: &str, quads: &[Quad]) {
            self.flushed
                .lock()
                .unwrap()
                .push((texture.to_string(), quads.to_vec()));
        }
    }

    fn quad(x: f32) -> Quad {
        Quad {
            src: Rect::new(x, 0.0, 8.0, 8.0),
            dst: Rect::new(0.0, 0.0, 8.0, 8.0),
            tint: Vec4::ONE,
        }
    }

    fn walk_sheet() -> TileSheet {
        let sheet = TileSheet::new("hero", "hero.png");
        sheet.add_strip("walk", 3).unwrap();
        sheet
            .set_strip_frames(
                0,
                0,
                &[
                    Rect::new(0.0, 0.0, 16.0, 16.0),
                    Rect::new(16.0, 0.0, 16.0, 16.0),
                    Rect::new(32.0, 0.0, 16.0, 16.0),
                ],
            )
            .unwrap();
        sheet
    }

    #[test]
    fn test_add_strip_returns_index() {
        let sheet = TileSheet::new("s", "t.png");
        assert_eq!(sheet.add_strip("a", 2).unwrap(), 0);
        assert_eq!(sheet.add_strip("b", 4).unwrap(), 1);
        assert_eq!(sheet.strip_count(), 2);
        assert_eq!(sheet.strip_frame_count(1), Some(4));
        assert_eq!(sheet.strip_id(0).as_deref(), Some("a"));
        assert_eq!(sheet.strip_index("b"), Some(1));
    }

    #[test]
    fn test_add_strip_rejects_duplicates() {
        let sheet = TileSheet::new("s", "t.png");
        sheet.add_strip("a", 1).unwrap();
        assert!(matches!(
            sheet.add_strip("a", 1),
            Err(SpriteError::DuplicateStrip(_))
        ));
    }

    #[test]
    fn test_strip_frame_lookup() {
        let sheet = walk_sheet();
        assert_eq!(
            sheet.strip_frame(0, 1),
            Some(Rect::new(16.0, 0.0, 16.0, 16.0))
        );
        assert_eq!(
            sheet.strip_frame_by_id("walk", 2),
            Some(Rect::new(32.0, 0.0, 16.0, 16.0))
        );
        assert_eq!(sheet.strip_frame(0, 3), None);
        assert_eq!(sheet.strip_frame(1, 0), None);
        assert_eq!(sheet.strip_frame_by_id("run", 0), None);
    }

    #[test]
    fn test_remove_strip_invalidates_frames() {
        let sheet = walk_sheet();
        assert!(sheet.remove_strip("walk"));
        assert!(!sheet.remove_strip("walk"));
        assert_eq!(sheet.strip_frame(0, 0), None);
    }

    #[test]
    fn test_set_strip_frame_errors() {
        let sheet = walk_sheet();
        assert!(matches!(
            sheet.set_strip_frame(0, 9, Rect::ZERO),
            Err(SpriteError::FrameOutOfRange { strip: 0, frame: 9 })
        ));
        assert!(matches!(
            sheet.set_strip_frame_by_id("run", 0, Rect::ZERO),
            Err(SpriteError::StripNotFound(_))
        ));
        sheet
            .set_strip_frame_by_id("walk", 0, Rect::new(1.0, 1.0, 2.0, 2.0))
            .unwrap();
        assert_eq!(sheet.strip_frame(0, 0), Some(Rect::new(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn test_set_strip_frames_grows_strip() {
        let sheet = walk_sheet();
        sheet
            .set_strip_frames(0, 2, &[Rect::new(0.0, 16.0, 16.0, 16.0); 3])
            .unwrap();
        assert_eq!(sheet.strip_frame_count(0), Some(5));
        assert_eq!(sheet.strip_frames(0, 3, 10).len(), 2);
        assert!(sheet.set_strip_frames(0, 9, &[Rect::ZERO]).is_err());
    }

    #[test]
    fn test_strip_frames_by_id() {
        let sheet = walk_sheet();
        assert_eq!(
            sheet.strip_frames_by_id("walk", 1, 5),
            vec![
                Rect::new(16.0, 0.0, 16.0, 16.0),
                Rect::new(32.0, 0.0, 16.0, 16.0),
            ]
        );
        assert!(sheet.strip_frames_by_id("run", 0, 3).is_empty());

        sheet
            .set_strip_frames_by_id("walk", 3, &[Rect::new(48.0, 0.0, 16.0, 16.0)])
            .unwrap();
        assert_eq!(sheet.strip_frame_count(0), Some(4));
        assert_eq!(
            sheet.strip_frame_by_id("walk", 3),
            Some(Rect::new(48.0, 0.0, 16.0, 16.0))
        );
        assert!(matches!(
            sheet.set_strip_frames_by_id("run", 0, &[Rect::ZERO]),
            Err(SpriteError::StripNotFound(_))
        ));
    }

    #[test]
    fn test_batch_flushes_to_sink() {
        let sheet = TileSheet::new("s", "atlas.png");
        let sink = RecordingSink::default();
        sheet.set_sink(Box::new(sink.clone()));

        sheet.start_batch();
        assert!(sheet.is_batching());
        sheet.submit(quad(0.0));
        sheet.submit(quad(8.0));
        assert_eq!(sheet.finish_batch(), 2);
        assert!(!sheet.is_batching());

        let flushed = sink.flushed.lock().unwrap();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].0, "atlas.png");
        assert_eq!(flushed[0].1, vec![quad(0.0), quad(8.0)]);
        assert_eq!(sheet.flush_count(), 1);
        assert_eq!(sheet.last_flush_len(), 2);
    }

    #[test]
    fn test_finish_without_start_is_ignored() {
        let sheet = TileSheet::new("s", "atlas.png");
        assert_eq!(sheet.finish_batch(), 0);
        assert_eq!(sheet.flush_count(), 0);
    }

    #[test]
    fn test_submit_outside_batch_is_dropped() {
        let sheet = TileSheet::new("s", "atlas.png");
        for i in 0..100 {
            sheet.submit(quad(i as f32));
        }
        assert_eq!(sheet.pending_quads(), 0);
        sheet.start_batch();
        sheet.start_batch();
        sheet.submit(quad(0.0));
        assert_eq!(sheet.finish_batch(), 1);
        assert_eq!(sheet.pending_quads(), 0);
    }

    #[test]
    fn test_ref_count_tracks_handles() {
        let sheet = TileSheet::shared("s", "atlas.png");
        assert_eq!(TileSheet::ref_count(&sheet), 1);
        let other = Arc::clone(&sheet);
        assert_eq!(TileSheet::ref_count(&sheet), 2);
        drop(other);
        assert_eq!(TileSheet::ref_count(&sheet), 1);
    }
}
