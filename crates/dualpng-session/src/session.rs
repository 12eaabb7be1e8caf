//! A single user's working set: two sources, one result, one gamma.
//!
//! All state sits behind one reader/writer lock owned by the session.
//! Reads take the shared side; uploads and merges take the exclusive side
//! for their whole duration, so merges on one session are serialized while
//! different sessions proceed in parallel.

use crate::{MergeParams, SessionError, SessionResult};
use dualpng_core::Image;
use dualpng_ops::{level_image, merge_images, scale_brightness, LevelRange, Resizer};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Source slot of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// First image, composited on top.
    One,
    /// Second image, the base layer.
    Two,
}

impl Slot {
    /// Both slots in order.
    pub const ALL: [Slot; 2] = [Slot::One, Slot::Two];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::One => "img1",
            Slot::Two => "img2",
        })
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "img1" => Ok(Slot::One),
            "2" | "img2" => Ok(Slot::Two),
            other => Err(format!("unknown slot '{other}', expected img1 or img2")),
        }
    }
}

/// How a result is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultMode {
    /// Carry the merge gamma for a gAMA chunk.
    #[default]
    Gamma,
    /// Plain image, no gamma annotation.
    NoGamma,
}

impl FromStr for ResultMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gamma" => Ok(ResultMode::Gamma),
            "nogamma" => Ok(ResultMode::NoGamma),
            other => Err(format!("unknown result mode '{other}', expected gamma or nogamma")),
        }
    }
}

/// Where a session is in its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No sources uploaded.
    Empty,
    /// Exactly one source uploaded, no result yet.
    OneSourceSet,
    /// Both sources uploaded, no result yet.
    BothSourcesSet,
    /// A result exists. It may be stale if a source was replaced since.
    Merged,
}

/// Result image ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResult {
    /// Merged pixels.
    pub image: Image,
    /// gAMA value to write, `None` for a plain PNG.
    pub gamma: Option<u32>,
}

impl RenderedResult {
    /// Encodes as PNG, with a gAMA chunk when `gamma` is set.
    pub fn encode<W: Write>(&self, writer: W) -> SessionResult<()> {
        match self.gamma {
            Some(g) => dualpng_io::encode(writer, &self.image, g),
            None => dualpng_io::encode_plain(writer, &self.image),
        }
        .map_err(SessionError::Io)
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Result width.
    pub width: u32,
    /// Result height.
    pub height: u32,
    /// gAMA value stored with the result.
    pub gamma: u32,
    /// Whether a mask was used instead of the checkerboard.
    pub masked: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    img1: Option<Image>,
    img2: Option<Image>,
    result: Option<Image>,
    gamma: Option<u32>,
}

impl SessionState {
    fn slot(&self, slot: Slot) -> &Option<Image> {
        match slot {
            Slot::One => &self.img1,
            Slot::Two => &self.img2,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Image> {
        match slot {
            Slot::One => &mut self.img1,
            Slot::Two => &mut self.img2,
        }
    }
}

/// One user's session.
///
/// Images are reference counted, so handing out a source or result is a
/// pointer copy and never exposes a buffer another thread is writing.
#[derive(Debug)]
pub struct Session {
    id: String,
    state: RwLock<SessionState>,
}

impl Session {
    /// Creates an empty session.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    // Writers replace fields wholesale, so a poisoned lock still guards
    // consistent state.
    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces a source image.
    pub fn set_source(&self, slot: Slot, image: Image) {
        debug!(session = %self.id, %slot, width = image.width(), height = image.height(), "source set");
        *self.write().slot_mut(slot) = Some(image);
    }

    /// Decodes uploaded bytes and stores them in `slot`.
    ///
    /// Decoding happens before the lock is taken; on failure the slot keeps
    /// its previous image.
    pub fn set_source_bytes(&self, slot: Slot, data: &[u8]) -> SessionResult<()> {
        let image = dualpng_io::decode(data)?;
        self.set_source(slot, image);
        Ok(())
    }

    /// Current source image in `slot`.
    pub fn get_source(&self, slot: Slot) -> Option<Image> {
        self.read().slot(slot).clone()
    }

    /// Runs resize, brightness, leveling and merge on both sources and
    /// stores the result with `params.gamma`.
    ///
    /// The result and gamma change only if every step succeeds.
    ///
    /// # Errors
    ///
    /// - [`SessionError::PreconditionFailed`] if a source is missing
    /// - [`SessionError::Ops`] if the resizer or a compositing step fails
    pub fn merge(&self, params: &MergeParams, resizer: &dyn Resizer) -> SessionResult<MergeSummary> {
        let mut state = self.write();

        let (Some(img1), Some(img2)) = (&state.img1, &state.img2) else {
            let missing: Vec<Slot> = Slot::ALL
                .into_iter()
                .filter(|&s| state.slot(s).is_none())
                .collect();
            debug!(session = %self.id, ?missing, "merge refused");
            return Err(SessionError::PreconditionFailed { missing });
        };

        let prepare = |img: &Image, brightness: f64, range: LevelRange| -> SessionResult<Image> {
            let resized = if params.resizes() {
                resizer.resize(img, params.width, params.height)?
            } else {
                img.clone()
            };
            let lit = if brightness != 1.0 {
                scale_brightness(&resized, brightness)?
            } else {
                resized
            };
            Ok(level_image(&lit, range))
        };
        let a = prepare(img1, params.brightness1, params.range1)?;
        let b = prepare(img2, params.brightness2, params.range2)?;
        let merged = merge_images(&a, &b, params.mask.as_ref());

        let summary = MergeSummary {
            width: merged.width(),
            height: merged.height(),
            gamma: params.gamma,
            masked: params.mask.is_some(),
        };
        state.result = Some(merged);
        state.gamma = Some(params.gamma);

        info!(
            session = %self.id,
            width = summary.width,
            height = summary.height,
            gamma = summary.gamma,
            masked = summary.masked,
            "merged"
        );
        Ok(summary)
    }

    /// Latest result, or `None` if no merge has succeeded yet.
    pub fn result(&self, mode: ResultMode) -> Option<RenderedResult> {
        let state = self.read();
        let image = state.result.clone()?;
        let gamma = match mode {
            ResultMode::Gamma => state.gamma,
            ResultMode::NoGamma => None,
        };
        Some(RenderedResult { image, gamma })
    }

    /// gAMA value of the latest merge.
    pub fn gamma(&self) -> Option<u32> {
        self.read().gamma
    }

    /// Current workflow phase.
    pub fn state(&self) -> SessionPhase {
        let state = self.read();
        if state.result.is_some() {
            return SessionPhase::Merged;
        }
        match (state.img1.is_some(), state.img2.is_some()) {
            (false, false) => SessionPhase::Empty,
            (true, true) => SessionPhase::BothSourcesSet,
            _ => SessionPhase::OneSourceSet,
        }
    }
}
