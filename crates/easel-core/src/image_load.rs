//! Asynchronous image loads resolved by the host.
//!
//! The host fetches and decodes pixels; the core only tracks which load is
//! current. Starting a new load supersedes the previous one, and completions
//! for superseded tickets are dropped.

use crate::shapes::ImageSource;

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// A decoded image as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
}

/// How a loaded image is placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlacement {
    /// Scaled to fit the workspace.
    FitWorkspace,
    /// Scaled to fit a sticker box of the given side length.
    Sticker(u32),
}

/// Side length of the box stickers are fitted into.
pub const STICKER_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub(crate) struct PendingLoad {
    pub ticket: LoadTicket,
    pub source: ImageSource,
    pub placement: ImagePlacement,
}

/// Outcome of matching a completion against the pending load.
#[derive(Debug)]
pub(crate) enum Resolution {
    Current(PendingLoad),
    Stale,
}

/// Tracks the newest outstanding load.
#[derive(Debug, Default)]
pub struct ImageLoads {
    next_ticket: u64,
    pending: Option<PendingLoad>,
}

impl ImageLoads {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin(&mut self, source: ImageSource, placement: ImagePlacement) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        if let Some(previous) = self.pending.replace(PendingLoad {
            ticket,
            source,
            placement,
        }) {
            log::debug!("Image load {:?} superseded by {:?}", previous.ticket, ticket);
        }
        ticket
    }

    pub(crate) fn resolve(&mut self, ticket: LoadTicket) -> Resolution {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => Resolution::Current(pending),
            other => {
                self.pending = other;
                Resolution::Stale
            }
        }
    }

    /// Whether a load is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Source of the outstanding load, if any.
    pub fn pending_source(&self) -> Option<&ImageSource> {
        self.pending.as_ref().map(|p| &p.source)
    }
}
