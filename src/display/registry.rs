//! Active-display registry.
//!
//! Several displays can be attached at once; drawing goes to whichever one
//! is active. The registry owns the displays and hands out copyable handles,
//! so switching the active display never leaves a dangling reference.

use super::{Display, DisplayError, PixelFormat, Wiring};
use crate::transport::Transport;

/// Identifies a display inside a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(usize);

pub struct Registry<T: Transport> {
    displays: Vec<Option<Display<T>>>,
    active: Option<DisplayHandle>,
}

impl<T: Transport> Registry<T> {
    pub fn new() -> Self {
        Self {
            displays: Vec::new(),
            active: None,
        }
    }

    /// Initialize a display and make it the active one
    pub fn initialize(
        &mut self,
        transport: T,
        wiring: Wiring,
        format: PixelFormat,
    ) -> Result<DisplayHandle, DisplayError> {
        let display = Display::initialize(transport, wiring, format)?;
        let handle = self.insert(display);
        self.active = Some(handle);
        Ok(handle)
    }

    /// Take ownership of an already initialized display. Does not change
    /// the active display.
    pub fn insert(&mut self, display: Display<T>) -> DisplayHandle {
        let index = match self.displays.iter().position(Option::is_none) {
            Some(free) => {
                self.displays[free] = Some(display);
                free
            }
            None => {
                self.displays.push(Some(display));
                self.displays.len() - 1
            }
        };
        DisplayHandle(index)
    }

    /// Direct subsequent drawing to `handle`. No hardware I/O.
    pub fn set_active(&mut self, handle: DisplayHandle) {
        self.active = Some(handle);
    }

    pub fn active(&self) -> Option<DisplayHandle> {
        self.active
    }

    pub fn get(&self, handle: DisplayHandle) -> Option<&Display<T>> {
        self.displays.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: DisplayHandle) -> Option<&mut Display<T>> {
        self.displays.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// The display drawing calls should go to
    pub fn active_display(&mut self) -> Result<&mut Display<T>, DisplayError> {
        let handle = self.active.ok_or(DisplayError::NoActiveDisplay)?;
        self.get_mut(handle)
            .ok_or(DisplayError::UnknownDisplay(handle))
    }

    /// Tear down a display and return its transport.
    ///
    /// Unknown handles are ignored. Destroying the active display clears
    /// the active slot; destroying any other display leaves it alone.
    pub fn destroy(&mut self, handle: DisplayHandle) -> Result<Option<T>, DisplayError> {
        let Some(display) = self.displays.get_mut(handle.0).and_then(Option::take) else {
            return Ok(None);
        };

        if self.active == Some(handle) {
            self.active = None;
        }

        display.destroy().map(Some)
    }

    /// Tear down the active display, if any
    pub fn destroy_active(&mut self) -> Result<Option<T>, DisplayError> {
        match self.active {
            Some(handle) => self.destroy(handle),
            None => Ok(None),
        }
    }

    /// Number of live displays
    pub fn len(&self) -> usize {
        self.displays.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Transport> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
