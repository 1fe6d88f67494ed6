//! ST7735S command set and the settings they carry.

/// Controller commands (ST7735S datasheet, system function command list)
pub mod cmd {
    pub const SWRESET: u8 = 0x01;   // Software reset
    pub const SLPOUT: u8 = 0x11;    // Sleep out
    pub const INVOFF: u8 = 0x20;    // Display inversion off
    pub const INVON: u8 = 0x21;     // Display inversion on
    pub const GAMSET: u8 = 0x26;    // Gamma set
    pub const DISPON: u8 = 0x29;    // Display on
    pub const CASET: u8 = 0x2A;     // Column address set
    pub const RASET: u8 = 0x2B;     // Row address set
    pub const RAMWR: u8 = 0x2C;     // Memory write
    pub const MADCTL: u8 = 0x36;    // Memory data access control
    pub const COLMOD: u8 = 0x3A;    // Interface pixel format
}

/// Settle times in milliseconds
pub mod delay {
    pub const HW_RESET_PULSE: u64 = 10;
    pub const HW_RESET_SETTLE: u64 = 150;
    pub const SWRESET: u64 = 150;
    pub const SLPOUT: u64 = 150;
    pub const DISPON: u64 = 100;
}

/// MADCTL bits
const MY: u8 = 1 << 7;
const MX: u8 = 1 << 6;
const MV: u8 = 1 << 5;

/// Panel size in portrait orientation
pub const PANEL_WIDTH: u8 = 128;
pub const PANEL_HEIGHT: u8 = 160;

/// Scan direction of display RAM, as set by MADCTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Mode 0, no axis swap or mirror (128x160)
    #[default]
    Portrait,
    /// Mode 1, MX + MV (160x128)
    Landscape,
    /// Mode 2, MX + MY (128x160)
    PortraitFlipped,
    /// Mode 3, MY + MV (160x128)
    LandscapeFlipped,
}

impl Orientation {
    /// Map a mode number 0-3; anything else is mode 0
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Orientation::Landscape,
            2 => Orientation::PortraitFlipped,
            3 => Orientation::LandscapeFlipped,
            _ => Orientation::Portrait,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Orientation::Portrait => 0,
            Orientation::Landscape => 1,
            Orientation::PortraitFlipped => 2,
            Orientation::LandscapeFlipped => 3,
        }
    }

    /// MADCTL parameter byte
    pub fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => 0x00,
            Orientation::Landscape => MX | MV,
            Orientation::PortraitFlipped => MX | MY,
            Orientation::LandscapeFlipped => MY | MV,
        }
    }

    /// Addressable (width, height) in this orientation
    pub fn dimensions(self) -> (u8, u8) {
        match self {
            Orientation::Portrait | Orientation::PortraitFlipped => (PANEL_WIDTH, PANEL_HEIGHT),
            Orientation::Landscape | Orientation::LandscapeFlipped => (PANEL_HEIGHT, PANEL_WIDTH),
        }
    }
}

/// Built-in gamma curve selected by GAMSET.
///
/// The actual curve depends on the GS strap pin, which can only be found
/// empirically, so the gamma values below are approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GammaCurve {
    /// GS=1: 2.2, GS=0: 1.0
    Gc0,
    /// GS=1: 1.8, GS=0: 2.5
    Gc1,
    /// GS=1: 2.5, GS=0: 2.2
    #[default]
    Gc2,
    /// GS=1: 1.0, GS=0: 1.8
    Gc3,
}

impl GammaCurve {
    /// Map a level 0-3; anything else is level 0
    pub fn from_level(level: u8) -> Self {
        match level {
            1 => GammaCurve::Gc1,
            2 => GammaCurve::Gc2,
            3 => GammaCurve::Gc3,
            _ => GammaCurve::Gc0,
        }
    }

    /// GAMSET parameter byte
    pub fn code(self) -> u8 {
        match self {
            GammaCurve::Gc0 => 0x01,
            GammaCurve::Gc1 => 0x02,
            GammaCurve::Gc2 => 0x04,
            GammaCurve::Gc3 => 0x08,
        }
    }
}
