use crate::geometry::{Point, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control, or Command on macOS. Arms the measurement line.
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

/// Raw input delivered by the host, in surface (device) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Press {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        pos: Point,
    },
    Release {
        pos: Point,
        button: PointerButton,
    },
    DoubleClick {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Vertical wheel rotation in eighths of a degree (120 per notch).
    Wheel {
        angle_delta: i32,
    },
    Leave,
    Resize {
        size: Size,
    },
}

/// What lies under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelProbe {
    /// Outside the image, or nothing displayed.
    Outside,
    Pixel { x: u32, y: u32, rgb: [u8; 3] },
}

impl PixelProbe {
    /// Flat `(x, y, r, g, b)` form; `x = y = -1` means [`PixelProbe::Outside`].
    pub fn to_signal(self) -> (i32, i32, u8, u8, u8) {
        match self {
            Self::Outside => (-1, -1, 0, 0, 0),
            Self::Pixel { x, y, rgb } => (x as i32, y as i32, rgb[0], rgb[1], rgb[2]),
        }
    }
}

/// Two-point measurement segment in integer scene coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasurementLine {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    /// A drag is in progress and the end point still follows the pointer.
    pub armed: bool,
}

impl MeasurementLine {
    /// Zero-length armed segment at `(x, y)`.
    pub fn start_at(x: i32, y: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
            armed: true,
        }
    }

    pub fn coords(&self) -> [i32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    pub fn length(&self) -> f64 {
        let dx = (self.x1 - self.x0) as f64;
        let dy = (self.y1 - self.y0) as f64;
        dx.hypot(dy)
    }
}
