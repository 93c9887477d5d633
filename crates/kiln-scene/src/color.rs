//! RGBA colors.

use crate::error::SceneError;

/// A straight-alpha RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl Color {
    /// Number of levels in an 8-bit component.
    pub const DEPTH: u32 = 256;

    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// A validated color from float components.
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Result<Self, SceneError> {
        for value in [red, green, blue, alpha] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SceneError::ColorOutOfRange { value });
            }
        }
        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }

    /// A color from 8-bit components.
    pub fn from_bytes(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: Self::to_float(red),
            green: Self::to_float(green),
            blue: Self::to_float(blue),
            alpha: Self::to_float(alpha),
        }
    }

    /// Red component.
    pub fn red(&self) -> f32 {
        self.red
    }

    /// Green component.
    pub fn green(&self) -> f32 {
        self.green
    }

    /// Blue component.
    pub fn blue(&self) -> f32 {
        self.blue
    }

    /// Alpha component.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Components as an array, red first.
    pub fn to_array(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Packed as `0xRRGGBBAA`.
    pub fn to_rgba(&self) -> u32 {
        pack(self.red, self.green, self.blue, self.alpha)
    }

    /// Packed as `0xAARRGGBB`.
    pub fn to_argb(&self) -> u32 {
        pack(self.alpha, self.red, self.green, self.blue)
    }

    /// An 8-bit component as a float in `[0, 1]`.
    pub fn to_float(component: u8) -> f32 {
        f32::from(component) / (Self::DEPTH - 1) as f32
    }

    /// A float component rounded to 8 bits.
    pub fn to_integer(component: f32) -> u8 {
        (component.clamp(0.0, 1.0) * (Self::DEPTH - 1) as f32).round() as u8
    }
}

fn pack(a: f32, b: f32, c: f32, d: f32) -> u32 {
    u32::from(Color::to_integer(a)) << 24
        | u32::from(Color::to_integer(b)) << 16
        | u32::from(Color::to_integer(c)) << 8
        | u32::from(Color::to_integer(d))
}
