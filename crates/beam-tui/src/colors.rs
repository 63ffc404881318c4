//! Dark theme palette for the launcher surface.

use ratatui::style::Color;

pub const BG: Color = Color::Rgb(0x11, 0x13, 0x18);
pub const SURFACE: Color = Color::Rgb(0x1b, 0x1e, 0x25);
pub const SURFACE_HIGH: Color = Color::Rgb(0x28, 0x2c, 0x35);

pub const ON_SURFACE: Color = Color::Rgb(0xe2, 0xe4, 0xe9);
pub const SUBTEXT: Color = Color::Rgb(0xa8, 0xad, 0xb8);
pub const OUTLINE: Color = Color::Rgb(0x6e, 0x74, 0x81);

pub const PRIMARY: Color = Color::Rgb(0x8a, 0xb4, 0xf8);

pub const SUCCESS: Color = Color::Rgb(0xa5, 0xd6, 0xa7);

pub const WARNING: Color = Color::Rgb(0xff, 0xd9, 0x66);
