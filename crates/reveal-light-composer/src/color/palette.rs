//! Fixed palette used by the command vocabulary

use super::{Rgb, utils::rgb_from_u32};

pub const BLACK: Rgb = rgb_from_u32(0x00_00_00);
pub const WHITE: Rgb = rgb_from_u32(0xFF_FF_FF);
/// Blue shown for the "boy" side of the reveal
pub const BOY: Rgb = rgb_from_u32(0x00_78_FF);
/// Pink shown for the "girl" side of the reveal
pub const GIRL: Rgb = rgb_from_u32(0xFF_28_96);
