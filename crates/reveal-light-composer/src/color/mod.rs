mod palette;
mod utils;

use smart_leds::RGB8;
use smart_leds::hsv::Hsv as HSV;

pub use palette::{BLACK, BOY, GIRL, WHITE};
pub use utils::{blend_colors, hsv2rgb, rgb_from_u32, scale_color};

pub type Rgb = RGB8;
pub type Hsv = HSV;
