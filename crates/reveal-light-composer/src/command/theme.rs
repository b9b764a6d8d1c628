//! Named themes accepted by `set_theme`

use embassy_time::Duration;

use crate::color::{BOY, GIRL, Rgb, WHITE};

static CELEBRATION_COLORS: [Rgb; 3] = [GIRL, WHITE, BOY];
static TIE_COLORS: [Rgb; 2] = [GIRL, BOY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// One flat color
    Static(Rgb),
    /// Looping palette
    Gradient {
        colors: &'static [Rgb],
        hold: Duration,
        transition: Duration,
    },
}

pub fn find_theme(name: &str) -> Option<Theme> {
    Some(match name {
        "boy" => Theme::Static(BOY),
        "girl" => Theme::Static(GIRL),
        "celebration" => Theme::Gradient {
            colors: &CELEBRATION_COLORS,
            hold: Duration::from_millis(1000),
            transition: Duration::from_millis(300),
        },
        "tie" => Theme::Gradient {
            colors: &TIE_COLORS,
            hold: Duration::from_millis(1500),
            transition: Duration::from_millis(500),
        },
        _ => return None,
    })
}
