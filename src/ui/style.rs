use iced::Color;

use crate::state::data::SignStatus;

pub const GOOD: Color = Color::from_rgb(0.13, 0.77, 0.37);
pub const DAMAGED: Color = Color::from_rgb(0.92, 0.70, 0.03);
pub const MISSING: Color = Color::from_rgb(0.94, 0.27, 0.27);

/// Site accent (header, centre marker, overlays)
pub const ACCENT: Color = Color::from_rgb(0.15, 0.39, 0.92);

pub fn status_color(status: SignStatus) -> Color {
    match status {
        SignStatus::Good => GOOD,
        SignStatus::Damaged => DAMAGED,
        SignStatus::Missing => MISSING,
    }
}
