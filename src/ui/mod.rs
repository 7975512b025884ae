/// Custom widgets and colours for the iced front end

pub mod map;
pub mod style;
