/// Map geometry
///
/// The map widget is not a real GIS view: it linearly maps the
/// site bounding box onto the widget area.

pub mod projection;
