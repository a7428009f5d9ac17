pub(crate) mod contour;
pub(crate) mod raster;
pub(crate) mod room;
pub(crate) mod schedule;
