pub(crate) mod extract;
pub(crate) mod layer;
pub(crate) mod model;
