pub(crate) mod compositor;
pub(crate) mod cpu;
pub(crate) mod export;
pub(crate) mod raster;
pub(crate) mod surface;
pub(crate) mod text;
