//! Monthcard core — months and bundled resources, the raster canvas,
//! image I/O, and non-blocking audio clip playback.

pub mod audio;
pub mod canvas;
pub mod io;
pub mod month;
