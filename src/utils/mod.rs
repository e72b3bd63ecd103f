pub mod io;
pub mod sampling;
pub mod split;
pub mod statistics;
pub mod structures;
