//! Small general purpose utilities.

pub mod vec_map;
