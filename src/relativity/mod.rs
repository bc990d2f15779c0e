pub mod special;
pub mod worldline;

/// A point in scene space, or an event `(x, ct, z)` when fed to a boost.
pub type Point = [f64; 3];
