pub mod linear;

pub use linear::LinearProgram;
