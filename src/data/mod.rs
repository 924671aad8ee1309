pub mod buffer;
pub mod plot;
pub mod variable;
