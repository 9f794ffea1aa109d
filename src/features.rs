pub mod descriptor;
pub mod selection;
