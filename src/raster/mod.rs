pub mod blur;
pub mod buffer;
pub mod composite;
pub mod mask;
pub mod sample;
pub mod shapes;
