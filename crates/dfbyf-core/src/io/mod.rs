pub mod dat;
pub mod frames;
pub mod heatmap;
