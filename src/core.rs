pub mod features;
pub mod navigation;
