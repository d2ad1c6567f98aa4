pub mod assistant;
pub mod editor;
pub mod logging;
pub mod render;
pub mod storage;
pub mod theme;
