pub mod overlay;
pub mod playback;
pub mod storage;
pub mod ui;
