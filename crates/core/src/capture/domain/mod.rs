pub mod captured_frame;
pub mod frame_capturer;
