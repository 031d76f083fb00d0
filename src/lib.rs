//! 115云盘响应归一化库
//! Normalizes responses of the 115 cloud cookie API and open platform API

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use drivers::pan115;
