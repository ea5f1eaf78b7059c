pub mod stage0_load;
pub mod stage1_segment;
pub mod stage2_extract;
pub mod stage3_emit;

pub use stage0_load::*;
pub use stage1_segment::*;
pub use stage2_extract::*;
pub use stage3_emit::*;
