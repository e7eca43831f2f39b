pub mod booking;
pub mod couple;
pub mod gallery;
pub mod payment;
pub mod vendor;

pub use booking::*;
pub use couple::*;
pub use gallery::*;
pub use payment::*;
pub use vendor::*;
