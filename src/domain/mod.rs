pub mod user;
pub mod course;
pub mod lesson;
pub mod subscription;
pub mod payment;

pub use user::*;
pub use course::*;
pub use lesson::*;
pub use subscription::*;
pub use payment::*;
