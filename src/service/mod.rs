pub mod accounts;
pub mod face_box;
pub mod password;
pub mod validation;

pub use accounts::AccountService;
pub use face_box::{FaceBox, face_locations};
