pub mod session;
pub mod tutor;
