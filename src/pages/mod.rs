pub mod class_detail;
pub mod class_form;
pub mod dashboard;
pub mod login;
