// Session state: one candidate's interaction from form fill to submission.

pub mod handlers;
pub mod models;
pub mod store;
