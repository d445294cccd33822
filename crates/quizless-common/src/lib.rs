pub mod requests;
pub mod results;
pub mod state;
pub mod topic;
