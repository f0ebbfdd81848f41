// Analysis endpoints: keyword matching and full résumé tailoring.
// The analysis itself happens in external scripts; this module only stages
// inputs, runs the script through `runner`, and maps what comes back.

pub mod handlers;
pub mod jobs;
pub mod mapper;
pub mod models;
