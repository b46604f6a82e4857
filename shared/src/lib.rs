/// Shared core for the Reelpro workspace: domain types, error types, the
/// credential/tier policy, the in-memory session store, and the simulated
/// latency seam used by the task runners.
pub mod errors;
pub mod latency;
pub mod models;
pub mod policy;
pub mod session;
