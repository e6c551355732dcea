/// Callback entry point scheduling analyses on an event loop
pub mod analyzer;
/// Quantum-by-quantum tile hashing state machine
pub mod hashing;
/// Cooperative single-threaded event loop
pub mod scheduler;
