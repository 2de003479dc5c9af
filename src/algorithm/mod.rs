/// Memoized extremal and ranked search results
pub mod cache;
/// Generation orchestration and tiled rendering
pub mod executor;
/// Exhaustive search over two-valued matrices
pub mod search;
/// Kronecker and top-k matrix selection
pub mod variants;
