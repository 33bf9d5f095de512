/// Position of an ordinary cluster inside [`crate::field::ClusterField`].
///
/// This is an index into the ordinary cluster sequence and is only
/// meaningful until the next merge removes an earlier cluster.
pub type ClusterIndex = usize;

/// Number of nodes on every ring, growing cluster included.
pub const RING_NODES: usize = 18;
