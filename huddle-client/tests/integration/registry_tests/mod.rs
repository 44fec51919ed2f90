pub mod test_concurrent_lookup_creates_once;
pub mod test_same_peer_shares_connection;
