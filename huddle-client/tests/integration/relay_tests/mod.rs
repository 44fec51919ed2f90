pub mod test_offer_answer_round_trip;
pub mod test_offer_is_answered;
pub mod test_peer_left_evicts_peer;
pub mod test_stale_events_are_dropped;
