/// Public STUN servers used when no relay endpoints are configured.
pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Number of remote render targets a participant provisions by default.
pub const DEFAULT_REMOTE_SLOTS: usize = 3;

/// Default signaling endpoint of a locally running `huddle serve`.
pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:3000/ws";
