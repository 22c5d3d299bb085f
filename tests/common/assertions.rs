//! Assertions shared by the integration tests

use ftp_relay::transport::{SessionEvent, TransportStats};

/// Every opened session was closed and none overlapped
pub fn assert_sessions_sequential(stats: &TransportStats) {
    assert_eq!(
        stats.sessions_opened, stats.sessions_closed,
        "sessions left open: {:?}",
        stats.events
    );
    assert!(
        stats.max_open <= 1,
        "sessions overlapped (max open {})",
        stats.max_open
    );

    let mut open = None;
    for event in &stats.events {
        match event {
            SessionEvent::Opened(id) => {
                assert!(open.is_none(), "session {id} opened while another was open");
                open = Some(*id);
            }
            SessionEvent::Closed(id) => {
                assert_eq!(open, Some(*id), "closed a session that was not open");
                open = None;
            }
            SessionEvent::Retrieve(id, _) | SessionEvent::List(id, _) => {
                assert_eq!(open, Some(*id), "used session {id} outside its lifetime");
            }
        }
    }
}
