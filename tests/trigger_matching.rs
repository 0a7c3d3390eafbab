use meshresponder::responder::{matches_trigger, FilterSkip, IncomingPacket, MessageFilter, PortTag};

#[test]
fn test_trigger_ignores_case_and_surrounding_whitespace() {
    for text in ["Hi", "HI", "hi", " hi ", "hi\t", "\nhI"] {
        assert!(matches_trigger(text), "{:?} should trigger", text);
    }
}

#[test]
fn test_trigger_rejects_anything_else() {
    for text in ["Hi!", "hi there", "hihi", "", "   ", "h", "hello"] {
        assert!(!matches_trigger(text), "{:?} should not trigger", text);
    }
}

#[test]
fn test_named_text_ports_pass_filter() {
    let filter = MessageFilter::new(None, 4);
    for name in ["TEXT_MESSAGE_APP", "TEXT_MESSAGE", "PORTNUM_TEXT_MESSAGE", "text_message_app"] {
        let mut pkt = IncomingPacket::text(9, 4, "hi");
        pkt.port = PortTag::Named(name.to_string());
        assert_eq!(filter.evaluate(&pkt), Ok(()), "port {}", name);
    }
}

#[test]
fn test_other_ports_are_not_text() {
    let filter = MessageFilter::new(None, 4);
    let mut pkt = IncomingPacket::text(9, 4, "hi");
    pkt.port = PortTag::Numeric(67);
    assert_eq!(filter.evaluate(&pkt), Err(FilterSkip::NotText));
    pkt.port = PortTag::Named("POSITION_APP".to_string());
    assert_eq!(filter.evaluate(&pkt), Err(FilterSkip::NotText));
}

#[test]
fn test_unknown_own_node_disables_self_check() {
    let filter = MessageFilter::new(None, 4);
    let pkt = IncomingPacket::text(0, 4, "hi");
    assert!(!filter.is_self_origin(&pkt));
}
