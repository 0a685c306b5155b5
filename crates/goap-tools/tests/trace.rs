use goap_core::Blackboard;
use goap_tools::{emit, TraceEvent, TraceLog, VecTraceSink, TRACE_LOG, TRACE_SINK};

#[test]
fn emit_without_log_or_sink_is_noop() {
    let mut bb = Blackboard::new();
    emit(&mut bb, TraceEvent::new(0, "goap.plan.call"));
    assert!(bb.is_empty());
}

#[test]
fn emit_records_into_log_and_sink() {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());
    bb.set(TRACE_SINK, Box::new(VecTraceSink::default()) as Box<dyn goap_tools::TraceSink>);

    emit(
        &mut bb,
        TraceEvent::new(3, "goap.goal.switch").with_label("seePlayer").with_a(10),
    );
    emit(&mut bb, TraceEvent::new(4, "goap.action.start").with_label("chase"));

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.events.len(), 2);
    assert_eq!(log.count("goap.goal.switch"), 1);
    let switch = log.with_tag("goap.goal.switch").next().unwrap();
    assert_eq!(switch.label.as_deref(), Some("seePlayer"));
    assert_eq!(switch.a, 10);
    assert_eq!(log.last().map(|e| e.tick), Some(4));
}
