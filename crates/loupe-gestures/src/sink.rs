//! The next stage of the input pipeline.

use loupe_core::PointerEvent;

/// Downstream consumer that pointer events are forwarded into when they are
/// not consumed by a gesture.
pub trait EventSink {
    /// Re-inject one event into the next pipeline stage.
    fn inject(&mut self, event: PointerEvent);
}

/// An event sink that records everything it receives.
#[derive(Debug, Default)]
pub struct VecSink {
    /// The injected events, in arrival order.
    pub events: Vec<PointerEvent>,
}

impl EventSink for VecSink {
    fn inject(&mut self, event: PointerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_core::{Point, PointerAction, PointerId, PointerSample};

    #[test]
    fn test_vec_sink_preserves_order() {
        let mut sink = VecSink::default();
        for t in 0..3 {
            sink.inject(PointerEvent::new(
                PointerAction::Move,
                PointerId::new(0),
                vec![PointerSample::finger(PointerId::new(0), Point::ORIGIN)],
                t,
            ));
        }
        let times: Vec<u64> = sink.events.iter().map(|e| e.time_ms).collect();
        assert_eq!(times, vec![0, 1, 2]);
    }
}
