use crate::activity::TechEvent;

pub const PRESENTER_POINTS: f64 = 2.0;
pub const PARTICIPANT_POINTS: f64 = 0.1;

/// Sum over technical events: 2.0 for presenting, 0.1 for attending.
/// Non-technical events count for nothing.
pub fn event_value(events: &[TechEvent]) -> f64 {
    events
        .iter()
        .filter(|event| event.is_tech_event)
        .map(|event| {
            if event.is_presenter {
                PRESENTER_POINTS
            } else {
                PARTICIPANT_POINTS
            }
        })
        .sum()
}

/// Tag count passes through unchanged.
pub fn tag_value(tag_count: f64) -> f64 {
    tag_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(is_tech_event: bool, is_presenter: bool) -> TechEvent {
        TechEvent {
            is_tech_event,
            is_presenter,
        }
    }

    #[test]
    fn test_mixed_events() {
        let events = vec![event(true, true), event(false, false), event(true, false)];
        assert!((event_value(&events) - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_non_tech_presenter_counts_nothing() {
        assert_eq!(event_value(&[event(false, true)]), 0.0);
    }

    #[test]
    fn test_no_events() {
        assert_eq!(event_value(&[]), 0.0);
    }

    #[test]
    fn test_tag_value_passthrough() {
        assert_eq!(tag_value(12.5), 12.5);
    }
}
