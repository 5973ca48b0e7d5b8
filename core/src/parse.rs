use crate::clock::VectorClock;
use crate::error::ParseError;
use crate::event::Event;
use crate::index::EventIndex;

/// Parse alternating `(logText, stampLine)` pairs into an [`EventIndex`].
///
/// A stamp line is `"<hostId> <jsonClock>"` where the clock is a JSON object
/// mapping host ids to non-negative integers and `<hostId>` is one of its own
/// keys. An empty log-text line ends the input; anything after it is ignored.
/// Log text is carried through as the event label without inspection.
///
/// Errors carry the zero-based index of the offending stamp line.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<EventIndex, ParseError> {
    if lines.len() < 2 {
        return Err(ParseError::EmptyInput);
    }

    let mut index = EventIndex::new();
    let mut i = 0;
    while i < lines.len() {
        let log = lines[i].as_ref();
        if log.is_empty() {
            break;
        }
        let stamp_line = i + 1;
        let stamp = lines.get(stamp_line).map(AsRef::as_ref).ok_or_else(|| {
            ParseError::MalformedStamp {
                line: stamp_line,
                reason: "log text has no stamp line".to_string(),
            }
        })?;
        let event = parse_stamp(log, stamp, i, stamp_line)?;
        index.insert(event).map_err(|event| ParseError::DuplicateEvent {
            line: stamp_line,
            host: event.host,
            time: event.time,
        })?;
        i += 2;
    }

    if index.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    tracing::debug!(
        events = index.len(),
        hosts = index.host_count(),
        "parsed trace lines"
    );
    Ok(index)
}

fn parse_stamp(
    log: &str,
    stamp: &str,
    log_line: usize,
    stamp_line: usize,
) -> Result<Event, ParseError> {
    let malformed = |reason: String| ParseError::MalformedStamp {
        line: stamp_line,
        reason,
    };

    let spacer = stamp
        .find(' ')
        .ok_or_else(|| malformed("missing separator between host and clock".to_string()))?;
    let host = &stamp[..spacer];
    if host.is_empty() {
        return Err(malformed("empty host id".to_string()));
    }

    let clock: VectorClock = serde_json::from_str(&stamp[spacer + 1..])
        .map_err(|err| malformed(format!("invalid clock JSON: {err}")))?;

    let time = clock
        .get(host)
        .ok_or_else(|| malformed(format!("host {host:?} missing from its own clock")))?;
    if time == 0 {
        return Err(malformed(format!("own clock time for host {host:?} must be at least 1")));
    }

    Ok(Event {
        host: host.to_string(),
        time,
        clock,
        label: log.to_string(),
        line: Some(log_line),
    })
}
