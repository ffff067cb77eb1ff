//! The state tracker: wraps an object and records every attribute write.
//!
//! Each write goes through [`StateTracker::set_attribute`], which:
//! 1. reads the previous value from the latest log entry (not from the object)
//! 2. applies the write to the wrapped object
//! 3. appends an entry with the simplified diff and a full simplified snapshot
//! 4. evicts the oldest entry if the log is over capacity
//! 5. rewrites the log file when one is configured
//!
//! All of this finishes before `set_attribute` returns.

use crate::builder::TrackerConfig;
use crate::core::{is_reserved, ChangeLog, LogEntry, SimplifyPolicy, Trackable, Value};
use crate::persist::{self, Encoder, PersistResult};
use serde_json::{Map, Value as JsonValue};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, trace, warn};

mod error;

pub use error::{TrackError, TrackResult};

/// Tracked object together with its bounded change log.
///
/// # Example
///
/// ```rust
/// use statesight::builder::TrackerBuilder;
/// use statesight::core::{DynamicObject, Value};
///
/// let object = DynamicObject::new("Point").with("x", 0).with("y", 0);
/// let mut tracker = TrackerBuilder::new().buffer_size(20).build(object).unwrap();
///
/// tracker.set_attribute("x", 1).unwrap();
/// tracker.set_attribute("x", 2).unwrap();
///
/// let log = tracker.get_log();
/// assert_eq!(log.len(), 3);
/// assert_eq!(log[2].change.previous(), Some(&Value::Int(1)));
/// assert_eq!(log[2].change.current(), Some(&Value::Int(2)));
/// ```
pub struct StateTracker<T: Trackable> {
    object: T,
    config: TrackerConfig,
    policy: SimplifyPolicy,
    encoder: Encoder,
    log: ChangeLog,
    muted: bool,
}

impl<T: Trackable> StateTracker<T> {
    /// Wrap an object without recording anything yet.
    pub(crate) fn new(object: T, config: TrackerConfig) -> Self {
        Self {
            policy: config.policy(),
            encoder: config.encoder(),
            log: ChangeLog::new(config.buffer_size),
            object,
            config,
            muted: false,
        }
    }

    /// Stop recording; writes still reach the object.
    pub(crate) fn mute(&mut self) {
        self.muted = true;
    }

    /// Reset the log and record the initial snapshot.
    pub(crate) fn start(&mut self) -> TrackResult<()> {
        self.muted = false;
        self.log.clear();
        let entry = LogEntry::initial(self.policy.snapshot(&self.object));
        self.record(entry)
    }

    /// Write an attribute and record the change.
    ///
    /// The previous value in the recorded diff is the one stored in the latest
    /// log entry's snapshot, or `Value::Unset` if that snapshot lacks the
    /// attribute. If the log file cannot be written, the write and its entry
    /// are kept and `TrackError::Persist` is returned.
    ///
    /// An empty name is rejected: it marks the initial entry in the log.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> TrackResult<()> {
        if name.is_empty() {
            return Err(TrackError::EmptyAttributeName);
        }
        if is_reserved(name) {
            return Err(TrackError::ReservedAttribute {
                name: name.to_string(),
            });
        }

        let previous = self
            .log
            .latest()
            .map_or(Value::Unset, |entry| entry.value_of(name));
        let value = value.into();
        self.object.assign(name, value.clone())?;

        if self.muted {
            trace!(attribute = name, "write during initialization, not recorded");
            return Ok(());
        }

        let entry = LogEntry::update(
            name,
            self.policy.simplify(&previous),
            self.policy.simplify(&value),
            self.policy.snapshot(&self.object),
        );
        self.record(entry)
    }

    fn record(&mut self, entry: LogEntry) -> TrackResult<()> {
        debug!(
            type_name = self.object.type_name(),
            attribute = entry.changed_attribute.as_str(),
            "recording state change"
        );

        if self.log.record(entry).is_some() {
            warn!(
                buffer_size = self.log.capacity(),
                "Buffer full, removing oldest entry"
            );
        }

        self.flush()
    }

    /// Rewrite the configured log file. Does nothing without a log file.
    pub fn flush(&self) -> TrackResult<()> {
        if let Some(path) = &self.config.log_file {
            self.flush_to(path)?;
        }
        Ok(())
    }

    /// Write the current log to `path`, format chosen by its extension.
    pub fn flush_to(&self, path: impl AsRef<Path>) -> PersistResult<()> {
        let path = path.as_ref();
        let format = persist::write_log(path, self.log.iter(), &self.encoder)?;
        debug!(
            path = %path.display(),
            format = format.name(),
            entries = self.log.len(),
            "log file written"
        );
        Ok(())
    }

    /// All retained entries, oldest first.
    pub fn get_log(&self) -> &VecDeque<LogEntry> {
        self.log.entries()
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.log.latest()
    }

    /// Live value of one attribute.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.object.attribute(name)
    }

    /// The wrapped object. Mutate it only through `set_attribute`.
    pub fn inner(&self) -> &T {
        &self.object
    }

    pub fn into_inner(self) -> T {
        self.object
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Pretty-printed JSON of the live object.
    ///
    /// Attributes are encoded unsimplified, followed by the tracker's
    /// `_buffer_size` and `_log_file` settings. The log itself is left out;
    /// use [`get_log`](Self::get_log) or the log file for that.
    pub fn to_json(&self) -> TrackResult<String> {
        let mut document: Map<String, JsonValue> = self
            .object
            .attributes()
            .into_iter()
            .filter(|(name, _)| !is_reserved(name))
            .map(|(name, value)| {
                let encoded = self.encoder.encode(&value);
                (name, encoded)
            })
            .collect();

        document.insert(
            "_buffer_size".to_string(),
            JsonValue::from(self.config.buffer_size),
        );
        document.insert(
            "_log_file".to_string(),
            self.config
                .log_file
                .as_ref()
                .map_or(JsonValue::Null, |path| {
                    JsonValue::String(path.display().to_string())
                }),
        );

        let bytes = persist::to_pretty_json(&document)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TrackerBuilder;
    use crate::core::{DynamicObject, ValueKind};
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn point() -> DynamicObject {
        DynamicObject::new("Point").with("x", 0).with("y", 0)
    }

    #[test]
    fn construction_records_single_initial_entry() {
        let tracker = TrackerBuilder::new().build(point()).unwrap();
        let log = tracker.get_log();

        assert_eq!(log.len(), 1);
        assert!(log[0].change.is_initial());
        assert_eq!(log[0].changed_attribute, "");
        assert_eq!(log[0].value_of("x"), Value::Int(0));
        assert_eq!(log[0].value_of("y"), Value::Int(0));
    }

    #[test]
    fn writes_record_previous_and_current() {
        let mut tracker = TrackerBuilder::new().buffer_size(20).build(point()).unwrap();
        tracker.set_attribute("x", 1).unwrap();
        tracker.set_attribute("x", 2).unwrap();

        let log = tracker.get_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].changed_attribute, "x");
        assert_eq!(log[1].change.previous(), Some(&Value::Int(0)));
        assert_eq!(log[1].change.current(), Some(&Value::Int(1)));
        assert_eq!(log[2].change.previous(), Some(&Value::Int(1)));
        assert_eq!(log[2].change.current(), Some(&Value::Int(2)));
        assert_eq!(log[2].value_of("x"), Value::Int(2));
        assert_eq!(log[2].value_of("y"), Value::Int(0));
    }

    #[test]
    fn new_attribute_has_unset_previous() {
        let mut tracker = TrackerBuilder::new().build(point()).unwrap();
        tracker.set_attribute("z", "fresh").unwrap();

        let entry = tracker.latest().unwrap();
        assert_eq!(entry.change.previous(), Some(&Value::Unset));
        assert_eq!(entry.value_of("z"), Value::from("fresh"));
    }

    #[test]
    fn previous_value_comes_from_log_not_object() {
        let object = DynamicObject::new("Bag").with("items", vec![1, 2]);
        let mut tracker = TrackerBuilder::new().build(object).unwrap();
        tracker.set_attribute("items", vec![3, 4]).unwrap();

        let change = &tracker.latest().unwrap().change;
        assert_eq!(change.previous(), Some(&Value::Placeholder(ValueKind::List)));
        assert_eq!(change.current(), Some(&Value::Placeholder(ValueKind::List)));
        assert_eq!(tracker.get("items"), Some(Value::from(vec![3, 4])));
    }

    #[test]
    fn eviction_keeps_most_recent_entries() {
        let mut tracker = TrackerBuilder::new().buffer_size(3).build(point()).unwrap();
        for i in 1..=5 {
            tracker.set_attribute("x", i).unwrap();
        }

        let currents: Vec<&Value> = tracker
            .get_log()
            .iter()
            .filter_map(|e| e.change.current())
            .collect();
        assert_eq!(currents, vec![&Value::Int(3), &Value::Int(4), &Value::Int(5)]);
    }

    #[test]
    fn reserved_names_are_rejected() {
        let mut tracker = TrackerBuilder::new().build(point()).unwrap();
        let result = tracker.set_attribute("_log", 1);

        assert!(matches!(result, Err(TrackError::ReservedAttribute { .. })));
        assert_eq!(tracker.get_log().len(), 1);
        assert_eq!(tracker.get("_log"), None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut tracker = TrackerBuilder::new().build(point()).unwrap();
        let result = tracker.set_attribute("", 1);

        assert!(matches!(result, Err(TrackError::EmptyAttributeName)));
        assert_eq!(tracker.get_log().len(), 1);
        assert_eq!(tracker.get(""), None);
    }

    #[derive(Clone, Default)]
    struct WarnCapture(Arc<Mutex<Vec<String>>>);

    impl WarnCapture {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct MessageVisitor(Option<String>);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() != Level::WARN {
                return;
            }
            let mut visitor = MessageVisitor(None);
            event.record(&mut visitor);
            if let Some(message) = visitor.0 {
                self.0.lock().unwrap().push(message);
            }
        }
    }

    #[test]
    fn eviction_warns_once_per_dropped_entry() {
        let capture = WarnCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let mut tracker = TrackerBuilder::new().buffer_size(3).build(point()).unwrap();
            tracker.set_attribute("x", 1).unwrap();
            tracker.set_attribute("x", 2).unwrap();
            assert!(capture.messages().is_empty());

            for i in 3..=5 {
                tracker.set_attribute("x", i).unwrap();
            }
        });

        let messages = capture.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages
            .iter()
            .all(|m| m == "Buffer full, removing oldest entry"));
    }

    #[test]
    fn rejected_assignment_records_nothing() {
        crate::trackable! {
            struct Typed {
                count: i64,
            }
        }

        let mut tracker = TrackerBuilder::new().build(Typed { count: 0 }).unwrap();
        let result = tracker.set_attribute("count", "three");

        assert!(matches!(result, Err(TrackError::Assign(_))));
        assert_eq!(tracker.get_log().len(), 1);
        assert_eq!(tracker.inner().count, 0);
    }

    #[test]
    fn to_json_encodes_live_object_and_settings() {
        let object = point().with("tags", vec!["a".to_string()]);
        let mut tracker = TrackerBuilder::new().buffer_size(7).build(object).unwrap();
        tracker.set_attribute("x", 5).unwrap();

        let json: serde_json::Value = serde_json::from_str(&tracker.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "x": 5,
                "y": 0,
                "tags": ["a"],
                "_buffer_size": 7,
                "_log_file": null
            })
        );
    }

    #[test]
    fn to_json_is_indented_with_four_spaces() {
        let tracker = TrackerBuilder::new().build(point()).unwrap();
        let text = tracker.to_json().unwrap();
        assert!(text.starts_with("{\n    \"x\": 0,"));
    }

    #[test]
    fn flush_without_log_file_is_a_no_op() {
        let tracker = TrackerBuilder::new().build(point()).unwrap();
        assert!(tracker.flush().is_ok());
    }

    #[test]
    fn into_inner_returns_final_object() {
        let mut tracker = TrackerBuilder::new().build(point()).unwrap();
        tracker.set_attribute("y", 9).unwrap();

        let object = tracker.into_inner();
        assert_eq!(object.get("y"), Some(&Value::Int(9)));
    }
}
